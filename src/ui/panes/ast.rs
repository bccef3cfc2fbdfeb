//! AST pane: the pretty-printed JSON tree, or the parse error

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Color a JSON line: keys, string values and numbers.
fn highlight_json_line(line: &str) -> Line<'_> {
    let indent_len = line.len() - line.trim_start().len();
    let (indent, rest) = line.split_at(indent_len);

    let mut spans = vec![Span::raw(indent)];
    match rest.split_once("\": ") {
        Some((key, value)) if key.starts_with('"') => {
            spans.push(Span::styled(
                format!("{}\":", key),
                Style::default().fg(DEFAULT_THEME.primary),
            ));
            spans.push(Span::raw(" "));
            spans.push(style_json_value(value));
        }
        _ => spans.push(style_json_value(rest)),
    }
    Line::from(spans)
}

fn style_json_value(value: &str) -> Span<'_> {
    let bare = value.trim_end_matches(',');
    let style = if bare.starts_with('"') {
        Style::default().fg(DEFAULT_THEME.string)
    } else if bare == "true" || bare == "false" || bare.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
        Style::default().fg(DEFAULT_THEME.number)
    } else if bare == "null" {
        Style::default().fg(DEFAULT_THEME.comment)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    };
    Span::styled(value, style)
}

/// Render the AST pane. Shows `error` instead of the tree when present.
pub fn render_ast_pane(
    frame: &mut Frame,
    area: Rect,
    ast_json: Option<&str>,
    error: Option<&str>,
    is_focused: bool,
    scroll: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" AST ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if let Some(message) = error {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::BOLD),
        )))
        .block(block)
        .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        return;
    }

    let json = ast_json.unwrap_or("");
    let total_lines = json.lines().count();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll = (*scroll).min(total_lines.saturating_sub(visible_height));

    let lines: Vec<Line> = json
        .lines()
        .skip(*scroll)
        .take(visible_height)
        .map(highlight_json_line)
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_key_value_split() {
        let line = highlight_json_line("    \"value\": 10,");
        let texts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["    ", "\"value\":", " ", "10,"]);
        assert_eq!(line.spans[1].style.fg, Some(DEFAULT_THEME.primary));
        assert_eq!(line.spans[3].style.fg, Some(DEFAULT_THEME.number));
    }

    #[test]
    fn test_json_bracket_line() {
        let line = highlight_json_line("  },");
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[1].style.fg, Some(DEFAULT_THEME.fg));
    }
}
