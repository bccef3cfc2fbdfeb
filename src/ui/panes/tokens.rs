//! Token stream pane
//!
//! One row per token: line, kind and text. The selected row is highlighted
//! and kept in view; selecting a token also moves the source highlight.

use crate::parser::lexer::{Token, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Scroll state for the token pane
#[derive(Debug, Default)]
pub struct TokenScrollState {
    pub selected: usize,
    pub offset: usize,
}

impl TokenScrollState {
    /// Move the selection by `delta` rows, clamped to `[0, count)`.
    pub fn move_by(&mut self, delta: isize, count: usize) {
        if count == 0 {
            self.selected = 0;
            return;
        }
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, count as isize - 1) as usize;
    }

    /// Scroll so the selected row is within `height` visible rows.
    fn follow_selection(&mut self, height: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }
}

fn kind_color(kind: TokenKind) -> Color {
    match kind {
        TokenKind::Keyword => DEFAULT_THEME.keyword,
        TokenKind::Id => DEFAULT_THEME.fg,
        TokenKind::Integer | TokenKind::Float | TokenKind::Time => DEFAULT_THEME.number,
        TokenKind::String => DEFAULT_THEME.string,
        TokenKind::Operator => DEFAULT_THEME.operator,
        TokenKind::Eof => DEFAULT_THEME.comment,
    }
}

/// Format one token row (without styling)
pub fn format_token_row(token: &Token) -> String {
    let text = match token.kind {
        TokenKind::Eof => String::new(),
        TokenKind::String => format!("\"{}\"", token.text().replace('\n', "\\n")),
        _ => token.text().to_string(),
    };
    format!("{:4}  {:<8} {}", token.line, token.kind.as_str(), text)
}

/// Render the token pane
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &[Token],
    is_focused: bool,
    scroll_state: &mut TokenScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Tokens ({}) ", tokens.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    scroll_state.follow_selection(visible_height);

    let rows: Vec<Line> = tokens
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, token)| {
            let mut style = Style::default().fg(kind_color(token.kind));
            if idx == scroll_state.selected {
                style = style
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(format_token_row(token), style))
        })
        .collect();

    let paragraph = Paragraph::new(rows).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_format() {
        let token = Token::new(TokenKind::Keyword, "SET", 3);
        assert_eq!(format_token_row(&token), "   3  KEYWORD  SET");
        assert_eq!(format_token_row(&Token::eof(7)), "   7  EOF      ");
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut state = TokenScrollState::default();
        state.move_by(-3, 5);
        assert_eq!(state.selected, 0);
        state.move_by(10, 5);
        assert_eq!(state.selected, 4);
        state.move_by(1, 0);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_follow_selection() {
        let mut state = TokenScrollState {
            selected: 12,
            offset: 0,
        };
        state.follow_selection(5);
        assert_eq!(state.offset, 8);
        state.selected = 2;
        state.follow_selection(5);
        assert_eq!(state.offset, 2);
    }
}
