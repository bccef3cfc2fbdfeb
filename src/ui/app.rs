//! Main TUI application state and logic

use crate::parser::errors::ParseError;
use crate::parser::lexer::{self, Token};
use crate::parser::parse::{ParseOptions, Parser};
use crate::serializer;
use crate::ui::panes::{self, SourceScrollState, TokenScrollState};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::info;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Rows moved by PageUp/PageDown
const PAGE_SIZE: isize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tokens,
    Ast,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> tokens -> ast)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Ast,
            FocusedPane::Ast => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Ast,
            FocusedPane::Tokens => FocusedPane::Source,
            FocusedPane::Ast => FocusedPane::Tokens,
        }
    }
}

/// The main application state
pub struct App {
    /// The script being inspected
    pub source_code: String,

    /// Tokens, empty when tokenizing failed
    pub tokens: Vec<Token>,

    /// Pretty JSON of the AST when parsing succeeded
    pub ast_json: Option<String>,

    /// Number of top-level statements when parsing succeeded
    pub statement_count: Option<usize>,

    /// First error from tokenizing or parsing
    pub error: Option<ParseError>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub token_scroll: TokenScrollState,
    pub ast_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Run the pipeline over `source_code` and capture the outcome
    pub fn load(source_code: String, options: ParseOptions) -> Self {
        let mut tokens = Vec::new();
        let mut ast_json = None;
        let mut statement_count = None;

        let outcome = lexer::tokenize(&source_code).and_then(|toks| {
            tokens = toks.clone();
            Parser::with_options(toks, options).parse_program()
        });

        let error = match outcome {
            Ok(program) => {
                statement_count = Some(program.statements().len());
                ast_json = Some(serializer::serialize_pretty(&program));
                None
            }
            Err(err) => Some(err),
        };

        let status_message = match &error {
            Some(err) => err.to_string(),
            None => String::from("Parsed successfully"),
        };
        info!("inspector loaded: {}", status_message);

        App {
            source_code,
            tokens,
            ast_json,
            statement_count,
            error,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            token_scroll: TokenScrollState::default(),
            ast_scroll: 0,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Line to highlight in the source pane: the error line, else the
    /// selected token's line. 0 for none.
    pub fn highlighted_line(&self) -> usize {
        match &self.error {
            Some(err) => err.line,
            None => self
                .tokens
                .get(self.token_scroll.selected)
                .map_or(0, |t| t.line),
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        // Right column: Tokens (top) | AST (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(columns[1]);

        let current_line = self.highlighted_line();
        panes::render_source_pane(
            frame,
            columns[0],
            &self.source_code,
            current_line,
            self.error.is_some(),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_tokens_pane(
            frame,
            right_rows[0],
            &self.tokens,
            self.focused_pane == FocusedPane::Tokens,
            &mut self.token_scroll,
        );

        let error_message = self.error.as_ref().map(|e| e.to_string());
        panes::render_ast_pane(
            frame,
            right_rows[1],
            self.ast_json.as_deref(),
            error_message.as_deref(),
            self.focused_pane == FocusedPane::Ast,
            &mut self.ast_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.tokens.len(),
            self.statement_count,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => self.move_by(-1),
            KeyCode::Down => self.move_by(1),
            KeyCode::PageUp => self.move_by(-PAGE_SIZE),
            KeyCode::PageDown => self.move_by(PAGE_SIZE),
            KeyCode::Home => self.move_by(isize::MIN / 2),
            KeyCode::End => self.move_by(isize::MAX / 2),
            _ => {}
        }
    }

    /// Move within the focused pane
    fn move_by(&mut self, delta: isize) {
        match self.focused_pane {
            FocusedPane::Source => {
                // Scrolling down makes the highlighted line move up visually
                if let Some(row) = self.source_scroll.target_line_row {
                    let row = row as isize - delta.clamp(-1_000_000, 1_000_000);
                    self.source_scroll.target_line_row = Some(row.max(0) as usize);
                }
            }
            FocusedPane::Tokens => {
                self.token_scroll.move_by(delta, self.tokens.len());
                if let Some(token) = self.tokens.get(self.token_scroll.selected) {
                    self.status_message = format!("Token {}: {}", self.token_scroll.selected, token);
                }
            }
            FocusedPane::Ast => {
                self.ast_scroll = self.ast_scroll.saturating_add_signed(delta);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_load_success() {
        let app = App::load("SET x = 10\nPRINT x".to_string(), ParseOptions::default());
        assert!(app.error.is_none());
        assert_eq!(app.tokens.len(), 7);
        assert_eq!(app.statement_count, Some(2));
        assert!(app.ast_json.as_deref().unwrap().contains("\"ASSIGNMENT\""));
        assert_eq!(app.highlighted_line(), 1);
    }

    #[test]
    fn test_load_error_highlights_line() {
        let app = App::load("PRINT 1\nBREAK".to_string(), ParseOptions::default());
        assert!(app.ast_json.is_none());
        assert_eq!(app.highlighted_line(), 2);
        assert!(app.status_message.starts_with("Syntax error at line 2"));
        // Tokens are still shown after a parse error
        assert_eq!(app.tokens.len(), 4);
    }

    #[test]
    fn test_focus_cycle() {
        let mut app = App::load(String::new(), ParseOptions::default());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Tokens);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Ast);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Tokens);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_token_selection_moves_highlight() {
        let mut app = App::load("SET x = 10\nPRINT x".to_string(), ParseOptions::default());
        app.focused_pane = FocusedPane::Tokens;
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.token_scroll.selected, 6);
        assert_eq!(app.highlighted_line(), 2);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.token_scroll.selected, 0);
        press(&mut app, KeyCode::End);
        assert_eq!(app.token_scroll.selected, 6);
    }

    #[test]
    fn test_render_panes() {
        let mut app = App::load(
            "REPEAT 3 TIMES\nPRINT 1\nENDREPEAT".to_string(),
            ParseOptions::default(),
        );
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains(" Source "));
        assert!(text.contains(" Tokens (7) "));
        assert!(text.contains(" AST "));
        assert!(text.contains("REPEAT_LOOP"));
    }

    #[test]
    fn test_render_error() {
        let mut app = App::load("SET x = \"open".to_string(), ParseOptions::default());
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Unterminated string literal"));
        assert!(text.contains(" ERROR "));
    }
}
