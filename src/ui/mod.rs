//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The inspector shows one script three ways: its source, its token stream
//! and its AST. The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   tokens, AST, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with [`App::load`]
//! and call [`App::run`] to start the event loop.
//!
//! [`App::load`]: app::App::load
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
