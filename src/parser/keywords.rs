//! Reserved words of the language, grouped by category.
//!
//! Classification is case-insensitive: `set`, `Set` and `SET` are all the
//! `SET` keyword. The table is built once on first use. When a word appears
//! in more than one category the category listed first wins (so `BREAK` is a
//! [`KeywordCategory::Statement`], not a [`KeywordCategory::Control`]).
//!
//! Single letters are deliberately absent; `PRESS KEY a` reads `a` as an
//! identifier and the parser accepts it as a key name.

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// Category a reserved word belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Statement,
    Loop,
    Io,
    InputControl,
    Error,
    Control,
    Generator,
    Type,
    Target,
    Assertion,
    Logical,
    KeyboardKey,
    MouseButton,
    Boolean,
}

const STATEMENT: &[&str] = &[
    "SET", "DEFUN", "LAMBDA", "IF", "THEN", "ELSE", "ELSEIF", "ENDIF", "TIMES",
    "RETURN", "BREAK", "CONTINUE", "YIELD", "PASS", "POINT", "ENDWHILE",
    "ENDREPEAT", "ENDDEFUN",
];
const LOOP: &[&str] = &["REPEAT", "WHILE"];
const IO: &[&str] = &["PRINTLN", "PRINT", "INPUT", "OPEN", "WRITE", "RUN"];
const INPUT_CONTROL: &[&str] = &[
    "MOVE", "MOUSE", "WAIT", "RELEASE", "HOLD", "PRESS", "FOCUS", "SCROLL",
];
const ERROR: &[&str] = &["TRY", "EXCEPT", "FINALLY", "ERROR"];
const CONTROL: &[&str] = &["EXIT", "CONTINUE", "BREAK", "RAISE"];
const GENERATOR: &[&str] = &["YIELD", "FROM"];
const TYPE: &[&str] = &["APP", "WINDOW", "KEY", "BUTTON"];
const TARGET: &[&str] = &["TO"];
const ASSERTION: &[&str] = &["EXISTS", "IS", "IN", "AT"];
const LOGICAL: &[&str] = &["AND", "OR", "NOT"];
const KEYBOARD_KEY: &[&str] = &[
    "FN", "BACKSPACE", "ENTER", "SPACE", "TAB", "CTRL", "LCTRL", "RCTRL", "ALT",
    "LALT", "RALT", "SHIFT", "LSHIFT", "RSHIFT", "WIN", "LWIN", "RWIN", "DEL",
    "DELETE", "END", "HOME", "INSERT", "PG_UP", "PG_DOWN", "ARROW_LEFT",
    "ARROW_RIGHT", "ARROW_UP", "ARROW_DOWN", "ESC", "CAPS_LOCK", "F1", "F2",
    "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
];
const MOUSE_BUTTON: &[&str] = &[
    "LEFT", "RIGHT", "MIDDLE", "WHEEL_UP", "WHEEL_DOWN", "SCROLL_UP",
    "SCROLL_DOWN",
];
const BOOLEAN: &[&str] = &["TRUE", "FALSE"];

/// Category tables in priority order.
const CATEGORIES: &[(KeywordCategory, &[&str])] = &[
    (KeywordCategory::Statement, STATEMENT),
    (KeywordCategory::Loop, LOOP),
    (KeywordCategory::Io, IO),
    (KeywordCategory::InputControl, INPUT_CONTROL),
    (KeywordCategory::Error, ERROR),
    (KeywordCategory::Control, CONTROL),
    (KeywordCategory::Generator, GENERATOR),
    (KeywordCategory::Type, TYPE),
    (KeywordCategory::Target, TARGET),
    (KeywordCategory::Assertion, ASSERTION),
    (KeywordCategory::Logical, LOGICAL),
    (KeywordCategory::KeyboardKey, KEYBOARD_KEY),
    (KeywordCategory::MouseButton, MOUSE_BUTTON),
    (KeywordCategory::Boolean, BOOLEAN),
];

fn table() -> &'static FxHashMap<&'static str, KeywordCategory> {
    static TABLE: OnceLock<FxHashMap<&'static str, KeywordCategory>> =
        OnceLock::new();
    TABLE.get_or_init(|| {
        let mut map = FxHashMap::default();
        for (category, words) in CATEGORIES {
            for word in *words {
                map.entry(*word).or_insert(*category);
            }
        }
        map
    })
}

/// Look up the category of `word`, ignoring case.
pub fn lookup(word: &str) -> Option<KeywordCategory> {
    table().get(word.to_ascii_uppercase().as_str()).copied()
}

pub fn is_keyword(word: &str) -> bool {
    lookup(word).is_some()
}
