//! Lexical scope and control-flow context tracking
//!
//! The parser owns one [`ScopeTracker`]. It records which variables and
//! functions are declared in each scope (innermost last) and which
//! constructs (`loop`, `function`) enclose the statement being parsed.
//! Lookups walk from the innermost scope out to the global one.

use rustc_hash::FxHashMap;

/// A construct that can absorb a control statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Loop,
    Function,
}

impl Context {
    pub fn label(&self) -> &'static str {
        match self {
            Context::Loop => "loop",
            Context::Function => "function",
        }
    }
}

/// Declarations made in one scope.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Variable name to its declared type, if one was given.
    pub variables: FxHashMap<String, Option<String>>,
    /// Function name to its parameter names.
    pub functions: FxHashMap<String, Vec<String>>,
}

/// Scope chain plus context stack
#[derive(Debug, Clone, Default)]
pub struct ScopeTracker {
    global: Scope,
    nested: Vec<Scope>,
    contexts: Vec<Context>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Scopes =====

    /// Open a new scope nested in the current one.
    pub fn enter_scope(&mut self) {
        self.nested.push(Scope::default());
    }

    /// Close the current scope, discarding its declarations. Returns `false`
    /// (and does nothing) at global scope.
    pub fn exit_scope(&mut self) -> bool {
        self.nested.pop().is_some()
    }

    /// Number of scopes above global.
    pub fn depth(&self) -> usize {
        self.nested.len()
    }

    pub fn current(&self) -> &Scope {
        self.nested.last().unwrap_or(&self.global)
    }

    fn current_mut(&mut self) -> &mut Scope {
        self.nested.last_mut().unwrap_or(&mut self.global)
    }

    /// Innermost scope first.
    fn chain(&self) -> impl Iterator<Item = &Scope> {
        self.nested.iter().rev().chain(std::iter::once(&self.global))
    }

    pub fn register_variable(&mut self, name: &str, var_type: Option<&str>) {
        self.current_mut()
            .variables
            .insert(name.to_string(), var_type.map(str::to_string));
    }

    pub fn register_function(&mut self, name: &str, parameters: &[String]) {
        self.current_mut()
            .functions
            .insert(name.to_string(), parameters.to_vec());
    }

    pub fn is_variable_in_scope(&self, name: &str) -> bool {
        self.chain().any(|scope| scope.variables.contains_key(name))
    }

    pub fn is_function_in_scope(&self, name: &str) -> bool {
        self.chain().any(|scope| scope.functions.contains_key(name))
    }

    /// Declared type of the nearest visible binding of `name`.
    pub fn variable_type(&self, name: &str) -> Option<&str> {
        self.chain()
            .find_map(|scope| scope.variables.get(name))
            .and_then(|t| t.as_deref())
    }

    /// Declared type of `name` in the current scope only.
    pub fn current_variable_type(&self, name: &str) -> Option<&str> {
        self.current().variables.get(name).and_then(|t| t.as_deref())
    }

    pub fn function_parameters(&self, name: &str) -> Option<&[String]> {
        self.chain()
            .find_map(|scope| scope.functions.get(name))
            .map(Vec::as_slice)
    }

    // ===== Contexts =====

    pub fn push_context(&mut self, context: Context) {
        self.contexts.push(context);
    }

    /// Pop the top context if it is `context`.
    pub fn pop_context(&mut self, context: Context) -> Option<Context> {
        if self.contexts.last() == Some(&context) {
            self.contexts.pop()
        } else {
            None
        }
    }

    /// Whether `context` appears anywhere on the stack.
    pub fn is_in_context(&self, context: Context) -> bool {
        self.contexts.contains(&context)
    }

    pub fn context_depth(&self) -> usize {
        self.contexts.len()
    }
}
