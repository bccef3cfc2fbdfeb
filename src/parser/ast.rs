//! AST (Abstract Syntax Tree) definitions for CommandPro scripts
//!
//! One enum variant per node kind. Children are owned through `Box` and
//! `Vec`, so the tree is acyclic and dropping a node drops its whole subtree.
//! Nodes carry no source positions; errors report lines at parse time.
//!
//! The serde attributes define the JSON interchange format: each node is an
//! object whose `"type"` field names the kind (`"PROGRAM"`, `"INTEGER"`, ...)
//! followed by one field per attribute, in declaration order.

use crate::parser::errors::ControlKind;
use serde::{Deserialize, Serialize};

pub type NodeList = Vec<AstNode>;
pub type StringList = Vec<String>;

/// Unit recorded on every time literal; the tokenizer has already normalized
/// the magnitude to seconds.
pub const TIME_UNIT: &str = "s";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AstNode {
    Program {
        statements: NodeList,
    },
    FunctionDefinition {
        name: String,
        parameters: StringList,
        body: NodeList,
    },
    Assignment {
        variable_name: String,
        value: Box<AstNode>,
        var_type: Option<String>,
    },
    PrintStatement {
        print_type: String,
        expression: Box<AstNode>,
    },
    WaitStatement {
        expression: Box<AstNode>,
    },
    MoveMouse {
        x: Box<AstNode>,
        y: Box<AstNode>,
    },
    KeyOperation {
        operation: String,
        key: String,
    },
    ButtonOperation {
        button: String,
    },
    BinaryOperation {
        operator: String,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
    Identifier {
        name: String,
    },
    Integer {
        value: i64,
    },
    Float {
        value: f64,
    },
    Time {
        value: f64,
        unit: String,
    },
    String {
        value: String,
    },
    EmptyStatement,
    FunctionCall {
        function_name: String,
        arguments: NodeList,
    },
    Boolean {
        value: bool,
    },
    WhileLoop {
        condition: Box<AstNode>,
        body: NodeList,
    },
    RepeatLoop {
        count: Box<AstNode>,
        body: NodeList,
    },
    ControlStatement {
        statement_type: ControlKind,
        value: Option<Box<AstNode>>,
    },
    IncrementDecrement {
        variable: String,
        operation: String,
        is_prefix: bool,
    },
    IfStatement {
        condition: Box<AstNode>,
        then_body: NodeList,
        else_if_conditions: NodeList,
        else_if_bodies: Vec<NodeList>,
        else_body: Option<NodeList>,
    },
}

impl AstNode {
    pub fn program(statements: NodeList) -> Self {
        AstNode::Program { statements }
    }

    pub fn function_definition(
        name: impl Into<String>,
        parameters: StringList,
        body: NodeList,
    ) -> Self {
        AstNode::FunctionDefinition {
            name: name.into(),
            parameters,
            body,
        }
    }

    pub fn assignment(
        variable_name: impl Into<String>,
        value: AstNode,
        var_type: Option<String>,
    ) -> Self {
        AstNode::Assignment {
            variable_name: variable_name.into(),
            value: Box::new(value),
            var_type,
        }
    }

    pub fn print_statement(print_type: impl Into<String>, expression: AstNode) -> Self {
        AstNode::PrintStatement {
            print_type: print_type.into(),
            expression: Box::new(expression),
        }
    }

    pub fn wait_statement(expression: AstNode) -> Self {
        AstNode::WaitStatement {
            expression: Box::new(expression),
        }
    }

    pub fn move_mouse(x: AstNode, y: AstNode) -> Self {
        AstNode::MoveMouse {
            x: Box::new(x),
            y: Box::new(y),
        }
    }

    pub fn key_operation(operation: impl Into<String>, key: impl Into<String>) -> Self {
        AstNode::KeyOperation {
            operation: operation.into(),
            key: key.into(),
        }
    }

    pub fn button_operation(button: impl Into<String>) -> Self {
        AstNode::ButtonOperation {
            button: button.into(),
        }
    }

    pub fn binary_operation(operator: impl Into<String>, left: AstNode, right: AstNode) -> Self {
        AstNode::BinaryOperation {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        AstNode::Identifier { name: name.into() }
    }

    pub fn integer(value: i64) -> Self {
        AstNode::Integer { value }
    }

    pub fn float(value: f64) -> Self {
        AstNode::Float { value }
    }

    /// Time literal, `seconds` already normalized.
    pub fn time(seconds: f64) -> Self {
        AstNode::Time {
            value: seconds,
            unit: TIME_UNIT.to_string(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        AstNode::String {
            value: value.into(),
        }
    }

    pub fn empty_statement() -> Self {
        AstNode::EmptyStatement
    }

    pub fn function_call(function_name: impl Into<String>, arguments: NodeList) -> Self {
        AstNode::FunctionCall {
            function_name: function_name.into(),
            arguments,
        }
    }

    pub fn boolean(value: bool) -> Self {
        AstNode::Boolean { value }
    }

    pub fn while_loop(condition: AstNode, body: NodeList) -> Self {
        AstNode::WhileLoop {
            condition: Box::new(condition),
            body,
        }
    }

    pub fn repeat_loop(count: AstNode, body: NodeList) -> Self {
        AstNode::RepeatLoop {
            count: Box::new(count),
            body,
        }
    }

    pub fn control_statement(statement_type: ControlKind, value: Option<AstNode>) -> Self {
        AstNode::ControlStatement {
            statement_type,
            value: value.map(Box::new),
        }
    }

    pub fn increment_decrement(
        variable: impl Into<String>,
        operation: impl Into<String>,
        is_prefix: bool,
    ) -> Self {
        AstNode::IncrementDecrement {
            variable: variable.into(),
            operation: operation.into(),
            is_prefix,
        }
    }

    /// Build an `IF` node.
    ///
    /// # Panics
    ///
    /// Panics if `else_if_conditions` and `else_if_bodies` differ in length.
    /// The parser always pushes them in pairs.
    pub fn if_statement(
        condition: AstNode,
        then_body: NodeList,
        else_if_conditions: NodeList,
        else_if_bodies: Vec<NodeList>,
        else_body: Option<NodeList>,
    ) -> Self {
        assert_eq!(
            else_if_conditions.len(),
            else_if_bodies.len(),
            "every ELSEIF condition needs exactly one body"
        );
        AstNode::IfStatement {
            condition: Box::new(condition),
            then_body,
            else_if_conditions,
            else_if_bodies,
            else_body,
        }
    }

    /// The JSON discriminator for this node.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AstNode::Program { .. } => "PROGRAM",
            AstNode::FunctionDefinition { .. } => "FUNCTION_DEFINITION",
            AstNode::Assignment { .. } => "ASSIGNMENT",
            AstNode::PrintStatement { .. } => "PRINT_STATEMENT",
            AstNode::WaitStatement { .. } => "WAIT_STATEMENT",
            AstNode::MoveMouse { .. } => "MOVE_MOUSE",
            AstNode::KeyOperation { .. } => "KEY_OPERATION",
            AstNode::ButtonOperation { .. } => "BUTTON_OPERATION",
            AstNode::BinaryOperation { .. } => "BINARY_OPERATION",
            AstNode::Identifier { .. } => "IDENTIFIER",
            AstNode::Integer { .. } => "INTEGER",
            AstNode::Float { .. } => "FLOAT",
            AstNode::Time { .. } => "TIME",
            AstNode::String { .. } => "STRING",
            AstNode::EmptyStatement => "EMPTY_STATEMENT",
            AstNode::FunctionCall { .. } => "FUNCTION_CALL",
            AstNode::Boolean { .. } => "BOOLEAN",
            AstNode::WhileLoop { .. } => "WHILE_LOOP",
            AstNode::RepeatLoop { .. } => "REPEAT_LOOP",
            AstNode::ControlStatement { .. } => "CONTROL_STATEMENT",
            AstNode::IncrementDecrement { .. } => "INCREMENT_DECREMENT",
            AstNode::IfStatement { .. } => "IF_STATEMENT",
        }
    }

    /// Whether this node is a literal value.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            AstNode::Integer { .. }
                | AstNode::Float { .. }
                | AstNode::Time { .. }
                | AstNode::String { .. }
                | AstNode::Boolean { .. }
        )
    }

    /// Statements of a `Program`, or an empty slice for any other node.
    pub fn statements(&self) -> &[AstNode] {
        match self {
            AstNode::Program { statements } => statements,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_constructor_records_seconds() {
        match AstNode::time(0.5) {
            AstNode::Time { value, unit } => {
                assert_eq!(value, 0.5);
                assert_eq!(unit, "s");
            }
            _ => panic!("Expected time literal"),
        }
    }

    #[test]
    fn test_if_statement_pairs() {
        let node = AstNode::if_statement(
            AstNode::boolean(true),
            vec![AstNode::empty_statement()],
            vec![AstNode::boolean(false)],
            vec![vec![]],
            None,
        );
        assert_eq!(node.kind_name(), "IF_STATEMENT");
    }

    #[test]
    #[should_panic(expected = "every ELSEIF condition needs exactly one body")]
    fn test_if_statement_mismatched_lists() {
        AstNode::if_statement(
            AstNode::boolean(true),
            vec![],
            vec![AstNode::boolean(false)],
            vec![],
            None,
        );
    }

    #[test]
    fn test_literal_classification() {
        assert!(AstNode::integer(1).is_literal());
        assert!(AstNode::string("x").is_literal());
        assert!(!AstNode::identifier("x").is_literal());
    }
}
