//! Binary operator nodes
//!
//! An operator node never looks at SQL token text: its symbol, evaluation
//! method and operand type class all follow from the node-type code, so
//! type-checking can ask for them without re-deriving anything from source.

use std::fmt;

use super::Node;
use crate::diagnostics::Fault;
use crate::node_types::NodeType;
use crate::visit::{Visitor, accept_boxed};

/// Type class an operand (and the result) must belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueClass {
    Numeric,
    Concatenable,
}

impl ValueClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueClass::Numeric => "numeric",
            ValueClass::Concatenable => "concatenable",
        }
    }
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    Plus,
    Minus,
    Times,
    Divide,
    Mod,
    /// Integer division
    Div,
}

impl ArithmeticOperator {
    /// The only place an arithmetic operator is derived from a node type
    pub fn from_node_type(node_type: NodeType) -> Result<Self, Fault> {
        match node_type {
            NodeType::BinaryDivideOperator => Ok(ArithmeticOperator::Divide),
            NodeType::BinaryMinusOperator => Ok(ArithmeticOperator::Minus),
            NodeType::BinaryPlusOperator => Ok(ArithmeticOperator::Plus),
            NodeType::BinaryTimesOperator => Ok(ArithmeticOperator::Times),
            NodeType::ModOperator => Ok(ArithmeticOperator::Mod),
            NodeType::BinaryDivOperator => Ok(ArithmeticOperator::Div),
            other => Err(Fault::UnexpectedNodeType {
                node_type: other,
                expected: "binary arithmetic operator",
            }),
        }
    }

    pub fn node_type(self) -> NodeType {
        match self {
            ArithmeticOperator::Divide => NodeType::BinaryDivideOperator,
            ArithmeticOperator::Minus => NodeType::BinaryMinusOperator,
            ArithmeticOperator::Plus => NodeType::BinaryPlusOperator,
            ArithmeticOperator::Times => NodeType::BinaryTimesOperator,
            ArithmeticOperator::Mod => NodeType::ModOperator,
            ArithmeticOperator::Div => NodeType::BinaryDivOperator,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOperator::Divide => "/",
            ArithmeticOperator::Minus => "-",
            ArithmeticOperator::Plus => "+",
            ArithmeticOperator::Times => "*",
            ArithmeticOperator::Mod => "mod",
            ArithmeticOperator::Div => "div",
        }
    }

    pub fn method_name(self) -> &'static str {
        match self {
            ArithmeticOperator::Divide => "divide",
            ArithmeticOperator::Minus => "minus",
            ArithmeticOperator::Plus => "plus",
            ArithmeticOperator::Times => "times",
            ArithmeticOperator::Mod => "mod",
            ArithmeticOperator::Div => "div",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Arithmetic(ArithmeticOperator),
    /// `||`, wired once at construction; bypasses the arithmetic table
    Concatenation,
}

impl OperatorKind {
    fn symbol(self) -> &'static str {
        match self {
            OperatorKind::Arithmetic(op) => op.symbol(),
            OperatorKind::Concatenation => "||",
        }
    }

    fn method_name(self) -> &'static str {
        match self {
            OperatorKind::Arithmetic(op) => op.method_name(),
            OperatorKind::Concatenation => "concatenate",
        }
    }

    fn operand_class(self) -> ValueClass {
        match self {
            OperatorKind::Arithmetic(_) => ValueClass::Numeric,
            OperatorKind::Concatenation => ValueClass::Concatenable,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperatorNode {
    kind: OperatorKind,
    left: Box<Node>,
    right: Box<Node>,
    operator: &'static str,
    method_name: &'static str,
    left_class: ValueClass,
    right_class: ValueClass,
}

impl BinaryOperatorNode {
    /// Build an arithmetic operator; metadata follows from `node_type`
    pub fn arithmetic(node_type: NodeType, left: Node, right: Node) -> Result<Self, Fault> {
        let op = ArithmeticOperator::from_node_type(node_type)?;
        Ok(Self::with_kind(OperatorKind::Arithmetic(op), left, right))
    }

    pub fn concatenation(left: Node, right: Node) -> Self {
        Self::with_kind(OperatorKind::Concatenation, left, right)
    }

    fn with_kind(kind: OperatorKind, left: Node, right: Node) -> Self {
        Self {
            kind,
            left: Box::new(left),
            right: Box::new(right),
            operator: kind.symbol(),
            method_name: kind.method_name(),
            left_class: kind.operand_class(),
            right_class: kind.operand_class(),
        }
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub fn operator(&self) -> &'static str {
        self.operator
    }

    pub fn method_name(&self) -> &'static str {
        self.method_name
    }

    pub fn left_operand_class(&self) -> ValueClass {
        self.left_class
    }

    pub fn right_operand_class(&self) -> ValueClass {
        self.right_class
    }

    /// Operators in this family produce a value of their operand class
    pub fn result_class(&self) -> ValueClass {
        self.left_class
    }

    pub fn left_operand(&self) -> &Node {
        &self.left
    }

    pub fn right_operand(&self) -> &Node {
        &self.right
    }

    /// Visits left, then right
    pub(crate) fn accept_children(mut self, v: &mut dyn Visitor) -> crate::Result<Self> {
        self.left = accept_boxed(self.left, v)?;
        self.right = accept_boxed(self.right, v)?;
        Ok(self)
    }
}
