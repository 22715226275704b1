//! sqltree - SQL abstract syntax trees
//!
//! The node model a SQL compiler front end builds while reducing its
//! grammar, and the visitor framework later phases use to rewrite it.
//!
//! ## Quick Start
//!
//! ```
//! use sqltree::{NodeArg, NodeFactory, NodeType};
//!
//! let factory = NodeFactory::new();
//! let price = factory.make(NodeType::ColumnReference, vec![NodeArg::str("price")])?;
//! let tax = factory.make(NodeType::Constant, vec![NodeArg::Int(2)])?;
//! let sum = factory.make(NodeType::BinaryPlusOperator, vec![price.into(), tax.into()])?;
//!
//! let op = sum.as_operator().unwrap();
//! assert_eq!(op.operator(), "+");
//! assert_eq!(op.method_name(), "plus");
//! # Ok::<(), sqltree::Error>(())
//! ```
//!
//! ## Reduction scripts
//!
//! Trees can also be built from a textual transcript of the productions a
//! grammar would reduce:
//!
//! ```
//! let stmt = sqltree::build(
//!     "(DELETE @orders (SELECT (RESULT_COLUMN_LIST) \
//!       (FROM_LIST (FROM_BASE_TABLE @orders null)) null))",
//! )?;
//! assert_eq!(stmt.as_statement().unwrap().statement_to_string(), "DELETE");
//! # Ok::<(), sqltree::Error>(())
//! ```
//!
//! ## Rewriting
//!
//! Visitors receive nodes by value and return the node to install in the
//! parent's slot:
//!
//! ```
//! use sqltree::{Node, NodeType};
//!
//! let tree = sqltree::build("(BINARY_PLUS_OPERATOR (PARAMETER 0) (PARAMETER 1))")?;
//! let tree = tree.rewrite(|node: Node| {
//!     if node.node_type() == NodeType::Parameter {
//!         sqltree::build("(CONSTANT 0)")
//!     } else {
//!         Ok(node)
//!     }
//! })?;
//! assert_eq!(tree.to_string(), "(BINARY_PLUS_OPERATOR (CONSTANT 0) (CONSTANT 0))");
//! # Ok::<(), sqltree::Error>(())
//! ```

mod ast;
mod build;
mod diagnostics;
mod factory;
mod init;
mod node_types;
mod parse;
mod pretty;
mod registry;
mod visit;

use thiserror::Error;

// ============ Primary Public API ============

pub use ast::{
    Literal, Node, NodeFamily, NodeKind, NodeList, NodeVariant, Properties, SourcePos, TableName,
};
pub use build::{Batch, BatchBuilder, build, build_with};
pub use factory::{NodeArg, NodeFactory};
pub use node_types::NodeType;
pub use pretty::{PrettyOptions, render, tree_print, tree_print_with};
pub use visit::{FindNode, Rewriter, VisitTrace, Visitor};

/// Build one node through the process-wide registry
pub fn create(code: u16, args: Vec<NodeArg>) -> Result<Node> {
    NodeFactory::new().create(code, args)
}

// ============ Node families ============

pub use ast::{
    ArithmeticOperator, BinaryOperatorNode, ColumnDefinition, ColumnReference,
    ConstraintDefinition, ConstraintOptions, ConstraintType, DclKind, DclStatement, DdlKind,
    DdlStatement, DmlKind, DmlModStatement, DropBehavior, ExistenceCheck, FromBaseTable,
    JoinNode, JoinType, OperatorKind, Parameter, PrivilegeAction, PrivilegeNode,
    PrivilegeObject, PrivilegeObjectType, ResultColumn, RoleKind, RoutineDesignator, SelectNode,
    SetRole, Statement, StatementType, TableElement, TablePrivilege, USAGE_PRIV, ValueClass,
    VerifyType, join_type_to_string,
};

// ============ Errors ============

pub use diagnostics::{
    Arity, CollectedDiagnostics, Diagnostics, Fault, FaultKind, LogDiagnostics, SqlError,
};
pub use parse::ParseError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Internal-consistency failure; aborts the current compile unit
    #[error("internal fault: {0}")]
    Fault(#[from] Fault),
    #[error("SQL error: {0}")]
    Sql(#[from] SqlError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn is_fault(&self) -> bool {
        matches!(self, Error::Fault(_))
    }

    /// Tag a SQL error with `pos` unless it already carries a position
    pub(crate) fn at_pos(self, pos: SourcePos) -> Self {
        match self {
            Error::Sql(e) => Error::Sql(e.or_at(pos)),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// ============ Advanced: registry and script access ============

/// Registry entries, initializer argument access and the parsed script form
/// (for custom node registrations or tooling)
pub mod advanced {
    pub use crate::build::reduce;
    pub use crate::factory::ArgReader;
    pub use crate::parse::{CodeRef, Production, ScriptArg, parse_production, parse_script};
    pub use crate::registry::{Initializer, NodeRegistry, NodeSpec};
}
