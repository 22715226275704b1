//! Faults, SQL errors and the diagnostics sink
//!
//! Two disjoint taxonomies:
//! - [`Fault`]: internal-consistency failures (grammar/registry pairing bugs).
//!   They abort the current compile unit.
//! - [`SqlError`]: position-tagged problems with the SQL itself. They abandon
//!   only the current statement.

use std::fmt;

use thiserror::Error;

use crate::ast::{NodeVariant, SourcePos};
use crate::node_types::NodeType;

/// Accepted argument count for a node-type code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    /// `None` for variadic shapes
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepts(&self, n: usize) -> bool {
        n >= self.min && self.max.is_none_or(|max| n <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", self.min),
            Some(max) => write!(f, "{}..={}", self.min, max),
            None => write!(f, "{} or more", self.min),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("unknown node type code {0}")]
    UnknownNodeType(u16),

    #[error("{node_type} expects {expected} arguments, got {got}")]
    ArityMismatch {
        node_type: NodeType,
        expected: Arity,
        got: usize,
    },

    #[error("{node_type} argument {index}: expected {expected}, got {got}")]
    ArgumentMismatch {
        node_type: NodeType,
        index: usize,
        expected: &'static str,
        got: &'static str,
    },

    #[error("cannot copy a {from:?} node into a {target:?} node")]
    TypeMismatch { target: NodeVariant, from: NodeVariant },

    #[error("invalid {domain} value {value}")]
    InvalidEnumValue { domain: &'static str, value: i64 },

    #[error("{object_type} privileges cannot be built from {arity} arguments")]
    InvalidPrivilegeDomain {
        object_type: &'static str,
        arity: usize,
    },

    #[error("{node_type} is not a {expected} node type")]
    UnexpectedNodeType {
        node_type: NodeType,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    UnknownNodeType,
    ArityMismatch,
    ArgumentMismatch,
    TypeMismatch,
    InvalidEnumValue,
    InvalidPrivilegeDomain,
    UnexpectedNodeType,
}

impl Fault {
    pub fn kind(&self) -> FaultKind {
        match self {
            Fault::UnknownNodeType(_) => FaultKind::UnknownNodeType,
            Fault::ArityMismatch { .. } => FaultKind::ArityMismatch,
            Fault::ArgumentMismatch { .. } => FaultKind::ArgumentMismatch,
            Fault::TypeMismatch { .. } => FaultKind::TypeMismatch,
            Fault::InvalidEnumValue { .. } => FaultKind::InvalidEnumValue,
            Fault::InvalidPrivilegeDomain { .. } => FaultKind::InvalidPrivilegeDomain,
            Fault::UnexpectedNodeType { .. } => FaultKind::UnexpectedNodeType,
        }
    }

    /// The offending value, rendered for a diagnostics collaborator
    pub fn value(&self) -> String {
        match self {
            Fault::UnknownNodeType(code) => code.to_string(),
            Fault::ArityMismatch { got, .. } => got.to_string(),
            Fault::ArgumentMismatch { got, .. } => (*got).to_string(),
            Fault::TypeMismatch { from, .. } => format!("{from:?}"),
            Fault::InvalidEnumValue { value, .. } => value.to_string(),
            Fault::InvalidPrivilegeDomain { object_type, .. } => (*object_type).to_string(),
            Fault::UnexpectedNodeType { node_type, .. } => node_type.to_string(),
        }
    }
}

/// A problem with the SQL being compiled, tagged with its source position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (at {pos})")]
pub struct SqlError {
    pub message: String,
    pub pos: SourcePos,
}

impl SqlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            pos: SourcePos::default(),
        }
    }

    pub fn at(mut self, pos: SourcePos) -> Self {
        self.pos = pos;
        self
    }

    /// Attach `pos` unless a more precise position is already known
    pub(crate) fn or_at(self, pos: SourcePos) -> Self {
        if self.pos.is_unknown() {
            self.at(pos)
        } else {
            self
        }
    }
}

/// Receiver for faults and SQL errors raised while building trees
pub trait Diagnostics {
    fn fault(&mut self, fault: &Fault);
    fn sql_error(&mut self, error: &SqlError);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn fault(&mut self, fault: &Fault) {
        log::error!(
            "internal fault {:?} (value {}): {}",
            fault.kind(),
            fault.value(),
            fault
        );
    }

    fn sql_error(&mut self, error: &SqlError) {
        log::warn!("{}", error);
    }
}

/// Stores diagnostics for later inspection
#[derive(Debug, Default, Clone)]
pub struct CollectedDiagnostics {
    pub faults: Vec<Fault>,
    pub sql_errors: Vec<SqlError>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty() && self.sql_errors.is_empty()
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn fault(&mut self, fault: &Fault) {
        self.faults.push(fault.clone());
    }

    fn sql_error(&mut self, error: &SqlError) {
        self.sql_errors.push(error.clone());
    }
}
