//! Privileges granted or revoked on one object

use std::fmt;

use super::TableName;
use crate::diagnostics::Fault;

pub const USAGE_PRIV: &str = "USAGE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivilegeObjectType {
    Table = 0,
    Routine = 1,
    Sequence = 2,
    Udt = 3,
}

impl PrivilegeObjectType {
    pub fn from_code(code: i64) -> Result<Self, Fault> {
        match code {
            0 => Ok(PrivilegeObjectType::Table),
            1 => Ok(PrivilegeObjectType::Routine),
            2 => Ok(PrivilegeObjectType::Sequence),
            3 => Ok(PrivilegeObjectType::Udt),
            other => Err(Fault::InvalidEnumValue {
                domain: "privilege object type",
                value: other,
            }),
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrivilegeObjectType::Table => "TABLE",
            PrivilegeObjectType::Routine => "ROUTINE",
            PrivilegeObjectType::Sequence => "SEQUENCE",
            PrivilegeObjectType::Udt => "UDT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivilegeAction {
    Select,
    Delete,
    Insert,
    Update,
    References,
    Trigger,
}

impl PrivilegeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PrivilegeAction::Select => "SELECT",
            PrivilegeAction::Delete => "DELETE",
            PrivilegeAction::Insert => "INSERT",
            PrivilegeAction::Update => "UPDATE",
            PrivilegeAction::References => "REFERENCES",
            PrivilegeAction::Trigger => "TRIGGER",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            PrivilegeAction::Select,
            PrivilegeAction::Delete,
            PrivilegeAction::Insert,
            PrivilegeAction::Update,
            PrivilegeAction::References,
            PrivilegeAction::Trigger,
        ]
        .into_iter()
        .find(|a| a.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PrivilegeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One table privilege, optionally limited to some columns
/// (`UPDATE(a, b)`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePrivilege {
    pub action: PrivilegeAction,
    pub columns: Option<Vec<String>>,
}

impl TablePrivilege {
    pub fn new(action: PrivilegeAction) -> Self {
        Self {
            action,
            columns: None,
        }
    }

    pub fn on_columns(action: PrivilegeAction, columns: Vec<String>) -> Self {
        Self {
            action,
            columns: Some(columns),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineDesignator {
    pub name: TableName,
    pub is_function: bool,
    /// `None` when the signature was not spelled out
    pub param_types: Option<Vec<String>>,
}

/// What a GRANT/REVOKE applies to. Each object domain carries only the
/// fields valid for it.
#[derive(Debug, Clone, PartialEq)]
pub enum PrivilegeNode {
    Table {
        object_name: TableName,
        specific_privileges: Vec<TablePrivilege>,
    },
    Routine {
        designator: RoutineDesignator,
    },
    Sequence {
        object_name: TableName,
        privilege: String,
        restrict: bool,
    },
    Udt {
        object_name: TableName,
        privilege: String,
        restrict: bool,
    },
}

impl PrivilegeNode {
    pub fn object_type(&self) -> PrivilegeObjectType {
        match self {
            PrivilegeNode::Table { .. } => PrivilegeObjectType::Table,
            PrivilegeNode::Routine { .. } => PrivilegeObjectType::Routine,
            PrivilegeNode::Sequence { .. } => PrivilegeObjectType::Sequence,
            PrivilegeNode::Udt { .. } => PrivilegeObjectType::Udt,
        }
    }

    pub fn object_name(&self) -> &TableName {
        match self {
            PrivilegeNode::Table { object_name, .. }
            | PrivilegeNode::Sequence { object_name, .. }
            | PrivilegeNode::Udt { object_name, .. } => object_name,
            PrivilegeNode::Routine { designator } => &designator.name,
        }
    }

    /// Initializer for table and routine privileges
    pub fn table_or_routine(
        object_type: PrivilegeObjectType,
        object: PrivilegeObject,
        specific_privileges: Option<Vec<TablePrivilege>>,
    ) -> Result<Self, Fault> {
        match (object_type, object) {
            (PrivilegeObjectType::Table, PrivilegeObject::Table(object_name)) => {
                Ok(PrivilegeNode::Table {
                    object_name,
                    specific_privileges: specific_privileges.unwrap_or_default(),
                })
            }
            (PrivilegeObjectType::Routine, PrivilegeObject::Routine(designator))
                if specific_privileges.is_none() =>
            {
                Ok(PrivilegeNode::Routine { designator })
            }
            (object_type, _) => Err(Fault::InvalidPrivilegeDomain {
                object_type: object_type.as_str(),
                arity: 3,
            }),
        }
    }

    /// Initializer for sequence and UDT usage privileges
    pub fn usage(
        object_type: PrivilegeObjectType,
        object_name: TableName,
        privilege: String,
        restrict: bool,
    ) -> Result<Self, Fault> {
        match object_type {
            PrivilegeObjectType::Sequence => Ok(PrivilegeNode::Sequence {
                object_name,
                privilege,
                restrict,
            }),
            PrivilegeObjectType::Udt => Ok(PrivilegeNode::Udt {
                object_name,
                privilege,
                restrict,
            }),
            other => Err(Fault::InvalidPrivilegeDomain {
                object_type: other.as_str(),
                arity: 4,
            }),
        }
    }
}

/// Object a table/routine privilege applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivilegeObject {
    Table(TableName),
    Routine(RoutineDesignator),
}
