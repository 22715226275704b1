//! Table elements: column definitions and constraint definitions

use std::fmt;

use super::{Node, Properties, TableName};
use crate::diagnostics::{Fault, SqlError};
use crate::visit::{Visitor, accept_opt};

#[derive(Debug, Clone, PartialEq)]
pub enum TableElement {
    Column(ColumnDefinition),
    Constraint(ConstraintDefinition),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default_value: Option<Box<Node>>,
}

impl ColumnDefinition {
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<String>,
        nullable: bool,
        default_value: Option<Node>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
            default_value: default_value.map(Box::new),
        }
    }

    /// Visits the default value expression
    pub(crate) fn accept_children(mut self, v: &mut dyn Visitor) -> crate::Result<Self> {
        self.default_value = accept_opt(self.default_value, v)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintType {
    NotNull = 1,
    PrimaryKey = 2,
    Unique = 3,
    Check = 4,
    /// ALTER TABLE ... DROP CONSTRAINT
    Drop = 5,
    ForeignKey = 6,
}

impl ConstraintType {
    pub fn from_code(code: i64) -> Result<Self, Fault> {
        match code {
            1 => Ok(ConstraintType::NotNull),
            2 => Ok(ConstraintType::PrimaryKey),
            3 => Ok(ConstraintType::Unique),
            4 => Ok(ConstraintType::Check),
            5 => Ok(ConstraintType::Drop),
            6 => Ok(ConstraintType::ForeignKey),
            other => Err(Fault::InvalidEnumValue {
                domain: "constraint type",
                value: other,
            }),
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintType::NotNull => "NOT NULL",
            ConstraintType::PrimaryKey => "PRIMARY KEY",
            ConstraintType::Unique => "UNIQUE",
            ConstraintType::Check => "CHECK",
            ConstraintType::Drop => "DROP",
            ConstraintType::ForeignKey => "FOREIGN KEY",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DropBehavior {
    Cascade = 0,
    Restrict = 1,
    /// No default-value drop
    #[default]
    Default = 2,
}

impl DropBehavior {
    pub fn from_code(code: i64) -> Result<Self, Fault> {
        match code {
            0 => Ok(DropBehavior::Cascade),
            1 => Ok(DropBehavior::Restrict),
            2 => Ok(DropBehavior::Default),
            other => Err(Fault::InvalidEnumValue {
                domain: "drop behavior",
                value: other,
            }),
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Whether dropping a constraint must first verify its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerifyType {
    #[default]
    None = 0,
    CheckType = 1,
}

impl VerifyType {
    pub fn from_code(code: i64) -> Result<Self, Fault> {
        match code {
            0 => Ok(VerifyType::None),
            1 => Ok(VerifyType::CheckType),
            other => Err(Fault::InvalidEnumValue {
                domain: "verify type",
                value: other,
            }),
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Trailing constraint settings, defaulted when the grammar omits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstraintOptions {
    pub behavior: DropBehavior,
    pub verify_type: VerifyType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDefinition {
    constraint_name: Option<TableName>,
    name: Option<String>,
    constraint_type: ConstraintType,
    column_list: Option<Box<Node>>,
    properties: Option<Properties>,
    check_condition: Option<Box<Node>>,
    constraint_text: Option<String>,
    behavior: DropBehavior,
    verify_type: VerifyType,
}

impl ConstraintDefinition {
    pub fn new(
        constraint_name: Option<TableName>,
        constraint_type: ConstraintType,
        column_list: Option<Node>,
        properties: Option<Properties>,
        check_condition: Option<Node>,
        constraint_text: Option<String>,
        options: ConstraintOptions,
    ) -> Result<Self, SqlError> {
        match (constraint_type, &check_condition) {
            (ConstraintType::Check, None) => {
                return Err(SqlError::new("CHECK constraint requires a condition"));
            }
            (ConstraintType::Check, Some(_)) | (_, None) => {}
            (other, Some(_)) => {
                return Err(SqlError::new(format!(
                    "{other} constraint cannot have a check condition"
                )));
            }
        }

        let name = constraint_name
            .as_ref()
            .map(|n| n.table_name().to_string());
        Ok(Self {
            constraint_name,
            name,
            constraint_type,
            column_list: column_list.map(Box::new),
            properties,
            check_condition: check_condition.map(Box::new),
            constraint_text,
            behavior: options.behavior,
            verify_type: options.verify_type,
        })
    }

    pub fn constraint_name(&self) -> Option<&TableName> {
        self.constraint_name.as_ref()
    }

    /// Simple identifier of the constraint name, if one was given
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn constraint_type(&self) -> ConstraintType {
        self.constraint_type
    }

    pub fn column_list(&self) -> Option<&Node> {
        self.column_list.as_deref()
    }

    /// Properties for the backing index
    pub fn properties(&self) -> Option<&Properties> {
        self.properties.as_ref()
    }

    pub fn set_properties(&mut self, properties: Properties) {
        self.properties = Some(properties);
    }

    pub fn check_condition(&self) -> Option<&Node> {
        self.check_condition.as_deref()
    }

    pub fn constraint_text(&self) -> Option<&str> {
        self.constraint_text.as_deref()
    }

    pub fn behavior(&self) -> DropBehavior {
        self.behavior
    }

    pub fn verify_type(&self) -> VerifyType {
        self.verify_type
    }

    pub fn options(&self) -> ConstraintOptions {
        ConstraintOptions {
            behavior: self.behavior,
            verify_type: self.verify_type,
        }
    }

    /// Visits the column list, then the check condition
    pub(crate) fn accept_children(mut self, v: &mut dyn Visitor) -> crate::Result<Self> {
        self.column_list = accept_opt(self.column_list, v)?;
        self.check_condition = accept_opt(self.check_condition, v)?;
        Ok(self)
    }
}
