//! Top-level statements
//!
//! Every statement reports a fixed [`StatementType`] and a short display
//! label; both are pure functions of the variant.

use std::fmt;

use super::{DropBehavior, Node, NodeVariant, TableName};
use crate::diagnostics::{Fault, SqlError};
use crate::visit::{Visitor, accept_boxed, accept_opt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementType {
    Insert = 1,
    Update = 3,
    Delete = 4,
    Ddl = 10,
    Dcl = 11,
    Misc = 12,
}

impl StatementType {
    pub fn code(self) -> i64 {
        self as i64
    }
}

/// Whether a DDL statement tolerates a missing or duplicate target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExistenceCheck {
    #[default]
    None = 0,
    IfExists = 1,
    IfNotExists = 2,
}

impl ExistenceCheck {
    pub fn from_code(code: i64) -> Result<Self, Fault> {
        match code {
            0 => Ok(ExistenceCheck::None),
            1 => Ok(ExistenceCheck::IfExists),
            2 => Ok(ExistenceCheck::IfNotExists),
            other => Err(Fault::InvalidEnumValue {
                domain: "existence check",
                value: other,
            }),
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for ExistenceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExistenceCheck::None => "NONE",
            ExistenceCheck::IfExists => "IF EXISTS",
            ExistenceCheck::IfNotExists => "IF NOT EXISTS",
        };
        write!(f, "{}", s)
    }
}

// ============ DML ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DmlKind {
    Insert,
    Update,
    Delete,
}

/// INSERT, UPDATE or DELETE.
///
/// The target table is absent for positioned UPDATE/DELETE, whose target is
/// resolved through the named cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct DmlModStatement {
    pub(crate) kind: DmlKind,
    pub(crate) target_table: Option<TableName>,
    pub(crate) target_columns: Option<Box<Node>>,
    pub(crate) query: Box<Node>,
}

impl DmlModStatement {
    pub fn delete(target_table: Option<TableName>, query: Node) -> Self {
        Self {
            kind: DmlKind::Delete,
            target_table,
            target_columns: None,
            query: Box::new(query),
        }
    }

    pub fn update(target_table: Option<TableName>, query: Node) -> Self {
        Self {
            kind: DmlKind::Update,
            target_table,
            target_columns: None,
            query: Box::new(query),
        }
    }

    pub fn insert(target_table: TableName, target_columns: Option<Node>, query: Node) -> Self {
        Self {
            kind: DmlKind::Insert,
            target_table: Some(target_table),
            target_columns: target_columns.map(Box::new),
            query: Box::new(query),
        }
    }

    pub fn kind(&self) -> DmlKind {
        self.kind
    }

    pub fn target_table(&self) -> Option<&TableName> {
        self.target_table.as_ref()
    }

    pub fn target_columns(&self) -> Option<&Node> {
        self.target_columns.as_deref()
    }

    pub fn query(&self) -> &Node {
        &self.query
    }

    /// Visits target columns (INSERT), then the query
    pub(crate) fn accept_children(mut self, v: &mut dyn Visitor) -> crate::Result<Self> {
        self.target_columns = accept_opt(self.target_columns, v)?;
        self.query = accept_boxed(self.query, v)?;
        Ok(self)
    }
}

// ============ DDL ============

#[derive(Debug, Clone, PartialEq)]
pub enum DdlKind {
    DropTable { behavior: DropBehavior },
    DropView,
    CreateTable { elements: Box<Node> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DdlStatement {
    pub(crate) object_name: TableName,
    pub(crate) existence_check: ExistenceCheck,
    pub(crate) kind: DdlKind,
}

impl DdlStatement {
    pub fn drop_table(
        object_name: TableName,
        existence_check: ExistenceCheck,
        behavior: DropBehavior,
    ) -> Result<Self, SqlError> {
        Self::checked(object_name, existence_check, DdlKind::DropTable { behavior })
    }

    pub fn drop_view(
        object_name: TableName,
        existence_check: ExistenceCheck,
    ) -> Result<Self, SqlError> {
        Self::checked(object_name, existence_check, DdlKind::DropView)
    }

    pub fn create_table(
        object_name: TableName,
        elements: Node,
        existence_check: ExistenceCheck,
    ) -> Result<Self, SqlError> {
        Self::checked(
            object_name,
            existence_check,
            DdlKind::CreateTable {
                elements: Box::new(elements),
            },
        )
    }

    fn checked(
        object_name: TableName,
        existence_check: ExistenceCheck,
        kind: DdlKind,
    ) -> Result<Self, SqlError> {
        if object_name.table.is_empty() {
            return Err(SqlError::new("object name cannot be empty"));
        }
        let creates = matches!(kind, DdlKind::CreateTable { .. });
        let invalid = match existence_check {
            ExistenceCheck::None => false,
            ExistenceCheck::IfExists => creates,
            ExistenceCheck::IfNotExists => !creates,
        };
        if invalid {
            return Err(SqlError::new(format!(
                "{} is not allowed on {}",
                existence_check,
                ddl_label(&kind)
            )));
        }
        Ok(Self {
            object_name,
            existence_check,
            kind,
        })
    }

    pub fn object_name(&self) -> &TableName {
        &self.object_name
    }

    pub fn existence_check(&self) -> ExistenceCheck {
        self.existence_check
    }

    pub fn kind(&self) -> &DdlKind {
        &self.kind
    }

    /// Visits the table element list of CREATE TABLE
    pub(crate) fn accept_children(mut self, v: &mut dyn Visitor) -> crate::Result<Self> {
        if let DdlKind::CreateTable { elements } = self.kind {
            self.kind = DdlKind::CreateTable {
                elements: accept_boxed(elements, v)?,
            };
        }
        Ok(self)
    }
}

fn ddl_label(kind: &DdlKind) -> &'static str {
    match kind {
        DdlKind::DropTable { .. } => "DROP TABLE",
        DdlKind::DropView => "DROP VIEW",
        DdlKind::CreateTable { .. } => "CREATE TABLE",
    }
}

// ============ DCL ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DclKind {
    Grant,
    Revoke,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DclStatement {
    pub(crate) kind: DclKind,
    pub(crate) privilege: Box<Node>,
    pub(crate) grantees: Vec<String>,
}

impl DclStatement {
    pub fn new(kind: DclKind, privilege: Node, grantees: Vec<String>) -> Result<Self, SqlError> {
        if grantees.is_empty() {
            return Err(SqlError::new("at least one grantee is required"));
        }
        Ok(Self {
            kind,
            privilege: Box::new(privilege),
            grantees,
        })
    }

    pub fn kind(&self) -> DclKind {
        self.kind
    }

    pub fn privilege(&self) -> &Node {
        &self.privilege
    }

    pub fn grantees(&self) -> &[String] {
        &self.grantees
    }

    /// Visits the privilege
    pub(crate) fn accept_children(mut self, v: &mut dyn Visitor) -> crate::Result<Self> {
        self.privilege = accept_boxed(self.privilege, v)?;
        Ok(self)
    }
}

// ============ Miscellaneous ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoleKind {
    /// `SET ROLE name` or `SET ROLE NONE`
    #[default]
    Named = 0,
    /// `SET ROLE ?`
    Dynamic = 1,
}

impl RoleKind {
    pub fn from_code(code: i64) -> Result<Self, Fault> {
        match code {
            0 => Ok(RoleKind::Named),
            1 => Ok(RoleKind::Dynamic),
            other => Err(Fault::InvalidEnumValue {
                domain: "role kind",
                value: other,
            }),
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetRole {
    /// `None` for `SET ROLE NONE` and for the dynamic form
    pub(crate) role_name: Option<String>,
    pub(crate) kind: RoleKind,
}

impl SetRole {
    pub fn new(role_name: Option<String>, kind: RoleKind) -> Result<Self, SqlError> {
        if kind == RoleKind::Dynamic && role_name.is_some() {
            return Err(SqlError::new(
                "a dynamic SET ROLE takes its role name from a parameter",
            ));
        }
        Ok(Self { role_name, kind })
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role_name.as_deref()
    }

    pub fn kind(&self) -> RoleKind {
        self.kind
    }
}

// ============ Statement ============

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Dml(DmlModStatement),
    Ddl(DdlStatement),
    Dcl(DclStatement),
    SetRole(SetRole),
}

impl Statement {
    pub fn statement_type(&self) -> StatementType {
        match self {
            Statement::Dml(dml) => match dml.kind {
                DmlKind::Insert => StatementType::Insert,
                DmlKind::Update => StatementType::Update,
                DmlKind::Delete => StatementType::Delete,
            },
            Statement::Ddl(_) => StatementType::Ddl,
            Statement::Dcl(_) => StatementType::Dcl,
            Statement::SetRole(_) => StatementType::Misc,
        }
    }

    /// Short display label, e.g. `DROP VIEW`
    pub fn statement_to_string(&self) -> &'static str {
        match self {
            Statement::Dml(dml) => match dml.kind {
                DmlKind::Insert => "INSERT",
                DmlKind::Update => "UPDATE",
                DmlKind::Delete => "DELETE",
            },
            Statement::Ddl(ddl) => ddl_label(&ddl.kind),
            Statement::Dcl(dcl) => match dcl.kind {
                DclKind::Grant => "GRANT",
                DclKind::Revoke => "REVOKE",
            },
            Statement::SetRole(_) => "SET ROLE",
        }
    }

    pub(crate) fn variant(&self) -> NodeVariant {
        match self {
            Statement::Dml(dml) => match dml.kind {
                DmlKind::Insert => NodeVariant::Insert,
                DmlKind::Update => NodeVariant::Update,
                DmlKind::Delete => NodeVariant::Delete,
            },
            Statement::Ddl(ddl) => match ddl.kind {
                DdlKind::DropTable { .. } => NodeVariant::DropTable,
                DdlKind::DropView => NodeVariant::DropView,
                DdlKind::CreateTable { .. } => NodeVariant::CreateTable,
            },
            Statement::Dcl(dcl) => match dcl.kind {
                DclKind::Grant => NodeVariant::Grant,
                DclKind::Revoke => NodeVariant::Revoke,
            },
            Statement::SetRole(_) => NodeVariant::SetRole,
        }
    }

    pub(crate) fn accept_children(self, v: &mut dyn Visitor) -> crate::Result<Self> {
        Ok(match self {
            Statement::Dml(dml) => Statement::Dml(dml.accept_children(v)?),
            Statement::Ddl(ddl) => Statement::Ddl(ddl.accept_children(v)?),
            Statement::Dcl(dcl) => Statement::Dcl(dcl.accept_children(v)?),
            Statement::SetRole(_) => self,
        })
    }
}
