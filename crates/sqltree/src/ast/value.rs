//! Leaf value expressions

use super::TableName;

/// `[schema.]table.column` or a bare `column`
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnReference {
    pub column_name: String,
    pub table_name: Option<TableName>,
}

impl ColumnReference {
    pub fn new(column_name: impl Into<String>, table_name: Option<TableName>) -> Self {
        Self {
            column_name: column_name.into(),
            table_name,
        }
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn table_name(&self) -> Option<&TableName> {
        self.table_name.as_ref()
    }
}

/// Dynamic parameter marker `?`, numbered from 0 in source order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub number: u32,
}
