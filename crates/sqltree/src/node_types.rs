//! Node-type codes
//!
//! Every production the grammar reduces is identified by a small integer
//! code. The code selects exactly one concrete node variant and one
//! initializer shape in the [`NodeRegistry`](crate::advanced::NodeRegistry).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum NodeType {
    // Values
    ColumnReference = 1,
    Constant = 2,
    Parameter = 3,

    // Operators
    BinaryPlusOperator = 10,
    BinaryMinusOperator = 11,
    BinaryTimesOperator = 12,
    BinaryDivideOperator = 13,
    ModOperator = 14,
    BinaryDivOperator = 15,
    ConcatenationOperator = 16,

    // Result sets
    ResultColumn = 20,
    ResultColumnList = 21,
    FromBaseTable = 22,
    FromList = 23,
    Select = 24,
    Join = 30,

    // Statements
    Delete = 40,
    Insert = 41,
    Update = 42,
    DropTable = 50,
    DropView = 51,
    CreateTable = 52,
    SetRole = 60,
    Grant = 61,
    Revoke = 62,

    // Table elements and privileges
    ColumnDefinition = 70,
    ConstraintDefinition = 71,
    TableElementList = 72,
    Privilege = 80,
}

impl NodeType {
    pub const ALL: [NodeType; 29] = [
        NodeType::ColumnReference,
        NodeType::Constant,
        NodeType::Parameter,
        NodeType::BinaryPlusOperator,
        NodeType::BinaryMinusOperator,
        NodeType::BinaryTimesOperator,
        NodeType::BinaryDivideOperator,
        NodeType::ModOperator,
        NodeType::BinaryDivOperator,
        NodeType::ConcatenationOperator,
        NodeType::ResultColumn,
        NodeType::ResultColumnList,
        NodeType::FromBaseTable,
        NodeType::FromList,
        NodeType::Select,
        NodeType::Join,
        NodeType::Delete,
        NodeType::Insert,
        NodeType::Update,
        NodeType::DropTable,
        NodeType::DropView,
        NodeType::CreateTable,
        NodeType::SetRole,
        NodeType::Grant,
        NodeType::Revoke,
        NodeType::ColumnDefinition,
        NodeType::ConstraintDefinition,
        NodeType::TableElementList,
        NodeType::Privilege,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Canonical upper-case name, as used in reduction scripts
    pub fn name(self) -> &'static str {
        match self {
            NodeType::ColumnReference => "COLUMN_REFERENCE",
            NodeType::Constant => "CONSTANT",
            NodeType::Parameter => "PARAMETER",
            NodeType::BinaryPlusOperator => "BINARY_PLUS_OPERATOR",
            NodeType::BinaryMinusOperator => "BINARY_MINUS_OPERATOR",
            NodeType::BinaryTimesOperator => "BINARY_TIMES_OPERATOR",
            NodeType::BinaryDivideOperator => "BINARY_DIVIDE_OPERATOR",
            NodeType::ModOperator => "MOD_OPERATOR",
            NodeType::BinaryDivOperator => "BINARY_DIV_OPERATOR",
            NodeType::ConcatenationOperator => "CONCATENATION_OPERATOR",
            NodeType::ResultColumn => "RESULT_COLUMN",
            NodeType::ResultColumnList => "RESULT_COLUMN_LIST",
            NodeType::FromBaseTable => "FROM_BASE_TABLE",
            NodeType::FromList => "FROM_LIST",
            NodeType::Select => "SELECT",
            NodeType::Join => "JOIN",
            NodeType::Delete => "DELETE",
            NodeType::Insert => "INSERT",
            NodeType::Update => "UPDATE",
            NodeType::DropTable => "DROP_TABLE",
            NodeType::DropView => "DROP_VIEW",
            NodeType::CreateTable => "CREATE_TABLE",
            NodeType::SetRole => "SET_ROLE",
            NodeType::Grant => "GRANT",
            NodeType::Revoke => "REVOKE",
            NodeType::ColumnDefinition => "COLUMN_DEFINITION",
            NodeType::ConstraintDefinition => "CONSTRAINT_DEFINITION",
            NodeType::TableElementList => "TABLE_ELEMENT_LIST",
            NodeType::Privilege => "PRIVILEGE",
        }
    }

    /// Look up a code by name. A trailing `_NODE` suffix is accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        let name = upper.strip_suffix("_NODE").unwrap_or(&upper);
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
