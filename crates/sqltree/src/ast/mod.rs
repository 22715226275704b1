//! AST types for sqltree
//!
//! Split by family:
//! - `value`: leaf expressions (column references, constants, parameters)
//! - `operator`: binary operators whose metadata derives from the node type
//! - `table`: result columns, base tables, SELECT blocks and joins
//! - `statement`: DML, DDL, DCL and miscellaneous statements
//! - `element`: column and constraint definitions
//! - `privilege`: GRANT/REVOKE privilege descriptors
//!
//! Nodes are only created through the [`NodeFactory`](crate::NodeFactory).

pub mod element;
pub mod operator;
pub mod privilege;
pub mod statement;
pub mod table;
pub mod value;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

use crate::node_types::NodeType;

pub use element::{
    ColumnDefinition, ConstraintDefinition, ConstraintOptions, ConstraintType, DropBehavior,
    TableElement, VerifyType,
};
pub use operator::{ArithmeticOperator, BinaryOperatorNode, OperatorKind, ValueClass};
pub use privilege::{
    PrivilegeAction, PrivilegeNode, PrivilegeObject, PrivilegeObjectType, RoutineDesignator,
    TablePrivilege, USAGE_PRIV,
};
pub use statement::{
    DclKind, DclStatement, DdlKind, DdlStatement, DmlKind, DmlModStatement, ExistenceCheck,
    RoleKind, SetRole, Statement, StatementType,
};
pub use table::{FromBaseTable, JoinNode, JoinType, ResultColumn, SelectNode, join_type_to_string};
pub use value::{ColumnReference, Parameter};

/// Optimizer hints and backing-index properties, kept in insertion order
pub type Properties = IndexMap<String, String>;

/// Byte offsets of a node's source text. `0..0` means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SourcePos {
    pub begin: usize,
    pub end: usize,
}

impl SourcePos {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    pub fn is_unknown(&self) -> bool {
        self.begin == 0 && self.end == 0
    }
}

impl From<std::ops::Range<usize>> for SourcePos {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

/// A possibly schema-qualified object name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    pub schema: Option<String>,
    pub table: String,
}

impl TableName {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
        }
    }

    pub fn qualified(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            table: table.into(),
        }
    }

    /// The unqualified identifier
    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema.as_deref()
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.table),
            None => write!(f, "{}", self.table),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

/// Ordered children of a list node (result columns, FROM list, table elements)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeList {
    pub(crate) items: Vec<Node>,
}

impl NodeList {
    pub fn new(items: Vec<Node>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    ColumnReference(ColumnReference),
    Constant(Literal),
    Parameter(Parameter),
    Operator(BinaryOperatorNode),
    ResultColumn(ResultColumn),
    ResultColumnList(NodeList),
    FromBaseTable(FromBaseTable),
    FromList(NodeList),
    Select(SelectNode),
    Join(JoinNode),
    Statement(Statement),
    TableElement(TableElement),
    TableElementList(NodeList),
    Privilege(PrivilegeNode),
}

/// The concrete variant a node-type code resolves to.
///
/// Several codes may share one variant: all six arithmetic codes build a
/// `BinaryArithmeticOperator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeVariant {
    ColumnReference,
    Constant,
    Parameter,
    BinaryArithmeticOperator,
    ConcatenationOperator,
    ResultColumn,
    ResultColumnList,
    FromBaseTable,
    FromList,
    Select,
    Join,
    Delete,
    Insert,
    Update,
    DropTable,
    DropView,
    CreateTable,
    Grant,
    Revoke,
    SetRole,
    ColumnDefinition,
    ConstraintDefinition,
    TableElementList,
    Privilege,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeFamily {
    Value,
    Operator,
    ResultSet,
    List,
    Statement,
    TableElement,
    Privilege,
}

impl NodeVariant {
    pub fn family(self) -> NodeFamily {
        use NodeVariant as V;
        match self {
            V::ColumnReference | V::Constant | V::Parameter => NodeFamily::Value,
            V::BinaryArithmeticOperator | V::ConcatenationOperator => NodeFamily::Operator,
            V::ResultColumn | V::FromBaseTable | V::Select | V::Join => NodeFamily::ResultSet,
            V::ResultColumnList | V::FromList | V::TableElementList => NodeFamily::List,
            V::Delete
            | V::Insert
            | V::Update
            | V::DropTable
            | V::DropView
            | V::CreateTable
            | V::Grant
            | V::Revoke
            | V::SetRole => NodeFamily::Statement,
            V::ColumnDefinition | V::ConstraintDefinition => NodeFamily::TableElement,
            V::Privilege => NodeFamily::Privilege,
        }
    }
}

impl NodeKind {
    pub fn variant(&self) -> NodeVariant {
        match self {
            NodeKind::ColumnReference(_) => NodeVariant::ColumnReference,
            NodeKind::Constant(_) => NodeVariant::Constant,
            NodeKind::Parameter(_) => NodeVariant::Parameter,
            NodeKind::Operator(op) => match op.kind() {
                OperatorKind::Arithmetic(_) => NodeVariant::BinaryArithmeticOperator,
                OperatorKind::Concatenation => NodeVariant::ConcatenationOperator,
            },
            NodeKind::ResultColumn(_) => NodeVariant::ResultColumn,
            NodeKind::ResultColumnList(_) => NodeVariant::ResultColumnList,
            NodeKind::FromBaseTable(_) => NodeVariant::FromBaseTable,
            NodeKind::FromList(_) => NodeVariant::FromList,
            NodeKind::Select(_) => NodeVariant::Select,
            NodeKind::Join(_) => NodeVariant::Join,
            NodeKind::Statement(stmt) => stmt.variant(),
            NodeKind::TableElement(TableElement::Column(_)) => NodeVariant::ColumnDefinition,
            NodeKind::TableElement(TableElement::Constraint(_)) => {
                NodeVariant::ConstraintDefinition
            }
            NodeKind::TableElementList(_) => NodeVariant::TableElementList,
            NodeKind::Privilege(_) => NodeVariant::Privilege,
        }
    }
}

/// Identity of one constructed node. Clones share it; equality ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u64);

impl NodeId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        NodeId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A tree node: node-type code, source position and variant payload.
///
/// Equality is structural: source positions are ignored.
///
/// The payload is only reachable mutably through the targeted mutators, so
/// the code and the variant cannot drift apart:
///
/// ```compile_fail
/// let mut node = sqltree::build("(DROP_VIEW @v)").unwrap();
/// let _ = node.kind_mut();
/// ```
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    node_type: NodeType,
    pos: SourcePos,
    kind: NodeKind,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.node_type == other.node_type && self.kind == other.kind
    }
}

impl Node {
    pub(crate) fn new(node_type: NodeType, kind: NodeKind) -> Self {
        Self {
            id: NodeId::fresh(),
            node_type,
            pos: SourcePos::default(),
            kind,
        }
    }

    pub(crate) fn id(&self) -> NodeId {
        self.id
    }

    /// Rebuild the payload in place, keeping identity, code and position
    pub(crate) fn map_kind<F>(self, f: F) -> crate::Result<Node>
    where
        F: FnOnce(NodeKind) -> crate::Result<NodeKind>,
    {
        let kind = f(self.kind)?;
        Ok(Self { kind, ..self })
    }

    /// Take `source`'s code, position and payload, keeping this identity
    pub(crate) fn overwrite_from(&mut self, source: &Node) {
        self.node_type = source.node_type;
        self.pos = source.pos;
        self.kind = source.kind.clone();
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn variant(&self) -> NodeVariant {
        self.kind.variant()
    }

    pub fn family(&self) -> NodeFamily {
        self.variant().family()
    }

    pub fn pos(&self) -> SourcePos {
        self.pos
    }

    pub fn set_pos(&mut self, pos: SourcePos) {
        self.pos = pos;
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_operator(&self) -> Option<&BinaryOperatorNode> {
        match &self.kind {
            NodeKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_join(&self) -> Option<&JoinNode> {
        match &self.kind {
            NodeKind::Join(join) => Some(join),
            _ => None,
        }
    }

    pub fn as_join_mut(&mut self) -> Option<&mut JoinNode> {
        match &mut self.kind {
            NodeKind::Join(join) => Some(join),
            _ => None,
        }
    }

    pub fn as_statement(&self) -> Option<&Statement> {
        match &self.kind {
            NodeKind::Statement(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn as_constraint(&self) -> Option<&ConstraintDefinition> {
        match &self.kind {
            NodeKind::TableElement(TableElement::Constraint(c)) => Some(c),
            _ => None,
        }
    }

    pub fn as_constraint_mut(&mut self) -> Option<&mut ConstraintDefinition> {
        match &mut self.kind {
            NodeKind::TableElement(TableElement::Constraint(c)) => Some(c),
            _ => None,
        }
    }

    pub fn as_privilege(&self) -> Option<&PrivilegeNode> {
        match &self.kind {
            NodeKind::Privilege(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&NodeList> {
        match &self.kind {
            NodeKind::ResultColumnList(list)
            | NodeKind::FromList(list)
            | NodeKind::TableElementList(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_column_reference(&self) -> Option<&ColumnReference> {
        match &self.kind {
            NodeKind::ColumnReference(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Literal> {
        match &self.kind {
            NodeKind::Constant(lit) => Some(lit),
            _ => None,
        }
    }
}
