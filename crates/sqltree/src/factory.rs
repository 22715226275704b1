//! Node factory
//!
//! The grammar layer only ever names a node-type code and a tuple of
//! positional arguments. The factory resolves the code through the
//! [`NodeRegistry`], checks the argument count against the registered arity
//! and runs the variant's initializer, which reads its arguments through a
//! typed [`ArgReader`].

use crate::Result;
use crate::ast::{
    Literal, Node, Properties, PrivilegeObject, RoutineDesignator, SourcePos, TableName,
    TablePrivilege,
};
use crate::diagnostics::Fault;
use crate::node_types::NodeType;
use crate::registry::NodeRegistry;

/// One positional initializer argument
#[derive(Debug, Clone, PartialEq)]
pub enum NodeArg {
    /// An absent optional argument
    Null,
    Node(Node),
    Name(TableName),
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Properties(Properties),
    Names(Vec<String>),
    Privileges(Vec<TablePrivilege>),
    Routine(RoutineDesignator),
}

impl NodeArg {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeArg::Null => "null",
            NodeArg::Node(_) => "node",
            NodeArg::Name(_) => "name",
            NodeArg::Str(_) => "string",
            NodeArg::Int(_) => "int",
            NodeArg::Float(_) => "float",
            NodeArg::Bool(_) => "bool",
            NodeArg::Properties(_) => "properties",
            NodeArg::Names(_) => "name list",
            NodeArg::Privileges(_) => "privilege list",
            NodeArg::Routine(_) => "routine",
        }
    }

    pub fn str(s: impl Into<String>) -> Self {
        NodeArg::Str(s.into())
    }

    pub fn name(table: impl Into<String>) -> Self {
        NodeArg::Name(TableName::new(table))
    }

    pub fn opt_node(node: Option<Node>) -> Self {
        node.map_or(NodeArg::Null, NodeArg::Node)
    }
}

impl From<Node> for NodeArg {
    fn from(node: Node) -> Self {
        NodeArg::Node(node)
    }
}

impl From<TableName> for NodeArg {
    fn from(name: TableName) -> Self {
        NodeArg::Name(name)
    }
}

impl From<i64> for NodeArg {
    fn from(n: i64) -> Self {
        NodeArg::Int(n)
    }
}

impl From<bool> for NodeArg {
    fn from(b: bool) -> Self {
        NodeArg::Bool(b)
    }
}

impl From<&str> for NodeArg {
    fn from(s: &str) -> Self {
        NodeArg::Str(s.to_string())
    }
}

/// Sequential, typed access to an initializer's arguments.
///
/// Optional readers treat both an explicit `Null` and a missing trailing
/// argument as absent.
pub struct ArgReader {
    node_type: NodeType,
    args: std::vec::IntoIter<NodeArg>,
    index: usize,
    len: usize,
}

impl ArgReader {
    pub fn new(node_type: NodeType, args: Vec<NodeArg>) -> Self {
        let len = args.len();
        Self {
            node_type,
            args: args.into_iter(),
            index: 0,
            len,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Total number of arguments supplied
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining(&self) -> usize {
        self.len - self.index
    }

    fn next(&mut self) -> Option<NodeArg> {
        let arg = self.args.next();
        if arg.is_some() {
            self.index += 1;
        }
        arg
    }

    fn mismatch(&self, expected: &'static str, got: Option<&NodeArg>) -> Fault {
        Fault::ArgumentMismatch {
            node_type: self.node_type,
            index: self.index,
            expected,
            got: got.map_or("nothing", NodeArg::kind_name),
        }
    }

    pub fn node(&mut self) -> std::result::Result<Node, Fault> {
        match self.next() {
            Some(NodeArg::Node(node)) => Ok(node),
            other => Err(self.mismatch("node", other.as_ref())),
        }
    }

    pub fn opt_node(&mut self) -> std::result::Result<Option<Node>, Fault> {
        match self.next() {
            Some(NodeArg::Node(node)) => Ok(Some(node)),
            Some(NodeArg::Null) | None => Ok(None),
            other => Err(self.mismatch("node or null", other.as_ref())),
        }
    }

    /// All remaining arguments, each of which must be a node
    pub fn rest_nodes(&mut self) -> std::result::Result<Vec<Node>, Fault> {
        let mut nodes = Vec::with_capacity(self.remaining());
        while self.remaining() > 0 {
            nodes.push(self.node()?);
        }
        Ok(nodes)
    }

    pub fn name(&mut self) -> std::result::Result<TableName, Fault> {
        match self.next() {
            Some(NodeArg::Name(name)) => Ok(name),
            other => Err(self.mismatch("name", other.as_ref())),
        }
    }

    pub fn opt_name(&mut self) -> std::result::Result<Option<TableName>, Fault> {
        match self.next() {
            Some(NodeArg::Name(name)) => Ok(Some(name)),
            Some(NodeArg::Null) | None => Ok(None),
            other => Err(self.mismatch("name or null", other.as_ref())),
        }
    }

    pub fn string(&mut self) -> std::result::Result<String, Fault> {
        match self.next() {
            Some(NodeArg::Str(s)) => Ok(s),
            other => Err(self.mismatch("string", other.as_ref())),
        }
    }

    pub fn opt_string(&mut self) -> std::result::Result<Option<String>, Fault> {
        match self.next() {
            Some(NodeArg::Str(s)) => Ok(Some(s)),
            Some(NodeArg::Null) | None => Ok(None),
            other => Err(self.mismatch("string or null", other.as_ref())),
        }
    }

    pub fn int(&mut self) -> std::result::Result<i64, Fault> {
        match self.next() {
            Some(NodeArg::Int(n)) => Ok(n),
            other => Err(self.mismatch("int", other.as_ref())),
        }
    }

    pub fn opt_int(&mut self) -> std::result::Result<Option<i64>, Fault> {
        match self.next() {
            Some(NodeArg::Int(n)) => Ok(Some(n)),
            Some(NodeArg::Null) | None => Ok(None),
            other => Err(self.mismatch("int or null", other.as_ref())),
        }
    }

    pub fn bool(&mut self) -> std::result::Result<bool, Fault> {
        match self.next() {
            Some(NodeArg::Bool(b)) => Ok(b),
            other => Err(self.mismatch("bool", other.as_ref())),
        }
    }

    pub fn opt_bool(&mut self) -> std::result::Result<Option<bool>, Fault> {
        match self.next() {
            Some(NodeArg::Bool(b)) => Ok(Some(b)),
            Some(NodeArg::Null) | None => Ok(None),
            other => Err(self.mismatch("bool or null", other.as_ref())),
        }
    }

    pub fn opt_properties(&mut self) -> std::result::Result<Option<Properties>, Fault> {
        match self.next() {
            Some(NodeArg::Properties(props)) => Ok(Some(props)),
            Some(NodeArg::Null) | None => Ok(None),
            other => Err(self.mismatch("properties or null", other.as_ref())),
        }
    }

    pub fn names(&mut self) -> std::result::Result<Vec<String>, Fault> {
        match self.next() {
            Some(NodeArg::Names(names)) => Ok(names),
            other => Err(self.mismatch("name list", other.as_ref())),
        }
    }

    pub fn opt_privileges(&mut self) -> std::result::Result<Option<Vec<TablePrivilege>>, Fault> {
        match self.next() {
            Some(NodeArg::Privileges(privs)) => Ok(Some(privs)),
            Some(NodeArg::Null) | None => Ok(None),
            other => Err(self.mismatch("privilege list or null", other.as_ref())),
        }
    }

    /// A constant value; `Null` reads as the SQL NULL literal. NaN and the
    /// infinities have no SQL spelling and are rejected.
    pub fn literal(&mut self) -> std::result::Result<Literal, Fault> {
        match self.next() {
            Some(NodeArg::Int(n)) => Ok(Literal::Int(n)),
            Some(NodeArg::Float(x)) if x.is_finite() => Ok(Literal::Float(x)),
            Some(NodeArg::Float(_)) => Err(Fault::ArgumentMismatch {
                node_type: self.node_type,
                index: self.index,
                expected: "finite number",
                got: "non-finite float",
            }),
            Some(NodeArg::Str(s)) => Ok(Literal::String(s)),
            Some(NodeArg::Bool(b)) => Ok(Literal::Bool(b)),
            Some(NodeArg::Null) => Ok(Literal::Null),
            other => Err(self.mismatch("literal", other.as_ref())),
        }
    }

    /// A table name or a routine designator
    pub fn privilege_object(&mut self) -> std::result::Result<PrivilegeObject, Fault> {
        match self.next() {
            Some(NodeArg::Name(name)) => Ok(PrivilegeObject::Table(name)),
            Some(NodeArg::Routine(routine)) => Ok(PrivilegeObject::Routine(routine)),
            other => Err(self.mismatch("name or routine", other.as_ref())),
        }
    }
}

/// Builds nodes from `(code, args)` pairs
#[derive(Debug, Clone, Copy)]
pub struct NodeFactory<'r> {
    registry: &'r NodeRegistry,
}

impl NodeFactory<'static> {
    /// Factory over the process-wide registry
    pub fn new() -> Self {
        Self {
            registry: NodeRegistry::global(),
        }
    }
}

impl Default for NodeFactory<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> NodeFactory<'r> {
    pub fn with_registry(registry: &'r NodeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r NodeRegistry {
        self.registry
    }

    pub fn create(&self, code: u16, args: Vec<NodeArg>) -> Result<Node> {
        self.create_at(code, args, SourcePos::default())
    }

    /// Build a node and stamp its source position. SQL errors raised by the
    /// initializer are tagged with `pos` when they carry no position of
    /// their own.
    pub fn create_at(&self, code: u16, args: Vec<NodeArg>, pos: SourcePos) -> Result<Node> {
        let spec = self.registry.lookup(code)?;
        if !spec.arity.accepts(args.len()) {
            return Err(Fault::ArityMismatch {
                node_type: spec.node_type,
                expected: spec.arity,
                got: args.len(),
            }
            .into());
        }

        log::trace!("create {} with {} args at {}", spec.node_type, args.len(), pos);
        let mut reader = ArgReader::new(spec.node_type, args);
        let kind = (spec.init)(spec.node_type, &mut reader).map_err(|e| e.at_pos(pos))?;
        if kind.variant() != spec.variant {
            return Err(Fault::TypeMismatch {
                target: spec.variant,
                from: kind.variant(),
            }
            .into());
        }

        let mut node = Node::new(spec.node_type, kind);
        node.set_pos(pos);
        Ok(node)
    }

    /// Convenience for callers holding a typed code
    pub fn make(&self, node_type: NodeType, args: Vec<NodeArg>) -> Result<Node> {
        self.create(node_type.code(), args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::ast::NodeVariant;

    fn col(name: &str) -> Node {
        NodeFactory::new()
            .make(NodeType::ColumnReference, vec![NodeArg::str(name)])
            .unwrap()
    }

    #[test]
    fn create_resolves_variant() {
        let node = NodeFactory::new()
            .make(
                NodeType::BinaryPlusOperator,
                vec![col("a").into(), col("b").into()],
            )
            .unwrap();
        assert_eq!(node.variant(), NodeVariant::BinaryArithmeticOperator);
        assert_eq!(node.node_type(), NodeType::BinaryPlusOperator);
    }

    #[test]
    fn unknown_code_is_a_fault() {
        let err = NodeFactory::new().create(999, vec![]).unwrap_err();
        assert_eq!(err, Error::Fault(Fault::UnknownNodeType(999)));
    }

    #[test]
    fn arity_is_checked_before_initializing() {
        let err = NodeFactory::new()
            .make(NodeType::BinaryPlusOperator, vec![col("a").into()])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Fault(Fault::ArityMismatch { got: 1, .. })
        ));
    }

    #[test]
    fn wrong_argument_kind_is_a_fault() {
        let err = NodeFactory::new()
            .make(
                NodeType::BinaryPlusOperator,
                vec![col("a").into(), NodeArg::Int(1)],
            )
            .unwrap_err();
        assert_eq!(
            err,
            Error::Fault(Fault::ArgumentMismatch {
                node_type: NodeType::BinaryPlusOperator,
                index: 2,
                expected: "node",
                got: "int",
            })
        );
    }

    #[test]
    fn non_finite_constants_are_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = NodeFactory::new()
                .make(NodeType::Constant, vec![NodeArg::Float(value)])
                .unwrap_err();
            assert!(matches!(
                err,
                Error::Fault(Fault::ArgumentMismatch {
                    index: 1,
                    got: "non-finite float",
                    ..
                })
            ));
        }
    }

    #[test]
    fn sql_errors_are_tagged_with_position() {
        let err = NodeFactory::new()
            .create_at(
                NodeType::DropView.code(),
                vec![NodeArg::name("v"), NodeArg::Int(2)],
                SourcePos::new(10, 30),
            )
            .unwrap_err();
        match err {
            Error::Sql(e) => assert_eq!(e.pos, SourcePos::new(10, 30)),
            other => panic!("expected SQL error, got {other:?}"),
        }
    }
}
