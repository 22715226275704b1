//! Node-type registry
//!
//! Maps every node-type code to the concrete variant it builds, the argument
//! counts it accepts and the initializer that reads those arguments. The
//! process-wide instance is built once on first use and never changes.

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::Result;
use crate::ast::{NodeKind, NodeVariant};
use crate::diagnostics::{Arity, Fault};
use crate::factory::ArgReader;
use crate::init;
use crate::node_types::NodeType;

/// Reads a node's arguments and builds its payload
pub type Initializer = fn(NodeType, &mut ArgReader) -> Result<NodeKind>;

/// Registration entry for one node-type code
#[derive(Clone, Copy)]
pub struct NodeSpec {
    pub node_type: NodeType,
    pub variant: NodeVariant,
    pub arity: Arity,
    pub init: Initializer,
}

impl NodeSpec {
    pub fn new(node_type: NodeType, variant: NodeVariant, arity: Arity, init: Initializer) -> Self {
        Self {
            node_type,
            variant,
            arity,
            init,
        }
    }
}

impl fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSpec")
            .field("node_type", &self.node_type)
            .field("variant", &self.variant)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    specs: IndexMap<u16, NodeSpec>,
}

impl NodeRegistry {
    /// Registry with every builtin node type
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_nodes();
        registry
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static NodeRegistry {
        static REGISTRY: OnceLock<NodeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let registry = NodeRegistry::new();
            log::debug!("node registry loaded with {} node types", registry.len());
            registry
        })
    }

    /// Register `spec`, returning the entry it replaces
    pub fn register(&mut self, spec: NodeSpec) -> Option<NodeSpec> {
        self.specs.insert(spec.node_type.code(), spec)
    }

    pub fn lookup(&self, code: u16) -> std::result::Result<&NodeSpec, Fault> {
        self.specs.get(&code).ok_or(Fault::UnknownNodeType(code))
    }

    pub fn get(&self, node_type: NodeType) -> Option<&NodeSpec> {
        self.specs.get(&node_type.code())
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &NodeSpec> {
        self.specs.values()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    fn register_builtin_nodes(&mut self) {
        use NodeType as T;
        use NodeVariant as V;

        let binary = Arity::exactly(2);
        let list = Arity::at_least(0);

        let builtins: [(NodeType, NodeVariant, Arity, Initializer); 29] = [
            (T::ColumnReference, V::ColumnReference, Arity::between(1, 2), init::column_reference),
            (T::Constant, V::Constant, Arity::exactly(1), init::constant),
            (T::Parameter, V::Parameter, Arity::exactly(1), init::parameter),
            (T::BinaryPlusOperator, V::BinaryArithmeticOperator, binary, init::arithmetic),
            (T::BinaryMinusOperator, V::BinaryArithmeticOperator, binary, init::arithmetic),
            (T::BinaryTimesOperator, V::BinaryArithmeticOperator, binary, init::arithmetic),
            (T::BinaryDivideOperator, V::BinaryArithmeticOperator, binary, init::arithmetic),
            (T::ModOperator, V::BinaryArithmeticOperator, binary, init::arithmetic),
            (T::BinaryDivOperator, V::BinaryArithmeticOperator, binary, init::arithmetic),
            (T::ConcatenationOperator, V::ConcatenationOperator, binary, init::concatenation),
            (T::ResultColumn, V::ResultColumn, binary, init::result_column),
            (T::ResultColumnList, V::ResultColumnList, list, init::result_column_list),
            (T::FromBaseTable, V::FromBaseTable, Arity::between(2, 3), init::from_base_table),
            (T::FromList, V::FromList, list, init::from_list),
            (T::Select, V::Select, Arity::exactly(3), init::select),
            (T::Join, V::Join, Arity::between(6, 8), init::join),
            (T::Delete, V::Delete, binary, init::delete),
            (T::Insert, V::Insert, Arity::exactly(3), init::insert),
            (T::Update, V::Update, binary, init::update),
            (T::DropTable, V::DropTable, Arity::between(1, 3), init::drop_table),
            (T::DropView, V::DropView, Arity::between(1, 2), init::drop_view),
            (T::CreateTable, V::CreateTable, Arity::between(2, 3), init::create_table),
            (T::SetRole, V::SetRole, Arity::between(1, 2), init::set_role),
            (T::Grant, V::Grant, binary, init::grant),
            (T::Revoke, V::Revoke, binary, init::revoke),
            (
                T::ColumnDefinition,
                V::ColumnDefinition,
                Arity::between(2, 4),
                init::column_definition,
            ),
            (
                T::ConstraintDefinition,
                V::ConstraintDefinition,
                Arity::between(6, 8),
                init::constraint_definition,
            ),
            (T::TableElementList, V::TableElementList, list, init::table_element_list),
            (T::Privilege, V::Privilege, Arity::between(3, 4), init::privilege),
        ];

        for (node_type, variant, arity, init) in builtins {
            self.register(NodeSpec::new(node_type, variant, arity, init));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_node_type_is_registered() {
        let registry = NodeRegistry::new();
        assert_eq!(registry.len(), NodeType::ALL.len());
        for node_type in NodeType::ALL {
            let spec = registry.lookup(node_type.code()).unwrap();
            assert_eq!(spec.node_type, node_type);
        }
    }

    #[test]
    fn lookup_of_unregistered_code_faults() {
        let registry = NodeRegistry::new();
        assert_eq!(
            registry.lookup(4).unwrap_err(),
            Fault::UnknownNodeType(4)
        );
        assert!(NodeRegistry::empty().lookup(1).is_err());
    }

    #[test]
    fn arithmetic_codes_share_one_variant() {
        let registry = NodeRegistry::global();
        let variants: Vec<_> = registry
            .iter()
            .filter(|spec| (10..=15).contains(&spec.node_type.code()))
            .map(|spec| spec.variant)
            .collect();
        assert_eq!(variants.len(), 6);
        assert!(variants.iter().all(|v| *v == NodeVariant::BinaryArithmeticOperator));
    }

    #[test]
    fn register_replaces_existing_entry() {
        let mut registry = NodeRegistry::new();
        let replaced = registry.register(NodeSpec::new(
            NodeType::Parameter,
            NodeVariant::Parameter,
            Arity::between(0, 1),
            init::parameter,
        ));
        assert_eq!(replaced.map(|s| s.arity), Some(Arity::exactly(1)));
        assert_eq!(
            registry.get(NodeType::Parameter).map(|s| s.arity),
            Some(Arity::between(0, 1))
        );
        assert_eq!(registry.len(), NodeType::ALL.len());
    }
}
