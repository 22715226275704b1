//! Builtin initializers, one per argument shape
//!
//! Enum-valued arguments arrive as raw integer codes. A code outside its
//! enum is a fault; a valid code used where the SQL does not allow it is a
//! SQL error raised by the variant's constructor.

use crate::Result;
use crate::ast::{
    BinaryOperatorNode, ColumnDefinition, ColumnReference, ConstraintDefinition,
    ConstraintOptions, ConstraintType, DclKind, DclStatement, DdlStatement, DmlModStatement,
    DropBehavior, ExistenceCheck, FromBaseTable, JoinNode, JoinType, NodeKind, NodeList,
    NodeVariant, Parameter, PrivilegeNode, PrivilegeObjectType, ResultColumn, RoleKind,
    SelectNode, SetRole, Statement, TableElement, VerifyType,
};
use crate::diagnostics::Fault;
use crate::factory::ArgReader;
use crate::node_types::NodeType;

// ============ Values ============

pub(crate) fn column_reference(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let column = args.string()?;
    let table = args.opt_name()?;
    Ok(NodeKind::ColumnReference(ColumnReference::new(column, table)))
}

pub(crate) fn constant(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    Ok(NodeKind::Constant(args.literal()?))
}

pub(crate) fn parameter(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let value = args.int()?;
    let number = u32::try_from(value).map_err(|_| Fault::InvalidEnumValue {
        domain: "parameter number",
        value,
    })?;
    Ok(NodeKind::Parameter(Parameter { number }))
}

// ============ Operators ============

pub(crate) fn arithmetic(node_type: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let left = args.node()?;
    let right = args.node()?;
    let op = BinaryOperatorNode::arithmetic(node_type, left, right)?;
    Ok(NodeKind::Operator(op))
}

pub(crate) fn concatenation(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let left = args.node()?;
    let right = args.node()?;
    Ok(NodeKind::Operator(BinaryOperatorNode::concatenation(left, right)))
}

// ============ Result sets ============

pub(crate) fn result_column(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let name = args.opt_string()?;
    let expression = args.opt_node()?;
    Ok(NodeKind::ResultColumn(ResultColumn::new(name, expression)))
}

pub(crate) fn result_column_list(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    Ok(NodeKind::ResultColumnList(NodeList::new(args.rest_nodes()?)))
}

pub(crate) fn from_base_table(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let table = args.name()?;
    let correlation = args.opt_string()?;
    let properties = args.opt_properties()?;
    Ok(NodeKind::FromBaseTable(FromBaseTable::new(
        table,
        correlation,
        properties,
    )))
}

pub(crate) fn from_list(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    Ok(NodeKind::FromList(NodeList::new(args.rest_nodes()?)))
}

pub(crate) fn select(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let result_columns = args.node()?;
    let from_list = args.opt_node()?;
    let where_clause = args.opt_node()?;
    Ok(NodeKind::Select(SelectNode::new(
        result_columns,
        from_list,
        where_clause,
    )))
}

pub(crate) fn join(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let join_type = JoinType::from_code(args.int()?)?;
    let left = args.node()?;
    let right = args.node()?;
    let on_clause = args.opt_node()?;
    let using_clause = args.opt_node()?;
    let result_columns = args.opt_node()?;
    let hints = args.opt_properties()?;
    let natural = args.opt_bool()?.unwrap_or(false);

    let mut join = JoinNode::new(
        join_type,
        left,
        right,
        on_clause,
        using_clause,
        result_columns,
        hints,
    )?;
    if natural {
        join.set_natural_join()?;
    }
    Ok(NodeKind::Join(join))
}

// ============ Statements ============

pub(crate) fn delete(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let target = args.opt_name()?;
    let query = args.node()?;
    Ok(dml(DmlModStatement::delete(target, query)))
}

pub(crate) fn insert(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let target = args.name()?;
    let columns = args.opt_node()?;
    let query = args.node()?;
    Ok(dml(DmlModStatement::insert(target, columns, query)))
}

pub(crate) fn update(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let target = args.opt_name()?;
    let query = args.node()?;
    Ok(dml(DmlModStatement::update(target, query)))
}

fn dml(stmt: DmlModStatement) -> NodeKind {
    NodeKind::Statement(Statement::Dml(stmt))
}

fn existence_check(args: &mut ArgReader) -> Result<ExistenceCheck> {
    Ok(match args.opt_int()? {
        Some(code) => ExistenceCheck::from_code(code)?,
        None => ExistenceCheck::default(),
    })
}

pub(crate) fn drop_table(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let name = args.name()?;
    let existence = existence_check(args)?;
    let behavior = match args.opt_int()? {
        Some(code) => DropBehavior::from_code(code)?,
        None => DropBehavior::default(),
    };
    let stmt = DdlStatement::drop_table(name, existence, behavior)?;
    Ok(NodeKind::Statement(Statement::Ddl(stmt)))
}

pub(crate) fn drop_view(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let name = args.name()?;
    let existence = existence_check(args)?;
    let stmt = DdlStatement::drop_view(name, existence)?;
    Ok(NodeKind::Statement(Statement::Ddl(stmt)))
}

pub(crate) fn create_table(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let name = args.name()?;
    let elements = args.node()?;
    if elements.variant() != NodeVariant::TableElementList {
        return Err(Fault::UnexpectedNodeType {
            node_type: elements.node_type(),
            expected: "table element list",
        }
        .into());
    }
    let existence = existence_check(args)?;
    let stmt = DdlStatement::create_table(name, elements, existence)?;
    Ok(NodeKind::Statement(Statement::Ddl(stmt)))
}

pub(crate) fn set_role(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let role = args.opt_string()?;
    let kind = match args.opt_int()? {
        Some(code) => RoleKind::from_code(code)?,
        None => RoleKind::default(),
    };
    Ok(NodeKind::Statement(Statement::SetRole(SetRole::new(
        role, kind,
    )?)))
}

pub(crate) fn grant(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    dcl(DclKind::Grant, args)
}

pub(crate) fn revoke(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    dcl(DclKind::Revoke, args)
}

fn dcl(kind: DclKind, args: &mut ArgReader) -> Result<NodeKind> {
    let privilege = args.node()?;
    if privilege.variant() != NodeVariant::Privilege {
        return Err(Fault::UnexpectedNodeType {
            node_type: privilege.node_type(),
            expected: "privilege",
        }
        .into());
    }
    let grantees = args.names()?;
    let stmt = DclStatement::new(kind, privilege, grantees)?;
    Ok(NodeKind::Statement(Statement::Dcl(stmt)))
}

// ============ Table elements ============

pub(crate) fn column_definition(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let name = args.string()?;
    let data_type = args.string()?;
    let nullable = args.opt_bool()?.unwrap_or(true);
    let default_value = args.opt_node()?;
    Ok(NodeKind::TableElement(TableElement::Column(
        ColumnDefinition::new(name, data_type, nullable, default_value),
    )))
}

/// Accepts 6, 7 or 8 arguments; missing trailing options keep their
/// defaults
pub(crate) fn constraint_definition(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let name = args.opt_name()?;
    let constraint_type = ConstraintType::from_code(args.int()?)?;
    let columns = args.opt_node()?;
    let properties = args.opt_properties()?;
    let check = args.opt_node()?;
    let text = args.opt_string()?;

    let mut options = ConstraintOptions::default();
    if let Some(code) = args.opt_int()? {
        options.behavior = DropBehavior::from_code(code)?;
    }
    if let Some(code) = args.opt_int()? {
        options.verify_type = VerifyType::from_code(code)?;
    }

    let constraint = ConstraintDefinition::new(
        name,
        constraint_type,
        columns,
        properties,
        check,
        text,
        options,
    )?;
    Ok(NodeKind::TableElement(TableElement::Constraint(constraint)))
}

pub(crate) fn table_element_list(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    Ok(NodeKind::TableElementList(NodeList::new(args.rest_nodes()?)))
}

// ============ Privileges ============

/// Three arguments for TABLE/ROUTINE, four for SEQUENCE/UDT
pub(crate) fn privilege(_: NodeType, args: &mut ArgReader) -> Result<NodeKind> {
    let object_type = PrivilegeObjectType::from_code(args.int()?)?;
    let node = if args.len() == 3 {
        let object = args.privilege_object()?;
        let privileges = args.opt_privileges()?;
        PrivilegeNode::table_or_routine(object_type, object, privileges)?
    } else {
        let name = args.name()?;
        let privilege = args.string()?;
        let restrict = args.bool()?;
        PrivilegeNode::usage(object_type, name, privilege, restrict)?
    };
    Ok(NodeKind::Privilege(node))
}
