//! Black-box integration tests for sqltree
//!
//! These tests drive the public factory, script builder and visitor API.

use sqltree::advanced::NodeRegistry;
use sqltree::{
    CollectedDiagnostics, ConstraintType, DmlKind, DropBehavior, Error, Fault, FaultKind,
    JoinType, Node, NodeArg, NodeFactory, NodeType, NodeVariant, PrivilegeNode, Properties,
    Result, Statement, StatementType, TableName, ValueClass, VerifyType, Visitor, build, create,
};

fn make(node_type: NodeType, args: Vec<NodeArg>) -> Node {
    NodeFactory::new().make(node_type, args).unwrap()
}

fn col(name: &str) -> NodeArg {
    make(NodeType::ColumnReference, vec![NodeArg::str(name)]).into()
}

fn base_table(name: &str) -> NodeArg {
    make(NodeType::FromBaseTable, vec![NodeArg::name(name), NodeArg::Null]).into()
}

fn empty_select() -> NodeArg {
    let rcl = make(NodeType::ResultColumnList, vec![]);
    make(NodeType::Select, vec![rcl.into(), NodeArg::Null, NodeArg::Null]).into()
}

/// Smallest valid argument list for each node type
fn sample_args(node_type: NodeType) -> Vec<NodeArg> {
    use NodeType as T;
    match node_type {
        T::ColumnReference => vec![NodeArg::str("c")],
        T::Constant => vec![NodeArg::Int(1)],
        T::Parameter => vec![NodeArg::Int(0)],
        T::BinaryPlusOperator
        | T::BinaryMinusOperator
        | T::BinaryTimesOperator
        | T::BinaryDivideOperator
        | T::ModOperator
        | T::BinaryDivOperator
        | T::ConcatenationOperator => vec![col("a"), col("b")],
        T::ResultColumn => vec![NodeArg::str("x"), col("a")],
        T::ResultColumnList | T::FromList | T::TableElementList => vec![],
        T::FromBaseTable => vec![NodeArg::name("t"), NodeArg::Null],
        T::Select => vec![
            make(T::ResultColumnList, vec![]).into(),
            NodeArg::Null,
            NodeArg::Null,
        ],
        T::Join => vec![
            NodeArg::Int(JoinType::Inner.code()),
            base_table("a"),
            base_table("b"),
            NodeArg::Null,
            NodeArg::Null,
            NodeArg::Null,
        ],
        T::Delete | T::Update => vec![NodeArg::name("orders"), empty_select()],
        T::Insert => vec![NodeArg::name("orders"), NodeArg::Null, empty_select()],
        T::DropTable | T::DropView => vec![NodeArg::name("t")],
        T::CreateTable => vec![
            NodeArg::name("t"),
            make(T::TableElementList, vec![]).into(),
        ],
        T::SetRole => vec![NodeArg::str("admin")],
        T::Grant | T::Revoke => vec![
            make(
                T::Privilege,
                vec![NodeArg::Int(0), NodeArg::name("t"), NodeArg::Null],
            )
            .into(),
            NodeArg::Names(vec!["alice".into()]),
        ],
        T::ColumnDefinition => vec![NodeArg::str("id"), NodeArg::str("INT")],
        T::ConstraintDefinition => vec![
            NodeArg::Null,
            NodeArg::Int(ConstraintType::PrimaryKey.code()),
            NodeArg::Null,
            NodeArg::Null,
            NodeArg::Null,
            NodeArg::Null,
        ],
        T::Privilege => vec![NodeArg::Int(0), NodeArg::name("t"), NodeArg::Null],
    }
}

// ============ Factory ============

#[test]
fn every_code_builds_its_registered_variant() {
    let registry = NodeRegistry::global();
    for node_type in NodeType::ALL {
        let node = create(node_type.code(), sample_args(node_type))
            .unwrap_or_else(|e| panic!("{node_type} failed to build: {e}"));
        let spec = registry.lookup(node_type.code()).unwrap();
        assert_eq!(node.node_type(), node_type);
        assert_eq!(node.variant(), spec.variant, "variant mismatch for {node_type}");
    }
}

#[test]
fn operator_metadata_follows_the_code() {
    let expected = [
        (NodeType::BinaryDivideOperator, "/", "divide"),
        (NodeType::BinaryMinusOperator, "-", "minus"),
        (NodeType::BinaryPlusOperator, "+", "plus"),
        (NodeType::BinaryTimesOperator, "*", "times"),
        (NodeType::ModOperator, "mod", "mod"),
        (NodeType::BinaryDivOperator, "div", "div"),
    ];
    for (node_type, symbol, method) in expected {
        let node = make(node_type, sample_args(node_type));
        let op = node.as_operator().unwrap();
        assert_eq!(op.operator(), symbol);
        assert_eq!(op.method_name(), method);
        assert_eq!(op.left_operand_class(), ValueClass::Numeric);
        assert_eq!(op.right_operand_class(), ValueClass::Numeric);
    }

    let node = make(
        NodeType::ConcatenationOperator,
        sample_args(NodeType::ConcatenationOperator),
    );
    let op = node.as_operator().unwrap();
    assert_eq!(op.operator(), "||");
    assert_eq!(op.method_name(), "concatenate");
    assert_eq!(op.result_class(), ValueClass::Concatenable);
}

#[test]
fn unregistered_codes_fault() {
    for code in [0, 4, 17, 99, 1000, u16::MAX] {
        let err = create(code, vec![]).unwrap_err();
        assert_eq!(err, Error::Fault(Fault::UnknownNodeType(code)));
    }
}

#[test]
fn arity_bounds_are_enforced_for_every_code() {
    for spec in NodeRegistry::global().iter() {
        if spec.arity.min > 0 {
            let args = vec![NodeArg::Null; spec.arity.min - 1];
            let err = create(spec.node_type.code(), args).unwrap_err();
            assert!(
                matches!(err, Error::Fault(Fault::ArityMismatch { .. })),
                "{} accepted too few arguments",
                spec.node_type
            );
        }
        if let Some(max) = spec.arity.max {
            let args = vec![NodeArg::Null; max + 1];
            let err = create(spec.node_type.code(), args).unwrap_err();
            assert!(
                matches!(err, Error::Fault(Fault::ArityMismatch { .. })),
                "{} accepted too many arguments",
                spec.node_type
            );
        }
    }
}

#[test]
fn factory_over_empty_registry_knows_nothing() {
    let registry = NodeRegistry::empty();
    let factory = NodeFactory::with_registry(&registry);
    let err = factory
        .make(NodeType::Constant, vec![NodeArg::Int(1)])
        .unwrap_err();
    assert_eq!(err, Error::Fault(Fault::UnknownNodeType(2)));
}

#[test]
fn out_of_range_enum_codes_are_faults() {
    let err = create(
        NodeType::Join.code(),
        vec![
            NodeArg::Int(9),
            base_table("a"),
            base_table("b"),
            NodeArg::Null,
            NodeArg::Null,
            NodeArg::Null,
        ],
    )
    .unwrap_err();
    let Error::Fault(fault) = &err else {
        panic!("expected a fault, got {err:?}");
    };
    assert_eq!(fault.kind(), FaultKind::InvalidEnumValue);
    assert_eq!(fault.value(), "9");
}

// ============ Joins ============

#[test]
fn join_type_strings_cover_all_kinds() {
    let expected = [
        (JoinType::Inner, "INNER JOIN"),
        (JoinType::Cross, "CROSS JOIN"),
        (JoinType::LeftOuter, "LEFT OUTER JOIN"),
        (JoinType::RightOuter, "RIGHT OUTER JOIN"),
        (JoinType::FullOuter, "FULL OUTER JOIN"),
        (JoinType::Union, "UNION JOIN"),
    ];
    for (join_type, text) in expected {
        assert_eq!(sqltree::join_type_to_string(join_type.code()).unwrap(), text);
    }
    assert!(sqltree::join_type_to_string(0).is_err());
    assert!(sqltree::join_type_to_string(7).is_err());
}

/// Records the script of each visited node without descending
#[derive(Default)]
struct ChildRecorder {
    seen: Vec<String>,
}

impl Visitor for ChildRecorder {
    fn visit(&mut self, node: Node) -> Result<Node> {
        self.seen.push(node.to_string());
        Ok(node)
    }

    fn skip_children(&self, _node: &Node) -> bool {
        true
    }
}

const JOIN_SCRIPT: &str = "(JOIN 1 (FROM_BASE_TABLE @a null) (FROM_BASE_TABLE @b null) \
    (CONSTANT true) null (RESULT_COLUMN_LIST (RESULT_COLUMN 'x' null)) null false)";

#[test]
fn join_children_visit_in_documented_order() {
    let join = build(JOIN_SCRIPT).unwrap();
    let mut recorder = ChildRecorder::default();
    join.accept_children(&mut recorder).unwrap();
    assert_eq!(
        recorder.seen,
        vec![
            "(FROM_BASE_TABLE @a null)",
            "(FROM_BASE_TABLE @b null)",
            "(RESULT_COLUMN_LIST (RESULT_COLUMN 'x' null))",
            "(CONSTANT true)",
        ]
    );
}

#[test]
fn join_using_list_is_visited_after_result_columns() {
    let join = build(
        "(JOIN 3 (FROM_BASE_TABLE @a null) (FROM_BASE_TABLE @b null) null \
         (RESULT_COLUMN_LIST (RESULT_COLUMN 'id' null)) \
         (RESULT_COLUMN_LIST (RESULT_COLUMN 'x' null)) null)",
    )
    .unwrap();
    let j = join.as_join().unwrap();
    assert!(j.using_clause().is_some());
    assert!(j.result_columns().is_some());

    let mut recorder = ChildRecorder::default();
    join.accept_children(&mut recorder).unwrap();
    assert_eq!(
        recorder.seen,
        vec![
            "(FROM_BASE_TABLE @a null)",
            "(FROM_BASE_TABLE @b null)",
            "(RESULT_COLUMN_LIST (RESULT_COLUMN 'x' null))",
            "(RESULT_COLUMN_LIST (RESULT_COLUMN 'id' null))",
        ]
    );
}

#[test]
fn using_list_cannot_join_an_on_clause() {
    let using = build("(RESULT_COLUMN_LIST (RESULT_COLUMN 'id' null))").unwrap();

    let mut join = build(JOIN_SCRIPT).unwrap();
    let err = join
        .as_join_mut()
        .unwrap()
        .set_using_clause(using.clone())
        .unwrap_err();
    assert!(err.message.contains("USING"));
    assert!(join.as_join().unwrap().using_clause().is_none());

    let mut natural = build(
        "(JOIN 3 (FROM_BASE_TABLE @a null) (FROM_BASE_TABLE @b null) null null null null true)",
    )
    .unwrap();
    natural
        .as_join_mut()
        .unwrap()
        .set_using_clause(using.clone())
        .unwrap();
    let j = natural.as_join().unwrap();
    assert!(j.is_natural_join());
    assert_eq!(j.using_clause(), Some(&using));
}

/// Wraps every column reference as `column + 1` on the way down
#[derive(Default)]
struct WrapColumns {
    column_visits: usize,
}

impl Visitor for WrapColumns {
    fn visit(&mut self, node: Node) -> Result<Node> {
        if node.node_type() != NodeType::ColumnReference {
            return Ok(node);
        }
        self.column_visits += 1;
        let one = make(NodeType::Constant, vec![NodeArg::Int(1)]);
        NodeFactory::new().make(NodeType::BinaryPlusOperator, vec![node.into(), one.into()])
    }
}

#[test]
fn pre_order_wrapping_rewrite_terminates() {
    let tree = build(
        "(DELETE @orders (SELECT (RESULT_COLUMN_LIST) null \
         (BINARY_TIMES_OPERATOR (COLUMN_REFERENCE 'qty' null) (COLUMN_REFERENCE 'price' null))))",
    )
    .unwrap();
    let mut wrap = WrapColumns::default();
    let tree = tree.accept(&mut wrap).unwrap();
    assert_eq!(wrap.column_visits, 2);
    assert_eq!(
        tree.to_string(),
        "(DELETE @orders (SELECT (RESULT_COLUMN_LIST) null (BINARY_TIMES_OPERATOR \
         (BINARY_PLUS_OPERATOR (COLUMN_REFERENCE 'qty' null) (CONSTANT 1)) \
         (BINARY_PLUS_OPERATOR (COLUMN_REFERENCE 'price' null) (CONSTANT 1)))))"
    );

    // a second pass wraps the original columns again, once each
    let mut again = WrapColumns::default();
    tree.accept(&mut again).unwrap();
    assert_eq!(again.column_visits, 2);
}

struct ReplaceConstants;

impl Visitor for ReplaceConstants {
    fn visit(&mut self, node: Node) -> Result<Node> {
        if node.node_type() == NodeType::Constant {
            build("(CONSTANT false)")
        } else {
            Ok(node)
        }
    }
}

#[test]
fn replaced_child_is_installed_in_its_slot() {
    let join = build(JOIN_SCRIPT).unwrap();
    let join = join.accept_children(&mut ReplaceConstants).unwrap();
    let on = join.as_join().unwrap().join_clause().unwrap();
    assert_eq!(on.to_string(), "(CONSTANT false)");
}

#[test]
fn unchanged_children_leave_tree_identical() {
    let join = build(JOIN_SCRIPT).unwrap();
    let before = join.clone();
    let mut recorder = ChildRecorder::default();
    let after = join.accept_children(&mut recorder).unwrap();
    assert_eq!(after, before);
}

#[test]
fn right_outer_join_stores_preserved_side_first() {
    let join = build(
        "(JOIN 4 (FROM_BASE_TABLE @a null) (FROM_BASE_TABLE @b null) null null null)",
    )
    .unwrap();
    let j = join.as_join().unwrap();
    assert_eq!(j.join_type(), JoinType::RightOuter);
    assert_eq!(j.left().to_string(), "(FROM_BASE_TABLE @b null)");
    assert_eq!(j.logical_left().to_string(), "(FROM_BASE_TABLE @a null)");

    let mut recorder = ChildRecorder::default();
    join.accept_children(&mut recorder).unwrap();
    assert_eq!(recorder.seen[0], "(FROM_BASE_TABLE @b null)");
}

#[test]
fn natural_join_rejects_on_clause() {
    let err = build(
        "(JOIN 1 (FROM_BASE_TABLE @a null) (FROM_BASE_TABLE @b null) \
         (CONSTANT true) null null null true)",
    )
    .unwrap_err();
    assert!(matches!(err, Error::Sql(_)));

    let join = build(
        "(JOIN 3 (FROM_BASE_TABLE @a null) (FROM_BASE_TABLE @b null) null null null null true)",
    )
    .unwrap();
    assert!(join.as_join().unwrap().is_natural_join());
}

#[test]
fn cross_join_with_using_is_a_sql_error() {
    let script = "(JOIN 2 (FROM_BASE_TABLE @a null) (FROM_BASE_TABLE @b null) \
                  null (RESULT_COLUMN_LIST) null)";
    let err = build(script).unwrap_err();
    let Error::Sql(e) = &err else {
        panic!("expected SQL error, got {err:?}");
    };
    assert_eq!(e.pos.begin, 0);
    assert_eq!(e.pos.end, script.len());
    assert!(!err.is_fault());
}

// ============ copy_from ============

#[test]
fn copy_from_requires_matching_variant() {
    let mut target = build("(BINARY_PLUS_OPERATOR (CONSTANT 1) (CONSTANT 2))").unwrap();
    let source = build("(CONCATENATION_OPERATOR (CONSTANT 'a') (CONSTANT 'b'))").unwrap();
    let err = target.copy_from(&source).unwrap_err();
    assert_eq!(
        err,
        Fault::TypeMismatch {
            target: NodeVariant::BinaryArithmeticOperator,
            from: NodeVariant::ConcatenationOperator,
        }
    );

    let constant = build("(CONSTANT 1)").unwrap();
    assert!(target.copy_from(&constant).is_err());
}

#[test]
fn copy_from_overwrites_every_field() {
    let mut target = build("(BINARY_PLUS_OPERATOR (CONSTANT 1) (CONSTANT 2))").unwrap();
    let source = build("  (MOD_OPERATOR (PARAMETER 0) (COLUMN_REFERENCE 'x' null))").unwrap();
    target.copy_from(&source).unwrap();
    assert_eq!(target, source);
    assert_eq!(target.node_type(), NodeType::ModOperator);
    assert_eq!(target.pos(), source.pos());
    assert_eq!(target.as_operator().unwrap().operator(), "mod");
}

// ============ Constraints ============

#[test]
fn minimal_constraint_equals_explicit_defaults() {
    let minimal =
        build("(CONSTRAINT_DEFINITION @pk 2 (RESULT_COLUMN_LIST) null null null)").unwrap();
    let explicit =
        build("(CONSTRAINT_DEFINITION @pk 2 (RESULT_COLUMN_LIST) null null null 2 0)").unwrap();
    assert_eq!(minimal, explicit);

    let c = minimal.as_constraint().unwrap();
    assert_eq!(c.behavior(), DropBehavior::Default);
    assert_eq!(c.verify_type(), VerifyType::None);
    assert_eq!(c.name(), Some("pk"));
}

#[test]
fn check_constraint_visits_its_condition() {
    let node = build(
        "(CONSTRAINT_DEFINITION null 4 null null \
         (BINARY_MINUS_OPERATOR (COLUMN_REFERENCE 'a' null) (CONSTANT 1)) 'a - 1')",
    )
    .unwrap();
    let mut trace = sqltree::VisitTrace::new();
    node.accept(&mut trace).unwrap();
    assert_eq!(
        trace.node_types(),
        vec![
            NodeType::ConstraintDefinition,
            NodeType::BinaryMinusOperator,
            NodeType::ColumnReference,
            NodeType::Constant,
        ]
    );
}

#[test]
fn properties_can_be_set_after_construction() {
    let mut node = build("(CONSTRAINT_DEFINITION null 3 null null null null)").unwrap();
    let c = node.as_constraint_mut().unwrap();
    assert!(c.properties().is_none());
    let mut props = Properties::new();
    props.insert("index".into(), "btree".into());
    c.set_properties(props);
    assert_eq!(
        node.to_string(),
        "(CONSTRAINT_DEFINITION null 3 null {index = 'btree'} null null 2 0)"
    );
}

// ============ Statements ============

#[test]
fn delete_from_orders() {
    let node = make(
        NodeType::Delete,
        vec![NodeArg::Name(TableName::new("orders")), empty_select()],
    );
    let stmt = node.as_statement().unwrap();
    assert_eq!(stmt.statement_type(), StatementType::Delete);
    assert_eq!(stmt.statement_to_string(), "DELETE");
}

#[test]
fn binary_plus_end_to_end() {
    let node = make(NodeType::BinaryPlusOperator, vec![col("a"), col("b")]);
    let op = node.as_operator().unwrap();
    assert_eq!(op.operator(), "+");
    assert_eq!(op.method_name(), "plus");
    assert_eq!(op.left_operand_class(), ValueClass::Numeric);
    assert_eq!(op.right_operand_class(), ValueClass::Numeric);
    assert_eq!(op.left_operand().as_column_reference().unwrap().column_name(), "a");
}

#[test]
fn statement_labels_and_categories() {
    let cases = [
        ("(DROP_TABLE @t)", "DROP TABLE", StatementType::Ddl),
        ("(DROP_VIEW @v 1)", "DROP VIEW", StatementType::Ddl),
        ("(CREATE_TABLE @t (TABLE_ELEMENT_LIST) 2)", "CREATE TABLE", StatementType::Ddl),
        (
            "(REVOKE (PRIVILEGE 2 @seq 'USAGE' true) [bob])",
            "REVOKE",
            StatementType::Dcl,
        ),
        ("(SET_ROLE 'admin')", "SET ROLE", StatementType::Misc),
        (
            "(INSERT @t (RESULT_COLUMN_LIST (RESULT_COLUMN 'a' null)) \
             (SELECT (RESULT_COLUMN_LIST) null null))",
            "INSERT",
            StatementType::Insert,
        ),
        (
            "(UPDATE null (SELECT (RESULT_COLUMN_LIST) null null))",
            "UPDATE",
            StatementType::Update,
        ),
    ];
    for (script, label, category) in cases {
        let node = build(script).unwrap();
        let stmt = node.as_statement().unwrap();
        assert_eq!(stmt.statement_to_string(), label);
        assert_eq!(stmt.statement_type(), category);
    }
}

#[test]
fn variant_stays_bound_to_the_code_after_mutation() {
    let registry = NodeRegistry::global();
    let registered = |node: &Node| registry.get(node.node_type()).unwrap().variant;

    let delete = build(
        "(DELETE @orders (SELECT (RESULT_COLUMN_LIST) \
         (FROM_LIST (FROM_BASE_TABLE @orders null)) null))",
    )
    .unwrap();
    let Statement::Dml(dml) = delete.as_statement().unwrap() else {
        panic!("expected a DML statement");
    };
    assert_eq!(dml.kind(), DmlKind::Delete);
    assert_eq!(delete.variant(), registered(&delete));
    assert_eq!(delete.as_statement().unwrap().statement_type(), StatementType::Delete);

    let mut join = build(
        "(JOIN 1 (FROM_BASE_TABLE @a null) (FROM_BASE_TABLE @b null) null null null)",
    )
    .unwrap();
    join.as_join_mut().unwrap().set_natural_join().unwrap();
    assert_eq!(join.variant(), registered(&join));

    let mut constraint = build("(CONSTRAINT_DEFINITION null 3 null null null null)").unwrap();
    constraint
        .as_constraint_mut()
        .unwrap()
        .set_properties(Properties::new());
    assert_eq!(constraint.variant(), registered(&constraint));

    // copy_from carries the code along with the payload
    let mut target = build("(BINARY_PLUS_OPERATOR (CONSTANT 1) (CONSTANT 2))").unwrap();
    let source = build("(BINARY_DIV_OPERATOR (CONSTANT 1) (CONSTANT 2))").unwrap();
    target.copy_from(&source).unwrap();
    assert_eq!(target.node_type(), NodeType::BinaryDivOperator);
    assert_eq!(target.as_operator().unwrap().method_name(), "div");
}

#[test]
fn existence_check_must_match_the_statement() {
    assert!(matches!(build("(CREATE_TABLE @t (TABLE_ELEMENT_LIST) 1)"), Err(Error::Sql(_))));
    assert!(matches!(build("(DROP_TABLE @t 2)"), Err(Error::Sql(_))));
    assert!(matches!(build("(DROP_TABLE @t 5)"), Err(Error::Fault(_))));
}

#[test]
fn grant_requires_a_privilege_node() {
    let err = build("(GRANT (CONSTANT 1) [alice])").unwrap_err();
    assert_eq!(
        err,
        Error::Fault(Fault::UnexpectedNodeType {
            node_type: NodeType::Constant,
            expected: "privilege",
        })
    );
}

// ============ Privileges ============

#[test]
fn privilege_domains() {
    let node = build("(PRIVILEGE 0 @app.orders privileges[SELECT, UPDATE(status)])").unwrap();
    let PrivilegeNode::Table {
        object_name,
        specific_privileges,
    } = node.as_privilege().unwrap()
    else {
        panic!("expected a table privilege");
    };
    assert_eq!(object_name.to_string(), "app.orders");
    assert_eq!(specific_privileges.len(), 2);

    let node = build("(PRIVILEGE 1 function(@f, [INT]) null)").unwrap();
    assert_eq!(node.as_privilege().unwrap().object_name().table_name(), "f");

    let node = build("(PRIVILEGE 3 @money 'USAGE' false)").unwrap();
    assert!(matches!(
        node.as_privilege().unwrap(),
        PrivilegeNode::Udt { privilege, .. } if privilege == sqltree::USAGE_PRIV
    ));

    let err = build("(PRIVILEGE 0 @t 'USAGE' false)").unwrap_err();
    let Error::Fault(fault) = &err else {
        panic!("expected a fault, got {err:?}");
    };
    assert_eq!(fault.kind(), FaultKind::InvalidPrivilegeDomain);
}

// ============ Batches and printing ============

#[test]
fn batch_keeps_building_after_a_sql_error() {
    let mut diagnostics = CollectedDiagnostics::new();
    let batch = sqltree::BatchBuilder::new()
        .with_diagnostics(&mut diagnostics)
        .build(
            "(DROP_TABLE @a);\n\
             (CREATE_TABLE @b (TABLE_ELEMENT_LIST) 1);\n\
             (SET_ROLE 'admin')",
        )
        .unwrap();
    assert_eq!(batch.statements.len(), 2);
    assert_eq!(batch.errors.len(), 1);
    assert!(!batch.is_clean());
    assert_eq!(
        batch.statements[1].as_statement().unwrap().statement_to_string(),
        "SET ROLE"
    );
    assert_eq!(diagnostics.sql_errors.len(), 1);
}

#[test]
fn batch_stops_on_a_fault() {
    let mut diagnostics = CollectedDiagnostics::new();
    let err = sqltree::BatchBuilder::new()
        .with_diagnostics(&mut diagnostics)
        .build("(DROP_TABLE @a); (DROP_TABLE @b 9); (SET_ROLE 'admin')")
        .unwrap_err();
    assert!(err.is_fault());
    assert_eq!(diagnostics.faults.len(), 1);
    assert!(diagnostics.sql_errors.is_empty());
}

#[test]
fn malformed_script_is_a_parse_error() {
    let err = build("(DROP_TABLE @a").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[test]
fn tree_print_dumps_every_node() {
    let node = build(
        "(DELETE @orders (SELECT (RESULT_COLUMN_LIST) \
         (FROM_LIST (FROM_BASE_TABLE @orders 'o')) \
         (BINARY_PLUS_OPERATOR (COLUMN_REFERENCE 'id' @o) (CONSTANT 1))))",
    )
    .unwrap();
    let options = sqltree::PrettyOptions {
        indent: 2,
        show_positions: false,
    };
    let dump = sqltree::tree_print_with(&node, &options);
    let expected = "\
DELETE target=orders
  query: SELECT
    result_columns: RESULT_COLUMN_LIST
    from_list: FROM_LIST
      [0]: FROM_BASE_TABLE orders AS o
    where: BINARY_PLUS_OPERATOR operator=+ method=plus operands=numeric
      left: COLUMN_REFERENCE o.id
      right: CONSTANT 1
";
    assert_eq!(dump, expected);
}
