//! Printing trees
//!
//! Two forms:
//! - `Display` renders the reduction script that rebuilds the node, on one
//!   line. Joins render in SQL-source operand order.
//! - [`tree_print`] is a multi-line diagnostic dump, one node per line with
//!   each child slot labelled.

use std::fmt::{self, Display};

use crate::ast::{
    DclKind, DdlKind, DmlKind, Literal, Node, NodeKind, PrivilegeNode, Properties,
    RoutineDesignator, Statement, TableElement, TableName, TablePrivilege,
};

// ============ Script rendering ============

/// Render `node` as a reduction script
pub fn render(node: &Node) -> String {
    node.to_string()
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.node_type())?;
        match self.kind() {
            NodeKind::ColumnReference(col) => {
                write!(f, " {} {}", Quoted(&col.column_name), OptName(col.table_name()))?;
            }
            NodeKind::Constant(lit) => write!(f, " {}", lit)?,
            NodeKind::Parameter(p) => write!(f, " {}", p.number)?,
            NodeKind::Operator(op) => {
                write!(f, " {} {}", op.left_operand(), op.right_operand())?;
            }
            NodeKind::ResultColumn(rc) => {
                write!(f, " {} {}", OptQuoted(rc.name()), OptNode(rc.expression()))?;
            }
            NodeKind::ResultColumnList(list)
            | NodeKind::FromList(list)
            | NodeKind::TableElementList(list) => {
                for item in list.iter() {
                    write!(f, " {}", item)?;
                }
            }
            NodeKind::FromBaseTable(t) => {
                write!(
                    f,
                    " {} {}",
                    Name(&t.table_name),
                    OptQuoted(t.correlation_name.as_deref())
                )?;
                if let Some(props) = &t.properties {
                    write!(f, " {}", Props(props))?;
                }
            }
            NodeKind::Select(select) => {
                write!(
                    f,
                    " {} {} {}",
                    select.result_columns,
                    OptNode(select.from_list.as_deref()),
                    OptNode(select.where_clause.as_deref())
                )?;
            }
            NodeKind::Join(join) => {
                write!(
                    f,
                    " {} {} {} {} {} {} ",
                    join.join_type().code(),
                    join.logical_left(),
                    join.logical_right(),
                    OptNode(join.join_clause()),
                    OptNode(join.using_clause()),
                    OptNode(join.result_columns()),
                )?;
                match join.join_order_strategy_properties() {
                    Some(props) => write!(f, "{}", Props(props))?,
                    None => write!(f, "null")?,
                }
                write!(f, " {}", join.is_natural_join())?;
            }
            NodeKind::Statement(stmt) => write_statement(f, stmt)?,
            NodeKind::TableElement(TableElement::Column(col)) => {
                write!(
                    f,
                    " {} {} {} {}",
                    Quoted(&col.name),
                    Quoted(&col.data_type),
                    col.nullable,
                    OptNode(col.default_value.as_deref())
                )?;
            }
            NodeKind::TableElement(TableElement::Constraint(c)) => {
                write!(
                    f,
                    " {} {} {} ",
                    OptName(c.constraint_name()),
                    c.constraint_type().code(),
                    OptNode(c.column_list())
                )?;
                match c.properties() {
                    Some(props) => write!(f, "{}", Props(props))?,
                    None => write!(f, "null")?,
                }
                write!(
                    f,
                    " {} {} {} {}",
                    OptNode(c.check_condition()),
                    OptQuoted(c.constraint_text()),
                    c.behavior().code(),
                    c.verify_type().code()
                )?;
            }
            NodeKind::Privilege(p) => write_privilege(f, p)?,
        }
        write!(f, ")")
    }
}

fn write_statement(f: &mut fmt::Formatter<'_>, stmt: &Statement) -> fmt::Result {
    match stmt {
        Statement::Dml(dml) => match dml.kind {
            DmlKind::Insert => write!(
                f,
                " {} {} {}",
                OptName(dml.target_table()),
                OptNode(dml.target_columns.as_deref()),
                dml.query()
            ),
            DmlKind::Update | DmlKind::Delete => {
                write!(f, " {} {}", OptName(dml.target_table()), dml.query())
            }
        },
        Statement::Ddl(ddl) => {
            let name = Name(ddl.object_name());
            let ec = ddl.existence_check().code();
            match &ddl.kind {
                DdlKind::DropTable { behavior } => {
                    write!(f, " {} {} {}", name, ec, behavior.code())
                }
                DdlKind::DropView => write!(f, " {} {}", name, ec),
                DdlKind::CreateTable { elements } => write!(f, " {} {} {}", name, elements, ec),
            }
        }
        Statement::Dcl(dcl) => {
            write!(f, " {} {}", dcl.privilege, Names(&dcl.grantees))
        }
        Statement::SetRole(role) => write!(
            f,
            " {} {}",
            OptQuoted(role.role_name.as_deref()),
            role.kind.code()
        ),
    }
}

fn write_privilege(f: &mut fmt::Formatter<'_>, p: &PrivilegeNode) -> fmt::Result {
    write!(f, " {}", p.object_type().code())?;
    match p {
        PrivilegeNode::Table {
            object_name,
            specific_privileges,
        } => write!(f, " {} {}", Name(object_name), Privileges(specific_privileges)),
        PrivilegeNode::Routine { designator } => write!(f, " {} null", Routine(designator)),
        PrivilegeNode::Sequence {
            object_name,
            privilege,
            restrict,
        }
        | PrivilegeNode::Udt {
            object_name,
            privilege,
            restrict,
        } => write!(f, " {} {} {}", Name(object_name), Quoted(privilege), restrict),
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "{}", Quoted(s)),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{n:.1}")
                } else {
                    write!(f, "{}", n)
                }
            }
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
        }
    }
}

struct Quoted<'a>(&'a str);

impl Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0.replace('\'', "''"))
    }
}

struct OptQuoted<'a>(Option<&'a str>);

impl Display for OptQuoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(s) => write!(f, "{}", Quoted(s)),
            None => write!(f, "null"),
        }
    }
}

struct OptNode<'a>(Option<&'a Node>);

impl Display for OptNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(node) => write!(f, "{}", node),
            None => write!(f, "null"),
        }
    }
}

struct Name<'a>(&'a TableName);

impl Display for Name<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.schema_name() {
            Some(schema) => write!(f, "@{}.{}", Item(schema), Item(self.0.table_name())),
            None => write!(f, "@{}", Item(self.0.table_name())),
        }
    }
}

struct OptName<'a>(Option<&'a TableName>);

impl Display for OptName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(name) => write!(f, "{}", Name(name)),
            None => write!(f, "null"),
        }
    }
}

/// A bare identifier when it lexes as one, else a quoted string
struct Item<'a>(&'a str);

impl Display for Item<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chars = self.0.chars();
        let is_ident = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if is_ident {
            write!(f, "{}", self.0)
        } else {
            write!(f, "{}", Quoted(self.0))
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", Item(item))?;
    }
    Ok(())
}

struct Names<'a>(&'a [String]);

impl Display for Names<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        write_items(f, self.0)?;
        write!(f, "]")
    }
}

struct Props<'a>(&'a Properties);

impl Display for Props<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", Item(key), Quoted(value))?;
        }
        write!(f, "}}")
    }
}

struct Privileges<'a>(&'a [TablePrivilege]);

impl Display for Privileges<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "privileges[")?;
        for (i, privilege) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", privilege.action)?;
            if let Some(columns) = &privilege.columns {
                write!(f, "(")?;
                write_items(f, columns)?;
                write!(f, ")")?;
            }
        }
        write!(f, "]")
    }
}

struct Routine<'a>(&'a RoutineDesignator);

impl Display for Routine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.0.is_function {
            "function"
        } else {
            "procedure"
        };
        write!(f, "{}({}", keyword, Name(&self.0.name))?;
        if let Some(types) = &self.0.param_types {
            write!(f, ", {}", Names(types))?;
        }
        write!(f, ")")
    }
}

// ============ Tree dump ============

#[derive(Debug, Clone, Copy)]
pub struct PrettyOptions {
    /// Spaces per nesting level
    pub indent: usize,
    pub show_positions: bool,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            show_positions: true,
        }
    }
}

/// Multi-line dump of `node` and its subtree
pub fn tree_print(node: &Node) -> String {
    tree_print_with(node, &PrettyOptions::default())
}

pub fn tree_print_with(node: &Node, options: &PrettyOptions) -> String {
    TreeDump {
        node,
        options,
    }
    .to_string()
}

struct TreeDump<'a> {
    node: &'a Node,
    options: &'a PrettyOptions,
}

impl Display for TreeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_subtree(f, self.options, None, self.node, 0)
    }
}

fn write_subtree(
    f: &mut fmt::Formatter<'_>,
    options: &PrettyOptions,
    label: Option<&str>,
    node: &Node,
    depth: usize,
) -> fmt::Result {
    write!(f, "{:width$}", "", width = depth * options.indent)?;
    if let Some(label) = label {
        write!(f, "{}: ", label)?;
    }
    write!(f, "{}", node.node_type())?;
    if options.show_positions && !node.pos().is_unknown() {
        write!(f, " [{}]", node.pos())?;
    }
    let summary = summary(node);
    if !summary.is_empty() {
        write!(f, " {}", summary)?;
    }
    writeln!(f)?;

    for (label, child) in child_slots(node) {
        write_subtree(f, options, Some(&label), child, depth + 1)?;
    }
    Ok(())
}

/// Scalar fields shown on a node's own line
fn summary(node: &Node) -> String {
    match node.kind() {
        NodeKind::ColumnReference(col) => match col.table_name() {
            Some(table) => format!("{}.{}", table, col.column_name()),
            None => col.column_name().to_string(),
        },
        NodeKind::Constant(lit) => lit.to_string(),
        NodeKind::Parameter(p) => format!("?{}", p.number),
        NodeKind::Operator(op) => format!(
            "operator={} method={} operands={}",
            op.operator(),
            op.method_name(),
            op.left_operand_class()
        ),
        NodeKind::ResultColumn(rc) => rc.name().unwrap_or_default().to_string(),
        NodeKind::ResultColumnList(_) | NodeKind::FromList(_) | NodeKind::TableElementList(_) => {
            String::new()
        }
        NodeKind::FromBaseTable(t) => match &t.correlation_name {
            Some(corr) => format!("{} AS {}", t.table_name, corr),
            None => t.table_name.to_string(),
        },
        NodeKind::Select(_) => String::new(),
        NodeKind::Join(join) => {
            let mut s = join.join_type().to_string();
            if join.is_natural_join() {
                s.insert_str(0, "NATURAL ");
            }
            s
        }
        NodeKind::Statement(stmt) => statement_summary(stmt),
        NodeKind::TableElement(TableElement::Column(col)) => {
            let null = if col.nullable { "" } else { " NOT NULL" };
            format!("{} {}{}", col.name, col.data_type, null)
        }
        NodeKind::TableElement(TableElement::Constraint(c)) => match c.name() {
            Some(name) => format!("{} {}", c.constraint_type(), name),
            None => c.constraint_type().to_string(),
        },
        NodeKind::Privilege(p) => format!("{} {}", p.object_type().as_str(), p.object_name()),
    }
}

fn statement_summary(stmt: &Statement) -> String {
    match stmt {
        Statement::Dml(dml) => match dml.target_table() {
            Some(target) => format!("target={}", target),
            None => String::new(),
        },
        Statement::Ddl(ddl) => {
            let mut s = ddl.object_name().to_string();
            if ddl.existence_check().code() != 0 {
                s.push_str(&format!(" {}", ddl.existence_check()));
            }
            if let DdlKind::DropTable { behavior } = &ddl.kind {
                s.push_str(&format!(" behavior={:?}", behavior));
            }
            s
        }
        Statement::Dcl(dcl) => {
            let verb = match dcl.kind {
                DclKind::Grant => "to",
                DclKind::Revoke => "from",
            };
            format!("{} {}", verb, dcl.grantees.join(", "))
        }
        Statement::SetRole(role) => role.role_name.clone().unwrap_or_default(),
    }
}

/// Present children with slot labels, in visit order
fn child_slots(node: &Node) -> Vec<(String, &Node)> {
    fn slot<'a>(out: &mut Vec<(String, &'a Node)>, label: &str, child: Option<&'a Node>) {
        if let Some(child) = child {
            out.push((label.to_string(), child));
        }
    }

    let mut out = Vec::new();
    match node.kind() {
        NodeKind::ColumnReference(_)
        | NodeKind::Constant(_)
        | NodeKind::Parameter(_)
        | NodeKind::FromBaseTable(_)
        | NodeKind::Privilege(_) => {}
        NodeKind::Operator(op) => {
            slot(&mut out, "left", Some(op.left_operand()));
            slot(&mut out, "right", Some(op.right_operand()));
        }
        NodeKind::ResultColumn(rc) => slot(&mut out, "expression", rc.expression()),
        NodeKind::ResultColumnList(list)
        | NodeKind::FromList(list)
        | NodeKind::TableElementList(list) => {
            for (i, item) in list.iter().enumerate() {
                out.push((format!("[{}]", i), item));
            }
        }
        NodeKind::Select(select) => {
            slot(&mut out, "result_columns", Some(&*select.result_columns));
            slot(&mut out, "from_list", select.from_list.as_deref());
            slot(&mut out, "where", select.where_clause.as_deref());
        }
        NodeKind::Join(join) => {
            slot(&mut out, "left", Some(join.left()));
            slot(&mut out, "right", Some(join.right()));
            slot(&mut out, "result_columns", join.result_columns());
            slot(&mut out, "on", join.join_clause());
            slot(&mut out, "using", join.using_clause());
        }
        NodeKind::Statement(Statement::Dml(dml)) => {
            slot(&mut out, "target_columns", dml.target_columns.as_deref());
            slot(&mut out, "query", Some(dml.query()));
        }
        NodeKind::Statement(Statement::Ddl(ddl)) => {
            if let DdlKind::CreateTable { elements } = &ddl.kind {
                slot(&mut out, "elements", Some(&**elements));
            }
        }
        NodeKind::Statement(Statement::Dcl(dcl)) => {
            slot(&mut out, "privilege", Some(&*dcl.privilege));
        }
        NodeKind::Statement(Statement::SetRole(_)) => {}
        NodeKind::TableElement(TableElement::Column(col)) => {
            slot(&mut out, "default", col.default_value.as_deref());
        }
        NodeKind::TableElement(TableElement::Constraint(c)) => {
            slot(&mut out, "columns", c.column_list());
            slot(&mut out, "check", c.check_condition());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;

    #[test]
    fn render_round_trips_through_build() {
        let scripts = [
            "(BINARY_PLUS_OPERATOR (COLUMN_REFERENCE 'a' @t) (CONSTANT 1.0))",
            "(CONCATENATION_OPERATOR (CONSTANT 'it''s') (PARAMETER 3))",
            "(DROP_TABLE @app.orders 1 0)",
            "(DROP_VIEW @'my table' 0)",
            "(COLUMN_REFERENCE 'id' @app.'order lines')",
            "(SET_ROLE null 1)",
            "(GRANT (PRIVILEGE 0 @t privileges[SELECT, UPDATE(a, 'b c')]) [alice, PUBLIC])",
            "(PRIVILEGE 1 procedure(@p, [INT]) null)",
            "(PRIVILEGE 3 @money 'USAGE' false)",
        ];
        for script in scripts {
            let node = build(script).unwrap();
            let rendered = render(&node);
            assert_eq!(rendered, script, "render mismatch for {script}");
            assert_eq!(build(&rendered).unwrap(), node);
        }
    }

    #[test]
    fn constraint_renders_all_options() {
        let node = build("(CONSTRAINT_DEFINITION @pk 2 null null null null)").unwrap();
        assert_eq!(
            node.to_string(),
            "(CONSTRAINT_DEFINITION @pk 2 null null null null 2 0)"
        );
    }

    #[test]
    fn right_join_renders_in_source_order() {
        let script = "(JOIN 4 (FROM_BASE_TABLE @a null) (FROM_BASE_TABLE @b null) \
                      null null null null false)";
        let node = build(script).unwrap();
        assert_eq!(node.to_string(), script);
    }

    #[test]
    fn tree_print_labels_child_slots() {
        let node =
            build("(BINARY_TIMES_OPERATOR (COLUMN_REFERENCE 'x' null) (CONSTANT 2))").unwrap();
        let options = PrettyOptions {
            indent: 4,
            show_positions: false,
        };
        let dump = tree_print_with(&node, &options);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(
            lines,
            vec![
                "BINARY_TIMES_OPERATOR operator=* method=times operands=numeric",
                "    left: COLUMN_REFERENCE x",
                "    right: CONSTANT 2",
            ]
        );
    }

    #[test]
    fn tree_print_shows_positions() {
        let node = build("(CONSTANT true)").unwrap();
        assert_eq!(tree_print(&node), "CONSTANT [0..15] true\n");
    }
}
