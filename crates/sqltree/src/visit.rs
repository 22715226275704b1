//! Visitor-driven traversal and rewriting
//!
//! A [`Visitor`] receives each node by value and returns either the same
//! node or a replacement. The parent installs whatever comes back into its
//! own child slot before its `accept` returns, so the tree is fully
//! materialized at every observable point.
//!
//! Order is depth-first and pre-order by default: a node is visited, then
//! its children. When the visitor returns a replacement, the replacement is
//! installed as is and its subtree is not traversed. Each variant documents
//! its child order on its `accept_children`.

use crate::Result;
use crate::ast::{Node, NodeKind, NodeList, SourcePos, TableElement};
use crate::diagnostics::Fault;
use crate::node_types::NodeType;

pub trait Visitor {
    /// Inspect `node`, returning it unchanged or a replacement
    fn visit(&mut self, node: Node) -> Result<Node>;

    /// Visit `node`'s children before `node` itself
    fn visit_children_first(&self, _node: &Node) -> bool {
        false
    }

    /// Leave the subtree below `node` alone
    fn skip_children(&self, _node: &Node) -> bool {
        false
    }

    /// Stop the traversal; nodes not yet visited are returned untouched
    fn stop_traversal(&self) -> bool {
        false
    }
}

impl Node {
    /// Run `v` over this node and its subtree, returning the node to install
    /// in the parent's slot.
    pub fn accept(self, v: &mut dyn Visitor) -> Result<Node> {
        if v.stop_traversal() {
            return Ok(self);
        }

        if v.visit_children_first(&self) {
            let node = if v.skip_children(&self) {
                self
            } else {
                self.accept_children(v)?
            };
            if v.stop_traversal() {
                return Ok(node);
            }
            return v.visit(node);
        }

        let id = self.id();
        let skip = v.skip_children(&self);
        let node = v.visit(self)?;
        if skip || v.stop_traversal() || node.id() != id {
            return Ok(node);
        }
        node.accept_children(v)
    }

    /// Visit exactly this node's owned children, reassigning each slot to
    /// the visit result. Absent optional children are skipped.
    pub fn accept_children(self, v: &mut dyn Visitor) -> Result<Node> {
        self.map_kind(|kind| {
            Ok(match kind {
                NodeKind::ColumnReference(_)
                | NodeKind::Constant(_)
                | NodeKind::Parameter(_)
                | NodeKind::FromBaseTable(_)
                | NodeKind::Privilege(_) => kind,
                NodeKind::Operator(op) => NodeKind::Operator(op.accept_children(v)?),
                NodeKind::ResultColumn(rc) => NodeKind::ResultColumn(rc.accept_children(v)?),
                NodeKind::ResultColumnList(list) => {
                    NodeKind::ResultColumnList(accept_list(list, v)?)
                }
                NodeKind::FromList(list) => NodeKind::FromList(accept_list(list, v)?),
                NodeKind::Select(select) => NodeKind::Select(select.accept_children(v)?),
                NodeKind::Join(join) => NodeKind::Join(join.accept_children(v)?),
                NodeKind::Statement(stmt) => NodeKind::Statement(stmt.accept_children(v)?),
                NodeKind::TableElement(TableElement::Column(col)) => {
                    NodeKind::TableElement(TableElement::Column(col.accept_children(v)?))
                }
                NodeKind::TableElement(TableElement::Constraint(c)) => {
                    NodeKind::TableElement(TableElement::Constraint(c.accept_children(v)?))
                }
                NodeKind::TableElementList(list) => {
                    NodeKind::TableElementList(accept_list(list, v)?)
                }
            })
        })
    }

    /// Overwrite this node with `source`'s fields.
    ///
    /// Both nodes must be the same concrete variant. The copied subtrees are
    /// owned by this node afterwards; the two trees never alias.
    pub fn copy_from(&mut self, source: &Node) -> std::result::Result<(), Fault> {
        if self.variant() != source.variant() {
            return Err(Fault::TypeMismatch {
                target: self.variant(),
                from: source.variant(),
            });
        }
        self.overwrite_from(source);
        Ok(())
    }

    /// Rewrite the tree bottom-up with `f`
    pub fn rewrite<F>(self, f: F) -> Result<Node>
    where
        F: FnMut(Node) -> Result<Node>,
    {
        let mut rewriter = Rewriter::new(f).children_first();
        self.accept(&mut rewriter)
    }
}

pub(crate) fn accept_boxed(node: Box<Node>, v: &mut dyn Visitor) -> Result<Box<Node>> {
    (*node).accept(v).map(Box::new)
}

pub(crate) fn accept_opt(
    node: Option<Box<Node>>,
    v: &mut dyn Visitor,
) -> Result<Option<Box<Node>>> {
    node.map(|n| accept_boxed(n, v)).transpose()
}

pub(crate) fn accept_list(list: NodeList, v: &mut dyn Visitor) -> Result<NodeList> {
    let items = list
        .items
        .into_iter()
        .map(|n| n.accept(v))
        .collect::<Result<Vec<_>>>()?;
    Ok(NodeList::new(items))
}

// ============ Library visitors ============

/// Closure-driven rewriter
pub struct Rewriter<F> {
    f: F,
    children_first: bool,
}

impl<F> Rewriter<F>
where
    F: FnMut(Node) -> Result<Node>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            children_first: false,
        }
    }

    pub fn children_first(mut self) -> Self {
        self.children_first = true;
        self
    }
}

impl<F> Visitor for Rewriter<F>
where
    F: FnMut(Node) -> Result<Node>,
{
    fn visit(&mut self, node: Node) -> Result<Node> {
        (self.f)(node)
    }

    fn visit_children_first(&self, _node: &Node) -> bool {
        self.children_first
    }
}

/// Records the node type and position of every visited node, in visit order.
/// Optionally stops descending below nodes of one type.
#[derive(Debug, Default, Clone)]
pub struct VisitTrace {
    pub visited: Vec<(NodeType, SourcePos)>,
    skip_below: Option<NodeType>,
}

impl VisitTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipping_below(node_type: NodeType) -> Self {
        Self {
            visited: Vec::new(),
            skip_below: Some(node_type),
        }
    }

    pub fn node_types(&self) -> Vec<NodeType> {
        self.visited.iter().map(|(t, _)| *t).collect()
    }
}

impl Visitor for VisitTrace {
    fn visit(&mut self, node: Node) -> Result<Node> {
        self.visited.push((node.node_type(), node.pos()));
        Ok(node)
    }

    fn skip_children(&self, node: &Node) -> bool {
        self.skip_below == Some(node.node_type())
    }
}

/// Stops the traversal at the first node matching a predicate
pub struct FindNode<P> {
    predicate: P,
    found: Option<Node>,
}

impl<P> FindNode<P>
where
    P: Fn(&Node) -> bool,
{
    pub fn new(predicate: P) -> Self {
        Self {
            predicate,
            found: None,
        }
    }

    pub fn found(&self) -> Option<&Node> {
        self.found.as_ref()
    }

    pub fn into_found(self) -> Option<Node> {
        self.found
    }
}

impl<P> Visitor for FindNode<P>
where
    P: Fn(&Node) -> bool,
{
    fn visit(&mut self, node: Node) -> Result<Node> {
        if (self.predicate)(&node) {
            self.found = Some(node.clone());
        }
        Ok(node)
    }

    fn stop_traversal(&self) -> bool {
        self.found.is_some()
    }
}
