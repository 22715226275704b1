//! Result-set composition: result columns, base tables, SELECT and joins

use std::fmt;

use super::{Node, Properties, TableName};
use crate::diagnostics::{Fault, SqlError};
use crate::visit::{Visitor, accept_boxed, accept_opt};

/// One entry of a result column list: `expr [AS name]`, or a bare name in
/// USING lists and INSERT target lists
#[derive(Debug, Clone, PartialEq)]
pub struct ResultColumn {
    pub name: Option<String>,
    pub expression: Option<Box<Node>>,
}

impl ResultColumn {
    pub fn new(name: Option<String>, expression: Option<Node>) -> Self {
        Self {
            name,
            expression: expression.map(Box::new),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn expression(&self) -> Option<&Node> {
        self.expression.as_deref()
    }

    /// Visits the expression, if any
    pub(crate) fn accept_children(mut self, v: &mut dyn Visitor) -> crate::Result<Self> {
        self.expression = accept_opt(self.expression, v)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromBaseTable {
    pub table_name: TableName,
    pub correlation_name: Option<String>,
    pub properties: Option<Properties>,
}

impl FromBaseTable {
    pub fn new(
        table_name: TableName,
        correlation_name: Option<String>,
        properties: Option<Properties>,
    ) -> Self {
        Self {
            table_name,
            correlation_name,
            properties,
        }
    }

    /// Name the table is exposed under in the query
    pub fn exposed_name(&self) -> &str {
        self.correlation_name
            .as_deref()
            .unwrap_or(self.table_name.table_name())
    }
}

/// A SELECT block: result columns, optional FROM list, optional WHERE
#[derive(Debug, Clone, PartialEq)]
pub struct SelectNode {
    pub result_columns: Box<Node>,
    pub from_list: Option<Box<Node>>,
    pub where_clause: Option<Box<Node>>,
}

impl SelectNode {
    pub fn new(result_columns: Node, from_list: Option<Node>, where_clause: Option<Node>) -> Self {
        Self {
            result_columns: Box::new(result_columns),
            from_list: from_list.map(Box::new),
            where_clause: where_clause.map(Box::new),
        }
    }

    /// Visits result columns, FROM list, WHERE clause
    pub(crate) fn accept_children(mut self, v: &mut dyn Visitor) -> crate::Result<Self> {
        self.result_columns = accept_boxed(self.result_columns, v)?;
        self.from_list = accept_opt(self.from_list, v)?;
        self.where_clause = accept_opt(self.where_clause, v)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner = 1,
    Cross = 2,
    LeftOuter = 3,
    RightOuter = 4,
    FullOuter = 5,
    Union = 6,
}

impl JoinType {
    pub fn from_code(code: i64) -> Result<Self, Fault> {
        match code {
            1 => Ok(JoinType::Inner),
            2 => Ok(JoinType::Cross),
            3 => Ok(JoinType::LeftOuter),
            4 => Ok(JoinType::RightOuter),
            5 => Ok(JoinType::FullOuter),
            6 => Ok(JoinType::Union),
            other => Err(Fault::InvalidEnumValue {
                domain: "join type",
                value: other,
            }),
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Cross => "CROSS JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
            JoinType::FullOuter => "FULL OUTER JOIN",
            JoinType::Union => "UNION JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Render a raw join-type code. Total over the six kinds; anything else is
/// a fault.
pub fn join_type_to_string(code: i64) -> Result<&'static str, Fault> {
    JoinType::from_code(code).map(JoinType::as_str)
}

/// A join of two result sets.
///
/// A RIGHT OUTER JOIN is stored as a left outer join with its operands
/// swapped, so `left`/`right` are the physical (preserved side first) order.
/// Use [`logical_left`](Self::logical_left) and
/// [`logical_right`](Self::logical_right) for SQL-source order.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinNode {
    join_type: JoinType,
    left: Box<Node>,
    right: Box<Node>,
    natural_join: bool,
    join_clause: Option<Box<Node>>,
    join_clause_normalized: bool,
    using_clause: Option<Box<Node>>,
    result_columns: Option<Box<Node>>,
    join_order_strategy_properties: Option<Properties>,
}

impl JoinNode {
    /// `left` and `right` are given in SQL-source order.
    pub fn new(
        join_type: JoinType,
        left: Node,
        right: Node,
        on_clause: Option<Node>,
        using_clause: Option<Node>,
        result_columns: Option<Node>,
        join_order_strategy_properties: Option<Properties>,
    ) -> Result<Self, SqlError> {
        if on_clause.is_some() && using_clause.is_some() {
            return Err(SqlError::new(
                "a join cannot have both an ON clause and a USING clause",
            ));
        }
        if join_type == JoinType::Cross && (on_clause.is_some() || using_clause.is_some()) {
            return Err(SqlError::new("CROSS JOIN cannot have an ON or USING clause"));
        }

        let (left, right) = if join_type == JoinType::RightOuter {
            (right, left)
        } else {
            (left, right)
        };

        Ok(Self {
            join_type,
            left: Box::new(left),
            right: Box::new(right),
            natural_join: false,
            join_clause: on_clause.map(Box::new),
            join_clause_normalized: false,
            using_clause: using_clause.map(Box::new),
            result_columns: result_columns.map(Box::new),
            join_order_strategy_properties,
        })
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    /// Physical left operand
    pub fn left(&self) -> &Node {
        &self.left
    }

    /// Physical right operand
    pub fn right(&self) -> &Node {
        &self.right
    }

    /// Left operand as written in the SQL source
    pub fn logical_left(&self) -> &Node {
        if self.join_type == JoinType::RightOuter {
            &self.right
        } else {
            &self.left
        }
    }

    /// Right operand as written in the SQL source
    pub fn logical_right(&self) -> &Node {
        if self.join_type == JoinType::RightOuter {
            &self.left
        } else {
            &self.right
        }
    }

    pub fn is_natural_join(&self) -> bool {
        self.natural_join
    }

    /// Mark this join NATURAL. The USING list is synthesized later by the
    /// binding phase; the flag cannot be cleared.
    pub fn set_natural_join(&mut self) -> Result<(), SqlError> {
        if self.join_clause.is_some() || self.using_clause.is_some() {
            return Err(SqlError::new(
                "a NATURAL join cannot have an ON or USING clause",
            ));
        }
        if self.join_type == JoinType::Cross {
            return Err(SqlError::new("CROSS JOIN cannot be NATURAL"));
        }
        self.natural_join = true;
        Ok(())
    }

    pub fn join_clause(&self) -> Option<&Node> {
        self.join_clause.as_deref()
    }

    pub fn is_join_clause_normalized(&self) -> bool {
        self.join_clause_normalized
    }

    pub fn set_join_clause_normalized(&mut self) {
        self.join_clause_normalized = true;
    }

    pub fn using_clause(&self) -> Option<&Node> {
        self.using_clause.as_deref()
    }

    /// Install the USING list synthesized for a natural join. Fails when an
    /// ON clause is present, as construction does.
    pub fn set_using_clause(&mut self, using_clause: Node) -> Result<(), SqlError> {
        if self.join_clause.is_some() {
            return Err(SqlError::new(
                "a join cannot have both an ON clause and a USING clause",
            ));
        }
        if self.join_type == JoinType::Cross {
            return Err(SqlError::new("CROSS JOIN cannot have an ON or USING clause"));
        }
        self.using_clause = Some(Box::new(using_clause));
        Ok(())
    }

    pub fn result_columns(&self) -> Option<&Node> {
        self.result_columns.as_deref()
    }

    pub fn join_order_strategy_properties(&self) -> Option<&Properties> {
        self.join_order_strategy_properties.as_ref()
    }

    /// Visits left, right, result columns, ON clause, USING list
    pub(crate) fn accept_children(mut self, v: &mut dyn Visitor) -> crate::Result<Self> {
        self.left = accept_boxed(self.left, v)?;
        self.right = accept_boxed(self.right, v)?;
        self.result_columns = accept_opt(self.result_columns, v)?;
        self.join_clause = accept_opt(self.join_clause, v)?;
        self.using_clause = accept_opt(self.using_clause, v)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_type_strings() {
        let expected = [
            (1, "INNER JOIN"),
            (2, "CROSS JOIN"),
            (3, "LEFT OUTER JOIN"),
            (4, "RIGHT OUTER JOIN"),
            (5, "FULL OUTER JOIN"),
            (6, "UNION JOIN"),
        ];
        for (code, text) in expected {
            assert_eq!(join_type_to_string(code).unwrap(), text);
        }
    }

    #[test]
    fn join_type_out_of_range_is_a_fault() {
        for code in [0, 7, -1] {
            assert_eq!(
                join_type_to_string(code),
                Err(Fault::InvalidEnumValue {
                    domain: "join type",
                    value: code
                })
            );
        }
    }
}
