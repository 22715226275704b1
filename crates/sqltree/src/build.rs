//! Building trees from reduction scripts
//!
//! Productions are reduced bottom-up: every nested production is built
//! before the production that contains it, exactly as a grammar engine
//! would emit them.

use crate::ast::{Node, SourcePos};
use crate::diagnostics::{Diagnostics, LogDiagnostics, SqlError};
use crate::factory::{NodeArg, NodeFactory};
use crate::parse::{self, Production, ScriptArg};
use crate::{Error, Result};

/// Build the single statement or expression in `script`
pub fn build(script: &str) -> Result<Node> {
    build_with(&NodeFactory::new(), script)
}

pub fn build_with(factory: &NodeFactory<'_>, script: &str) -> Result<Node> {
    let production = parse::parse_production(script)?;
    reduce(factory, production)
}

/// Reduce one parsed production through the factory
pub fn reduce(factory: &NodeFactory<'_>, production: Production) -> Result<Node> {
    let pos = SourcePos::from(production.span);
    let args = production
        .args
        .into_iter()
        .map(|arg| match arg {
            ScriptArg::Production(child) => reduce(factory, child).map(NodeArg::Node),
            ScriptArg::Value(value) => Ok(value),
        })
        .collect::<Result<Vec<_>>>()?;
    factory.create_at(production.code.code(), args, pos)
}

/// Statements built from one script. Statements with SQL errors are left
/// out; their errors are kept alongside the statement index.
#[derive(Debug, Default)]
pub struct Batch {
    pub statements: Vec<Node>,
    pub errors: Vec<(usize, SqlError)>,
}

impl Batch {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Builds `;`-separated statement batches.
///
/// A SQL error abandons only its own statement. A fault aborts the whole
/// batch.
pub struct BatchBuilder<'a> {
    factory: NodeFactory<'a>,
    diagnostics: Option<&'a mut dyn Diagnostics>,
}

impl Default for BatchBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> BatchBuilder<'a> {
    pub fn new() -> Self {
        Self {
            factory: NodeFactory::new(),
            diagnostics: None,
        }
    }

    pub fn with_factory(mut self, factory: NodeFactory<'a>) -> Self {
        self.factory = factory;
        self
    }

    /// Report to `diagnostics` instead of the `log` facade
    pub fn with_diagnostics(mut self, diagnostics: &'a mut dyn Diagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    pub fn build(&mut self, script: &str) -> Result<Batch> {
        let mut fallback = LogDiagnostics;
        let sink: &mut dyn Diagnostics = match self.diagnostics.as_deref_mut() {
            Some(diagnostics) => diagnostics,
            None => &mut fallback,
        };

        let productions = parse::parse_script(script)?;
        log::debug!("building batch of {} statements", productions.len());

        let mut batch = Batch::default();
        for (index, production) in productions.into_iter().enumerate() {
            match reduce(&self.factory, production) {
                Ok(node) => {
                    log::trace!("statement {index}: built {}", node.node_type());
                    batch.statements.push(node);
                }
                Err(Error::Sql(e)) => {
                    sink.sql_error(&e);
                    batch.errors.push((index, e));
                }
                Err(Error::Fault(fault)) => {
                    sink.fault(&fault);
                    return Err(fault.into());
                }
                Err(e @ Error::Parse(_)) => return Err(e),
            }
        }
        Ok(batch)
    }
}
