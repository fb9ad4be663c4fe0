//! Whole-module scan: candidate loaders plus the assignment index they share.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::classify::is_candidate;
use crate::error::Result;
use crate::loader::Loader;
use crate::syntax::{Module, Node, NodeKind, NodeTag};
use crate::walk::walk;

/// Most recent plain assignment to each member-access target in a module.
///
/// Keys are the source text of the left-hand side (`n.p`, `r.miniCssF`), values the whole
/// assignment expression. Only `=` assignments whose value is not a function literal are kept,
/// and a later assignment to the same key replaces the earlier one.
#[derive(Debug, Default, Clone)]
pub struct AssignmentIndex {
    entries: IndexMap<String, Node>,
}

impl AssignmentIndex {
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Record `node` if it is an assignment worth replaying.
    fn record(&mut self, node: &Node) {
        let NodeKind::Assignment {
            operator: "=",
            target,
            value,
        } = node.kind()
        else {
            return;
        };
        if target.tag() != NodeTag::Member || value.is_function() {
            return;
        }
        self.entries
            .insert(target.source_text().to_string(), node.clone());
    }
}

/// Walk `module` once, collecting every candidate loader and the assignment index.
///
/// Loaders are returned in visitation order and all share one snapshot of the index, which
/// covers the whole module and not only the code preceding each loader.
pub fn scan(module: &Module) -> Vec<Loader> {
    let mut candidates = Vec::new();
    let mut assignments = AssignmentIndex::default();

    for node in walk(module.root()) {
        if is_candidate(node) {
            candidates.push(node.clone());
        }
        assignments.record(node);
    }

    tracing::debug!(
        loaders = candidates.len(),
        assignments = assignments.len(),
        "scanned module"
    );

    let assignments = Arc::new(assignments);
    candidates
        .into_iter()
        .map(|node| Loader::new(node, Arc::clone(&assignments)))
        .collect()
}

/// Parse `source` and scan it.
pub fn scan_source(source: &str) -> Result<Vec<Loader>> {
    let module = Module::parse(source)?;
    Ok(scan(&module))
}
