//! Resolving chunk ids to file names by running the loader.

use indexmap::IndexSet;
use rustc_hash::FxHashSet;

use crate::chunk::{ChunkEntry, ChunkId};
use crate::loader::Loader;
use crate::sandbox::{EvalContext, EvalError, Evaluator};
use crate::syntax::NodeKind;
use crate::walk::walk;

/// Runs loaders in fresh evaluation contexts.
pub struct Resolver<'e> {
    evaluator: &'e dyn Evaluator,
}

impl<'e> Resolver<'e> {
    pub fn new(evaluator: &'e dyn Evaluator) -> Self {
        Self { evaluator }
    }

    /// Call `loader` with each id and collect the file names it returns.
    ///
    /// Before the first call, every `ns.member` the loader reads gets an empty `ns` object, and
    /// recorded assignments to those members are replayed. Ids whose result is `undefined` are
    /// dropped. The first evaluation error stops resolution; entries found up to that point are
    /// kept.
    pub fn resolve<'a, I>(&self, loader: &Loader, ids: I) -> IndexSet<ChunkEntry>
    where
        I: IntoIterator<Item = &'a ChunkId>,
    {
        let mut context = self.evaluator.context();
        let mut entries = IndexSet::new();

        if let Err(err) = run(loader, ids, context.as_mut(), &mut entries) {
            tracing::debug!(
                error = %err,
                resolved = entries.len(),
                "chunk loader evaluation failed"
            );
        }
        entries
    }
}

fn run<'a, I>(
    loader: &Loader,
    ids: I,
    context: &mut dyn EvalContext,
    entries: &mut IndexSet<ChunkEntry>,
) -> Result<(), EvalError>
where
    I: IntoIterator<Item = &'a ChunkId>,
{
    prepare_environment(loader, context)?;

    let source = loader.source_text();
    for id in ids {
        let file = context.evaluate(&format!("({source})({});", id.to_js()))?;
        tracing::trace!(id = %id, file = %file, "evaluated chunk id");
        if file != "undefined" {
            entries.insert(ChunkEntry::new(id.clone(), file));
        }
    }
    Ok(())
}

/// Bind namespaces and replay assignments for every `ident.member` read inside the loader.
fn prepare_environment(loader: &Loader, context: &mut dyn EvalContext) -> Result<(), EvalError> {
    let mut namespaces = FxHashSet::default();
    let mut replayed = FxHashSet::default();

    for node in walk(loader.node()) {
        let NodeKind::Member { object, .. } = node.kind() else {
            continue;
        };
        let Some(namespace) = object.as_identifier() else {
            continue;
        };

        if namespaces.insert(namespace) {
            context.bind_namespace(namespace)?;
        }

        let key = node.source_text();
        if let Some(assignment) = loader.assignments().get(key) {
            if replayed.insert(key) {
                context.execute(assignment.source_text())?;
            }
        }
    }
    Ok(())
}
