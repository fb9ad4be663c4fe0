//! Per-input scanning: read, detect loaders, resolve their chunks.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use snoop_core::{ChunkEntry, Evaluator, SnoopError, read_source, scan_source};

use crate::fetch::FetchOutcome;

/// One loader found in an input, with the chunks it resolved to.
#[derive(Debug, Clone, Serialize)]
pub struct LoaderReport {
    /// The loader, reformatted for display
    pub source: String,
    pub entries: Vec<ChunkEntry>,
    /// Chunk requests made for `entries`, when a base URL is configured
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<FetchOutcome>,
}

/// The result of scanning one input file.
#[derive(Debug)]
pub struct InputReport {
    pub path: PathBuf,
    pub outcome: Result<Vec<LoaderReport>, SnoopError>,
}

/// Scan JavaScript source.
///
/// Loaders with no recoverable ids are left out of the report.
pub fn analyze_source(source: &str, evaluator: &dyn Evaluator) -> Result<Vec<LoaderReport>, SnoopError> {
    let loaders = scan_source(source)?;

    let mut reports = Vec::with_capacity(loaders.len());
    for loader in &loaders {
        let ids = loader.ids();
        if ids.is_empty() {
            tracing::debug!(loader = loader.source_text(), "skipping loader without ids");
            continue;
        }
        let entries = loader.resolve(evaluator, &ids);
        reports.push(LoaderReport {
            source: loader.pretty(),
            entries: entries.into_iter().collect(),
            requests: Vec::new(),
        });
    }
    Ok(reports)
}

/// Read and scan a single file.
pub fn analyze_file(path: &Path, evaluator: &dyn Evaluator) -> InputReport {
    let _span = tracing::debug_span!("analyze", path = %path.display()).entered();
    let outcome = read_source(path).and_then(|source| analyze_source(&source, evaluator));
    InputReport {
        path: path.to_path_buf(),
        outcome,
    }
}

/// Scan files in parallel; reports come back in input order.
pub fn analyze_all(paths: &[PathBuf], evaluator: &dyn Evaluator) -> Vec<InputReport> {
    paths
        .par_iter()
        .map(|path| analyze_file(path, evaluator))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use snoop_core::BoaEvaluator;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_source_resolves_loader() {
        let reports = analyze_source(
            r#"n.p = "/js/"; n.u = e => n.p + ["a.js", "b.js"][e];"#,
            &BoaEvaluator::default(),
        )
        .unwrap();
        assert_eq!(reports.len(), 1);
        let files: Vec<&str> = reports[0].entries.iter().map(|e| e.file.as_str()).collect();
        assert_eq!(files, ["/js/a.js", "/js/b.js"]);
    }

    #[test]
    fn test_loader_without_ids_is_skipped() {
        let reports =
            analyze_source(r#"x = e => "chunk-" + e + ".js";"#, &BoaEvaluator::default()).unwrap();
        assert!(reports.is_empty());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = analyze_source("function (", &BoaEvaluator::default()).unwrap_err();
        assert!(matches!(err, SnoopError::Parse { .. }));
    }

    #[test]
    fn test_analyze_all_keeps_order() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.js");
        let missing = temp.path().join("missing.js");
        fs::write(&good, r#"x = e => ({ 1: "one.js" })[e];"#).unwrap();

        let reports = analyze_all(&[missing.clone(), good.clone()], &BoaEvaluator::default());
        assert_eq!(reports[0].path, missing);
        assert!(matches!(reports[0].outcome, Err(SnoopError::ReadFile { .. })));
        assert_eq!(reports[1].path, good);
        assert_eq!(reports[1].outcome.as_ref().unwrap()[0].entries.len(), 1);
    }
}
