//! Rendering scan results.
//!
//! Text output:
//!
//! ```text
//! Found chunk loader in dist/runtime.js:
//! (e) => "static/js/" + e + ".chunk.js"
//!
//! 179: static/js/179.chunk.js
//! 216: static/js/216.chunk.js
//!
//! ```
//!
//! Errors go to stderr as an `ERROR:` line followed by one `DUE TO:` line per underlying cause.

use std::io::{self, Write};
use std::path::Path;

use owo_colors::OwoColorize;
use serde::Serialize;
use snoop_core::SnoopError;

use crate::analysis::LoaderReport;
use crate::error::error_chain;

/// Write one loader in text form.
pub fn write_loader(out: &mut impl Write, path: &Path, loader: &LoaderReport) -> io::Result<()> {
    writeln!(out, "Found chunk loader in {}:", path.display())?;
    writeln!(out, "{}", loader.source)?;
    if !loader.entries.is_empty() {
        writeln!(out)?;
        for entry in &loader.entries {
            writeln!(out, "{entry}")?;
        }
    }
    writeln!(out)
}

/// Write an error and its causes.
pub fn write_error(
    out: &mut impl Write,
    err: &(dyn std::error::Error + 'static),
    color: bool,
) -> io::Result<()> {
    let chain = error_chain(err);
    let mut lines = chain.iter();
    if let Some(message) = lines.next() {
        writeln!(out, "{} {}", label("ERROR:", color), message)?;
    }
    for cause in lines {
        writeln!(out, "{} {}", label("DUE TO:", color), cause)?;
    }
    Ok(())
}

fn label(text: &str, color: bool) -> String {
    if color {
        text.red().bold().to_string()
    } else {
        text.to_string()
    }
}

/// One JSON document per input.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum JsonReport<'a> {
    Loaders {
        path: &'a Path,
        loaders: &'a [LoaderReport],
    },
    Error {
        path: &'a Path,
        error: String,
        causes: Vec<String>,
    },
}

impl<'a> JsonReport<'a> {
    pub fn loaders(path: &'a Path, loaders: &'a [LoaderReport]) -> Self {
        Self::Loaders { path, loaders }
    }

    pub fn error(path: &'a Path, err: &SnoopError) -> Self {
        let mut chain = error_chain(err).into_iter();
        Self::Error {
            path,
            error: chain.next().unwrap_or_default(),
            causes: chain.collect(),
        }
    }

    /// Write as a single line.
    pub fn write(&self, out: &mut impl Write) -> Result<(), serde_json::Error> {
        serde_json::to_writer(&mut *out, self)?;
        writeln!(out).map_err(serde_json::Error::io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchOutcome;
    use snoop_core::{ChunkEntry, ChunkId};
    use std::path::PathBuf;

    fn loader() -> LoaderReport {
        LoaderReport {
            source: "(e) => [\"a.js\"][e]".to_string(),
            entries: vec![
                ChunkEntry::new(ChunkId::bare("0"), "a.js"),
                ChunkEntry::new(ChunkId::quoted("x"), "x.js"),
            ],
            requests: Vec::new(),
        }
    }

    #[test]
    fn test_text_layout() {
        let mut out = Vec::new();
        write_loader(&mut out, Path::new("dist/app.js"), &loader()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Found chunk loader in dist/app.js:\n(e) => [\"a.js\"][e]\n\n0: a.js\n\"x\": x.js\n\n"
        );
    }

    #[test]
    fn test_text_layout_without_entries() {
        let mut empty = loader();
        empty.entries.clear();
        let mut out = Vec::new();
        write_loader(&mut out, Path::new("a.js"), &empty).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Found chunk loader in a.js:\n(e) => [\"a.js\"][e]\n\n"
        );
    }

    #[test]
    fn test_error_lines() {
        let err = SnoopError::ReadFile {
            path: PathBuf::from("gone.js"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file"),
        };
        let mut out = Vec::new();
        write_error(&mut out, &err, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ERROR: Failed to read gone.js\nDUE TO: No such file\n"
        );
    }

    #[test]
    fn test_json_document() {
        let mut report = loader();
        report.requests.push(FetchOutcome {
            url: "https://example.com/a.js".into(),
            status: Some(200),
            error: None,
        });
        let loaders = [report];

        let mut out = Vec::new();
        JsonReport::loaders(Path::new("app.js"), &loaders)
            .write(&mut out)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["path"], "app.js");
        assert_eq!(value["loaders"][0]["entries"][1]["id"]["content"], "x");
        assert_eq!(value["loaders"][0]["entries"][1]["id"]["quoted"], true);
        assert_eq!(value["loaders"][0]["requests"][0]["status"], 200);
        assert!(out.ends_with(b"\n"));
    }

    #[test]
    fn test_json_error_document() {
        let err = SnoopError::parse("Unexpected token");
        let mut out = Vec::new();
        JsonReport::error(Path::new("bad.js"), &err)
            .write(&mut out)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["error"], "Failed to parse JavaScript: Unexpected token");
        assert_eq!(value["causes"].as_array().unwrap().len(), 0);
    }
}
