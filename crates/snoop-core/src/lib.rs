//! # snoop-core
//!
//! Find webpack-style chunk loaders in bundled JavaScript and work out which files they load.
//!
//! A chunk loader is the runtime glue a bundler emits to turn an opaque chunk id into the file
//! name of a code-split fragment, for example
//!
//! ```js
//! r.u = e => "static/js/" + e + "." + { 179: "5e6f", 216: "0a1b" }[e] + ".chunk.js";
//! ```
//!
//! Scanning a module yields every such function. For each loader the crate recovers the ids it
//! can plausibly accept from the loader's shape and then runs the loader in a sandbox, once per
//! id, to observe the real file names.
//!
//! ## Pipeline
//!
//! ```text
//! source ──parse──▶ Module ──scan──▶ Vec<Loader> ──ids──▶ IndexSet<ChunkId>
//!                                        │                      │
//!                                        └──────resolve─────────┴──▶ IndexSet<ChunkEntry>
//! ```
//!
//! - [`syntax`] parses with Oxc and lowers into an owned, thread-safe [`Node`] tree.
//! - [`classify`] decides whether a function looks like a loader.
//! - [`scan`] collects loaders and the member assignments they may depend on.
//! - [`extract`] recovers candidate ids (array index, equality, object map, switch).
//! - [`resolve`] replays assignments and evaluates the loader per id.
//! - [`sandbox`] provides the evaluation capability and the built-in Boa-backed engine.
//!
//! ## Example
//!
//! ```rust
//! use snoop_core::{BoaEvaluator, scan_source};
//!
//! let loaders = scan_source(r#"n.u = e => ["a.js", "b.js"][e];"#)?;
//! let entries = loaders[0].entries(&BoaEvaluator::default());
//!
//! let lines: Vec<String> = entries.iter().map(ToString::to_string).collect();
//! assert_eq!(lines, ["0: a.js", "1: b.js"]);
//! # Ok::<(), snoop_core::SnoopError>(())
//! ```

pub mod chunk;
pub mod classify;
pub mod error;
pub mod extract;
pub mod loader;
pub mod resolve;
pub mod sandbox;
pub mod scan;
pub mod source;
pub mod syntax;
pub mod walk;

pub use chunk::{ChunkEntry, ChunkId};
pub use classify::is_candidate;
pub use error::{Result, SnoopError};
pub use extract::{Extractor, extract_ids};
pub use loader::Loader;
pub use resolve::Resolver;
pub use sandbox::{BoaEvaluator, EvalContext, EvalError, Evaluator, SandboxLimits};
pub use scan::{AssignmentIndex, scan, scan_source};
pub use source::{MAX_FILE_SIZE, read_source};
pub use syntax::{Module, Node, NodeKind, NodeTag, SourceKind, parse_module};
pub use walk::{Walk, walk};
