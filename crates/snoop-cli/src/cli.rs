//! Command-line interface definition.
//!
//! `snoop` has a single command: scan a bundle (or a directory of bundles) for chunk loaders,
//! print every chunk they can load and optionally request each chunk from a live site.

use std::path::PathBuf;

use clap::Parser;

/// Snoop - webpack chunk loader extractor
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snoop",
    version,
    about = "Find webpack chunk loaders and list the chunk files they load",
    long_about = "Snoop scans bundled JavaScript for chunk loader functions, works out which\n\
                  chunk ids each loader accepts and runs the loader in a sandbox to recover\n\
                  the real chunk file names. With --domain every chunk is requested from the\n\
                  given site, which is handy for routing traffic through an intercepting proxy."
)]
pub struct Cli {
    /// Path to the JavaScript file containing the chunk loader
    pub path: PathBuf,

    /// Treat PATH as a directory and scan every matching file below it
    #[arg(short, long)]
    pub dir: bool,

    /// Verbose output: debug logging, processed files and HTTP responses
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all diagnostics except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Base URL for chunk file GET requests
    #[arg(short = 'D', long = "domain", value_name = "URL")]
    pub domain: Option<String>,

    /// Proxy URL for chunk file GET requests
    #[arg(short = 'x', long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Extra HTTP header for chunk file GET requests, as "Name: value" (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Do not validate HTTPS certificates for chunk file GET requests
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Maximum number of concurrent chunk file GET requests
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Path to a JSON config file (defaults to ./snoop.config.json when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Iteration limit for each loop a loader runs
    #[arg(long, value_name = "N")]
    pub fuel: Option<u64>,

    /// Print one JSON document per input instead of text
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::try_parse_from([
            "snoop",
            "dist",
            "-d",
            "-v",
            "-D",
            "https://example.com",
            "-x",
            "http://127.0.0.1:8080",
            "-H",
            "Cookie: a=b",
            "-H",
            "X-Test: 1",
            "-k",
            "-t",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.path, PathBuf::from("dist"));
        assert!(cli.dir);
        assert!(cli.verbose);
        assert_eq!(cli.domain.as_deref(), Some("https://example.com"));
        assert_eq!(cli.proxy.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(cli.headers, ["Cookie: a=b", "X-Test: 1"]);
        assert!(cli.insecure);
        assert_eq!(cli.threads, Some(4));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["snoop", "a.js", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_path_is_required() {
        assert!(Cli::try_parse_from(["snoop"]).is_err());
    }
}
