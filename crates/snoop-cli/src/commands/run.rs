//! The scan command.
//!
//! 1. Load and validate configuration
//! 2. Discover inputs
//! 3. Analyze all inputs in parallel (rayon, off the async runtime)
//! 4. Report each input in order and, with a base URL, request its chunks

use std::io::{self, Write};
use std::process::ExitCode;

use snoop_core::BoaEvaluator;

use crate::analysis::{InputReport, analyze_all};
use crate::cli::Cli;
use crate::config::{SnoopConfig, build_include_set};
use crate::error::{CliError, Result};
use crate::fetch::Fetcher;
use crate::inputs::discover;
use crate::logger::should_use_colors;
use crate::report::{JsonReport, write_error, write_loader};

/// Execute a scan.
///
/// Inputs that fail to read or parse are reported and skipped; the exit code is non-zero when
/// any input failed.
pub async fn execute(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let config = SnoopConfig::load(&cli, &cwd)?;
    let include = build_include_set(&config.include)?;
    let inputs = discover(&cli.path, cli.dir, &include)?;

    let fetcher = config
        .base_url
        .as_deref()
        .map(|base_url| Fetcher::new(&config, base_url))
        .transpose()?;

    let evaluator = BoaEvaluator::new(config.sandbox_limits());
    let reports = tokio::task::spawn_blocking(move || analyze_all(&inputs, &evaluator))
        .await
        .map_err(|e| CliError::Runtime(format!("analysis task failed: {e}")))?;

    let color = !cli.no_color && should_use_colors();
    let mut failed = 0usize;
    for report in reports {
        if !emit(&cli, fetcher.as_ref(), report, color).await? {
            failed += 1;
        }
    }

    if failed > 0 {
        tracing::debug!(failed, "some inputs could not be scanned");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Print one input's report, fetching chunks as configured. Returns false if the input failed.
async fn emit(cli: &Cli, fetcher: Option<&Fetcher>, report: InputReport, color: bool) -> Result<bool> {
    let InputReport { path, outcome } = report;

    if cli.verbose && !cli.json {
        println!("PROCESS {}", path.display());
    }

    let mut loaders = match outcome {
        Ok(loaders) => loaders,
        Err(err) => {
            write_error(&mut io::stderr().lock(), &err, color)?;
            if cli.json {
                JsonReport::error(&path, &err).write(&mut io::stdout().lock())?;
            }
            return Ok(false);
        }
    };

    for loader in &mut loaders {
        if !cli.json {
            let mut stdout = io::stdout().lock();
            write_loader(&mut stdout, &path, loader)?;
            stdout.flush()?;
        }

        let Some(fetcher) = fetcher else {
            continue;
        };
        let verbose_text = cli.verbose && !cli.json;
        loader.requests = fetcher
            .fetch_all(&loader.entries, |outcome| {
                if verbose_text {
                    println!("{outcome}");
                }
            })
            .await?;
    }

    if cli.json {
        JsonReport::loaders(&path, &loaders).write(&mut io::stdout().lock())?;
    }
    Ok(true)
}
