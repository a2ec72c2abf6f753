// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Flags only ever *change* options: anything not given on the command line
// keeps its value from --config, or the built-in default.
// =============================================================================

use clap::{ArgAction, Parser};
use htmlproof::{Level, Options, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "htmlproof",
    version,
    about = "Verify the links in a directory of generated HTML files",
    long_about = "htmlproof checks every <a> and <link> in a site directory: internal links must \
                  point at existing files, external links must answer with a usable HTTP status, \
                  and mailto:/tel: links must not be empty."
)]
pub struct Cli {
    /// Site root to check (defaults to the value in --config, or ".")
    pub directory: Option<PathBuf>,

    /// JSON options file; flags given here override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report plain http:// links as errors
    #[arg(long)]
    pub enforce_https: bool,

    /// Don't probe external links
    #[arg(long)]
    pub skip_external: bool,

    /// Don't check links to files inside the site
    #[arg(long)]
    pub skip_internal: bool,

    /// Don't check mailto: links
    #[arg(long)]
    pub skip_mailto: bool,

    /// Don't check tel: links
    #[arg(long)]
    pub skip_tel: bool,

    /// Ignore query strings when deciding whether a URL was already checked
    #[arg(long)]
    pub strip_query_string: bool,

    /// Keep the query string for this URL (repeatable)
    #[arg(long, value_name = "URL")]
    pub strip_query_exclude: Vec<String>,

    /// File served for directory links
    #[arg(long, value_name = "NAME")]
    pub directory_index: Option<String>,

    /// Timeout for each external request, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of links checked at the same time
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Lowest issue level to print
    #[arg(long, value_enum, default_value_t = Level::Error)]
    pub level: Level,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Builds the run options: defaults, then --config, then flags
    pub fn options(&self) -> Result<Options> {
        let mut options = match &self.config {
            Some(path) => Options::from_file(path)?,
            None => Options::default(),
        };

        if let Some(directory) = &self.directory {
            options.directory_path = directory.clone();
        }
        if self.enforce_https {
            options.enforce_https = true;
        }
        if self.skip_external {
            options.check_external = false;
        }
        if self.skip_internal {
            options.check_internal = false;
        }
        if self.skip_mailto {
            options.check_mailto = false;
        }
        if self.skip_tel {
            options.check_tel = false;
        }
        if self.strip_query_string {
            options.strip_query_string = true;
        }
        options
            .strip_query_excludes
            .extend(self.strip_query_exclude.iter().cloned());
        if let Some(index) = &self.directory_index {
            options.directory_index = index.clone();
        }
        if let Some(timeout) = self.timeout {
            options.external_timeout = timeout;
        }
        if let Some(concurrency) = self.concurrency {
            options.concurrency = concurrency;
        }

        options.validate()?;
        Ok(options)
    }

    /// tracing level for the stderr log
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}
