// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Find every HTML document under the site root
// 3. Check all their links concurrently
// 4. Print the issues and exit with the proper code
//    (0 = no errors, 1 = broken links, 2 = could not complete the run)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use htmlproof::crawl::{self, Page};
use htmlproof::report::{self, Summary};
use htmlproof::{Checker, IssueStore};
use std::sync::Arc;
use tracing::info;

// The #[tokio::main] attribute transforms our async main into a real main function
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If the run couldn't finish, print why and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no ERROR issues
//   Ok(1) = at least one ERROR issue
//   Err   = the run was aborted
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with a --json report on stdout
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let options = cli.options().context("invalid options")?;
    let root = options.directory_path.clone();

    let pages = crawl::crawl_directory(&root, &options.file_extension)
        .with_context(|| format!("cannot read site at {}", root.display()))?;
    let links: Vec<_> = pages.iter().flat_map(Page::links).collect();
    info!(documents = pages.len(), links = links.len(), root = %root.display(), "checking site");

    let store = Arc::new(IssueStore::new());
    let checker = Checker::new(options, store.clone())?;
    let checked = checker.check_documents(links).await?;
    info!(checked, cached_urls = checker.cached_urls(), "done");

    let issues = store.issues();
    if cli.json {
        println!("{}", report::render_json(&issues, cli.level)?);
    } else {
        let summary = Summary {
            documents: pages.len(),
            links: checked,
        };
        print!("{}", report::render_table(&issues, cli.level, summary));
    }

    if store.has_errors() {
        Ok(1)
    } else {
        Ok(0)
    }
}
