//! jfind - a streamlined find
//!
//! jfind provides:
//! - Recursive name search with glob or substring queries
//! - Line search inside files with inline highlighting
//! - gitignore-style exclusion rules
//! - Text or jsonl output

use clap::Parser;

mod cli;
mod core;
mod search;

use crate::core::model::FindError;

fn main() {
    let cli = cli::Cli::parse();

    if let Err(err) = cli::run(cli) {
        eprintln!("error: {}", err);
        let code = err
            .downcast_ref::<FindError>()
            .map(FindError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
