//! Comprehender CLI - documentation and architecture diagrams for Java projects.

use clap::Parser;
use comprehender::cli::{run, Cli};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
