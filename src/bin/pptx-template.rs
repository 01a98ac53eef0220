//! Emit `slide_layout!`/`slide_master!` declarations for a .pptx deck.
//!
//! Usage:
//!   pptx-template [OPTIONS] <PPTX>
//!
//! Options:
//!   -o, --output <FILE>  Write the Rust source here instead of stdout

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use slidecraft::codegen::generate_template;

#[derive(Parser)]
#[command(name = "pptx-template")]
#[command(about = "Generate Rust layout and master declarations from a .pptx deck")]
struct Cli {
    /// Deck whose first master is described
    input: PathBuf,

    /// Output file (stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if !cli.input.is_file() {
        eprintln!("Error: file not found: {}", cli.input.display());
        process::exit(1);
    }

    let source = match generate_template(&cli.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let written = match &cli.output {
        Some(path) => fs::write(path, &source),
        None => {
            print!("{}", source);
            Ok(())
        }
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}
