//! Dump a .pptx deck as a JSON tree.
//!
//! Usage:
//!   pptx-tree [OPTIONS] <PPTX>
//!
//! Options:
//!   -o, --output <FILE>  Write the JSON here instead of stdout
//!   --pretty             Indent the JSON by two spaces

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use slidecraft::ooxml::pptx::MutablePresentation;
use slidecraft::tree::presentation_tree;

#[derive(Parser)]
#[command(name = "pptx-tree")]
#[command(about = "Print the slides, shapes and masters of a .pptx deck as JSON")]
struct Cli {
    /// Deck to read
    input: PathBuf,

    /// Output file (stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Indent the output
    #[arg(long)]
    pretty: bool,
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

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> slidecraft::Result<()> {
    let pres = MutablePresentation::open(&cli.input)?;
    let tree = presentation_tree(&pres);
    let json = if cli.pretty {
        serde_json::to_string_pretty(&tree)?
    } else {
        serde_json::to_string(&tree)?
    };
    match &cli.output {
        Some(path) => fs::write(path, json + "\n")?,
        None => println!("{}", json),
    }
    Ok(())
}
