use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap_stdin::FileOrStdin;

use midc::compile_with_trace;
use midc::token::read_listing;

/// Checks a token listing and lowers it to midcode.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Token listing, one `<line> <CLASS> <value>` row per token. `-` reads stdin.
    input: FileOrStdin,

    /// Write the midcode trace here instead of stdout.
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Dump the symbol table of every function.
    #[arg(short, long)]
    symbols: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let listing = args.input.contents().context("failed to read token listing")?;
    let tokens = read_listing(&listing)?;

    let trace: Box<dyn Write> = match &args.trace {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let compilation = compile_with_trace(tokens, trace)?;

    if args.symbols {
        eprintln!("{:#?}", compilation.symbol_tables);
    }
    for diagnostic in &compilation.diagnostics {
        eprintln!("{}", diagnostic);
    }

    Ok(if compilation.diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
