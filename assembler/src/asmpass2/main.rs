use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use clap::ArgAction::Set;
use clap::Parser;
use tracing::{event, span, Level};
use tracing_subscriber::prelude::*;

use assembler::*;

const AUTHOR: &str = "Macro processor maintainers";

/// Second pass of a two-pass assembler: generates machine code from
/// tagged intermediate code and the symbol and literal tables.
#[derive(Parser, Debug)]
#[clap(author = AUTHOR, version, about, long_about = None)]
struct Cli {
    /// File from which tagged intermediate code is read.
    #[clap(action = Set)]
    input: PathBuf,

    /// Symbol table file; one "NAME ADDRESS" pair per line.
    #[clap(action = Set, long)]
    symtab: PathBuf,

    /// Literal table file; one "LITERAL ADDRESS" pair per line.
    #[clap(action = Set, long)]
    littab: PathBuf,

    /// File to which the machine code is written (default: standard
    /// output).
    #[clap(action = Set, short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(Debug)]
enum Fail {
    /// We initialised the assembler but then it fails.
    AsmFail(AssemblerFailure),
    /// We were not able to correctly initialise the assembler.
    InitialisationFailure(String),
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::AsmFail(assembler_failure) => assembler_failure.fmt(f),
            Fail::InitialisationFailure(msg) => f.write_str(msg.as_str()),
        }
    }
}

impl Error for Fail {}

fn run_pass2() -> Result<(), Fail> {
    let cli = Cli::parse();

    // Select which trace messages get printed with the RUST_LOG
    // environment variable.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            return Err(Fail::InitialisationFailure(format!(
                "failed to initialise tracing filter (perhaps there is a problem with environment variables): {e}"
            )));
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let span = span!(Level::ERROR, "asmpass2", input=?cli.input, output=?cli.output);
    let _enter = span.enter();
    let result = assemble_ic_file(
        &cli.input,
        &cli.symtab,
        &cli.littab,
        &Destination::from_option(cli.output.as_deref()),
    )
    .map_err(Fail::AsmFail);
    if let Err(e) = &result {
        event!(Level::ERROR, "assembly failed: {:?}", e);
    } else {
        event!(Level::INFO, "assembly succeeded");
    }
    result.map(|_| ())
}

fn main() {
    match run_pass2() {
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}
