use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use clap::ArgAction::{Set, SetTrue};
use clap::Parser;
use tracing::{event, span, Level};
use tracing_subscriber::prelude::*;

use assembler::*;

const AUTHOR: &str = "Macro processor maintainers";

/// Two-pass macro processor: builds the MNT, MDT and ALA from the
/// macro definitions in the input, then expands every macro call.
#[derive(Parser, Debug)]
#[clap(author = AUTHOR, version, about, long_about = None)]
struct Cli {
    /// File from which assembly source is read.
    #[clap(action = Set)]
    input: PathBuf,

    /// File to which the expanded program is written (default:
    /// standard output).
    #[clap(action = Set, short = 'o', long)]
    output: Option<PathBuf>,

    /// Print the MNT, MDT, ALA and intermediate code.
    #[clap(action = SetTrue, long)]
    tables: bool,

    /// Print the actual argument bound to each formal parameter at
    /// every macro call.
    #[clap(action = SetTrue, long)]
    bindings: bool,

    /// Fail if a macro is defined more than once, instead of using
    /// the first definition.
    #[clap(action = SetTrue, long)]
    reject_duplicate_macros: bool,

    /// The line which starts a macro definition.
    #[clap(action = Set, long, default_value = "MACRO")]
    definition_keyword: String,

    /// The line which ends a macro definition.
    #[clap(action = Set, long, default_value = "MEND")]
    terminator_keyword: String,
}

#[derive(Debug)]
enum Fail {
    /// The macro processor started but then failed.
    MacroFail(AssemblerFailure),
    /// We were not able to start the macro processor.
    InitialisationFailure(String),
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::MacroFail(failure) => failure.fmt(f),
            Fail::InitialisationFailure(msg) => f.write_str(msg.as_str()),
        }
    }
}

impl Error for Fail {}

fn run_macro_processor() -> Result<(), Fail> {
    let cli = Cli::parse();

    // Select which trace messages get printed with the RUST_LOG
    // environment variable.  They go to stderr so that they do not
    // mix with the expanded program.
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

    let span = span!(Level::ERROR, "macrop", input=?cli.input, output=?cli.output);
    let _enter = span.enter();
    let macro_options = MacroOptions {
        definition_keyword: cli.definition_keyword,
        terminator_keyword: cli.terminator_keyword,
        duplicates: if cli.reject_duplicate_macros {
            DuplicateMacroPolicy::Reject
        } else {
            DuplicateMacroPolicy::FirstWins
        },
    };
    let output_options = OutputOptions {
        tables: cli.tables,
        bindings: cli.bindings,
    };
    let result = macro_process_file(
        &cli.input,
        &Destination::from_option(cli.output.as_deref()),
        &Destination::Stdout,
        &macro_options,
        output_options,
    )
    .map_err(Fail::MacroFail);
    match &result {
        Err(e) => event!(Level::ERROR, "macro processing failed: {:?}", e),
        Ok(output) => event!(
            Level::INFO,
            "macro processing succeeded: {} macro(s), {} line(s) of output",
            output.tables.macro_count(),
            output.expanded.len()
        ),
    }
    result.map(|_| ())
}

fn main() {
    match run_macro_processor() {
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}
