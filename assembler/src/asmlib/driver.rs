use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{event, span, Level};

use base::prelude::{IntermediateCode, LiteralTable, MachineWord, MacroTables, SymbolTable};

use super::codegen::generate_all;
use super::expand::{call_bindings, expand_all};
use super::icparse::parse_tagged_program;
use super::listing::{BindingsListing, MachineCodeListing, TablesListing};
use super::options::{MacroOptions, OutputOptions};
use super::pass1::{build_macro_tables, Pass1Output};
use super::symtab::{parse_literal_table, parse_symbol_table};
use super::types::{AssemblerFailure, IoAction, IoFailed, IoTarget, MacroError, SyntaxError};

mod output;
#[cfg(test)]
mod tests;

pub use output::Destination;

/// Everything produced by the two passes of the macro processor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroProcessorOutput {
    pub tables: MacroTables,
    pub intermediate: IntermediateCode,
    pub expanded: Vec<String>,
}

/// Run both passes of the macro processor over `source`.
///
/// # Errors
///
/// Any [`MacroError`] from either pass.
pub fn macro_process_lines<S: AsRef<str>>(
    source: &[S],
    options: &MacroOptions,
) -> Result<MacroProcessorOutput, MacroError> {
    let Pass1Output {
        tables,
        intermediate,
    } = build_macro_tables(source, options)?;
    let expanded = {
        let span = span!(Level::INFO, "macro pass 2");
        let _enter = span.enter();
        expand_all(&tables, &intermediate)?
    };
    event!(
        Level::INFO,
        "macro expansion produced {} line(s)",
        expanded.len()
    );
    Ok(MacroProcessorOutput {
        tables,
        intermediate,
        expanded,
    })
}

fn read_failure(path: &Path, error: std::io::Error) -> AssemblerFailure {
    AssemblerFailure::Io(IoFailed {
        action: IoAction::Read,
        target: IoTarget::File(path.to_path_buf()),
        error,
    })
}

/// Read the lines of a source file.
///
/// # Errors
///
/// Fails if the file cannot be opened or read.
pub fn read_source_lines(path: &Path) -> Result<Vec<String>, AssemblerFailure> {
    let input = OpenOptions::new()
        .read(true)
        .open(path)
        .map_err(|e| read_failure(path, e))?;
    BufReader::new(input)
        .lines()
        .collect::<Result<Vec<String>, _>>()
        .map_err(|e| read_failure(path, e))
}

fn read_file(path: &Path) -> Result<String, AssemblerFailure> {
    let mut body = String::new();
    OpenOptions::new()
        .read(true)
        .open(path)
        .and_then(|mut f| f.read_to_string(&mut body))
        .map_err(|e| read_failure(path, e))?;
    Ok(body)
}

fn bad_input(path: &Path) -> impl FnOnce(SyntaxError) -> AssemblerFailure + '_ {
    move |error| AssemblerFailure::BadInput {
        file: path.to_path_buf(),
        error,
    }
}

/// Run the macro processor over the file `input`.  The expanded
/// program is written to `output`; any reports selected by
/// `output_options` are written to `reports` first.
///
/// # Errors
///
/// - The input cannot be read or the output cannot be written.
/// - Either pass of the macro processor fails.
pub fn macro_process_file(
    input: &Path,
    output: &Destination,
    reports: &Destination,
    macro_options: &MacroOptions,
    output_options: OutputOptions,
) -> Result<MacroProcessorOutput, AssemblerFailure> {
    let span = span!(Level::ERROR, "macro process", input=?input);
    let _enter = span.enter();

    let source = read_source_lines(input)?;
    let result =
        macro_process_lines(&source, macro_options).map_err(|error| AssemblerFailure::Macro {
            file: input.to_path_buf(),
            error,
        })?;

    let mut report = String::new();
    if output_options.tables {
        report.push_str(
            &TablesListing {
                tables: &result.tables,
                intermediate: &result.intermediate,
            }
            .to_string(),
        );
        report.push('\n');
    }
    if output_options.bindings {
        let bindings = call_bindings(&result.tables, &result.intermediate);
        report.push_str(&BindingsListing(&bindings).to_string());
        report.push('\n');
    }
    if !report.is_empty() {
        reports.write_text(&report)?;
    }

    let mut expanded = result.expanded.join("\n");
    if !expanded.is_empty() {
        expanded.push('\n');
    }
    output.write_text(&expanded)?;
    Ok(result)
}

/// Load the symbol and literal tables from files.
///
/// # Errors
///
/// Fails if either file cannot be read or is not a valid table.
pub fn load_tables(
    symtab: &Path,
    littab: &Path,
) -> Result<(SymbolTable, LiteralTable), AssemblerFailure> {
    let symbols = parse_symbol_table(&read_file(symtab)?).map_err(bad_input(symtab))?;
    let literals = parse_literal_table(&read_file(littab)?).map_err(bad_input(littab))?;
    event!(
        Level::DEBUG,
        "loaded {} symbol(s) and {} literal(s)",
        symbols.len(),
        literals.len()
    );
    Ok((symbols, literals))
}

/// Generate machine code for the tagged intermediate code in
/// `input`, resolving operands through the tables, and write the
/// machine code listing to `output`.
///
/// # Errors
///
/// - An input cannot be read or the output cannot be written.
/// - An input file is not valid.
/// - Code generation fails.
pub fn assemble_ic_file(
    input: &Path,
    symtab: &Path,
    littab: &Path,
    output: &Destination,
) -> Result<Vec<MachineWord>, AssemblerFailure> {
    let span = span!(Level::ERROR, "assembler pass 2", input=?input);
    let _enter = span.enter();

    let statements = parse_tagged_program(&read_file(input)?).map_err(bad_input(input))?;
    let (symbols, literals) = load_tables(symtab, littab)?;
    let words = generate_all(&statements, &symbols, &literals)?;
    event!(Level::INFO, "generated {} word(s) of machine code", words.len());
    output.write_text(&MachineCodeListing(&words).to_string())?;
    Ok(words)
}
