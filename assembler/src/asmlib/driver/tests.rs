use std::fs;
use std::path::PathBuf;

use base::prelude::Address;

use super::super::options::DuplicateMacroPolicy;
use super::*;

const INCR_SOURCE: &[&str] = &[
    "MACRO",
    "INCR &X, &Y",
    "  MOVER AREG, &X",
    "  ADD   AREG, &Y",
    "MEND",
    "START 100",
    "INCR ALPHA, BETA",
    "END",
];

fn write_input(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("should be able to write test input");
    path
}

#[test]
fn test_macro_process_lines() {
    let result =
        macro_process_lines(INCR_SOURCE, &MacroOptions::default()).expect("input is valid");
    assert_eq!(result.tables.macro_count(), 1);
    assert_eq!(
        result.intermediate.iter().collect::<Vec<_>>(),
        vec!["START 100", "INCR ALPHA, BETA", "END"]
    );
    assert_eq!(
        result
            .intermediate
            .lines()
            .iter()
            .map(|line| line.source_line)
            .collect::<Vec<_>>(),
        vec![6, 7, 8]
    );
    assert_eq!(
        result.expanded,
        vec![
            "START 100".to_string(),
            "MOVER AREG, ALPHA".to_string(),
            "ADD   AREG, BETA".to_string(),
            "END".to_string(),
        ]
    );
}

#[test]
fn test_macro_process_lines_reports_first_pass_errors() {
    let source = ["MACRO", "INCR &X", "MEND", "MACRO", "INCR &Y", "MEND"];
    let options = MacroOptions {
        duplicates: DuplicateMacroPolicy::Reject,
        ..MacroOptions::default()
    };
    assert!(matches!(
        macro_process_lines(&source, &options),
        Err(MacroError::DuplicateMacro { line: 5, .. })
    ));
}

#[test]
fn test_macro_process_lines_reports_second_pass_errors() {
    let source = ["MACRO", "INCR &X", "LOAD &X", "MEND", "INCR"];
    assert!(matches!(
        macro_process_lines(&source, &MacroOptions::default()),
        Err(MacroError::ArgumentCountMismatch {
            line: 5,
            needed: 1,
            supplied: 0,
            ..
        })
    ));
}

#[test]
fn test_macro_process_file_writes_expansion() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let input = write_input(&dir, "incr.asm", &INCR_SOURCE.join("\n"));
    let output = dir.path().join("incr.out");
    let reports = dir.path().join("incr.reports");
    let result = macro_process_file(
        &input,
        &Destination::File(output.clone()),
        &Destination::File(reports.clone()),
        &MacroOptions::default(),
        OutputOptions::default(),
    )
    .expect("input is valid");
    assert_eq!(result.expanded.len(), 4);
    assert_eq!(
        fs::read_to_string(&output).expect("output should exist"),
        "START 100\nMOVER AREG, ALPHA\nADD   AREG, BETA\nEND\n"
    );
    // No reports were requested.
    assert!(!reports.exists());
}

#[test]
fn test_macro_process_file_writes_reports() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let input = write_input(&dir, "incr.asm", &INCR_SOURCE.join("\n"));
    let output = dir.path().join("incr.out");
    let reports = dir.path().join("incr.reports");
    macro_process_file(
        &input,
        &Destination::File(output),
        &Destination::File(reports.clone()),
        &MacroOptions::default(),
        OutputOptions {
            tables: true,
            bindings: true,
        },
    )
    .expect("input is valid");
    let text = fs::read_to_string(&reports).expect("reports should exist");
    assert!(text.starts_with("MNT:\n1\tINCR\t1\n"), "unexpected report {text}");
    assert!(text.contains("Line 7: INCR\n   Before: &X\n   After : ALPHA\n"));
    assert!(text.contains("   Before: &Y\n   After : BETA\n"));
}

#[test]
fn test_macro_process_missing_file() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let missing = dir.path().join("no-such-file.asm");
    match macro_process_file(
        &missing,
        &Destination::Stdout,
        &Destination::Stdout,
        &MacroOptions::default(),
        OutputOptions::default(),
    ) {
        Err(AssemblerFailure::Io(IoFailed {
            action: IoAction::Read,
            target: IoTarget::File(name),
            ..
        })) => {
            assert_eq!(name, missing);
        }
        other => panic!("expected a read failure, got {other:?}"),
    }
}

#[test]
fn test_macro_error_names_the_file() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let input = write_input(&dir, "broken.asm", "MACRO\nINCR &X\nLOAD &X\n");
    let failure = macro_process_file(
        &input,
        &Destination::Stdout,
        &Destination::Stdout,
        &MacroOptions::default(),
        OutputOptions::default(),
    )
    .expect_err("definition is not terminated");
    match &failure {
        AssemblerFailure::Macro {
            file,
            error: MacroError::MalformedDefinition { line: 2, .. },
        } => assert_eq!(file, &input),
        other => panic!("unexpected failure {other:?}"),
    }
    assert!(failure.to_string().contains("broken.asm"));
}

#[test]
fn test_expansion_error_names_the_source_line() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let input = write_input(
        &dir,
        "short.asm",
        "MACRO\nINCR &X\nLOAD &X\nMEND\nSTART 100\nINCR\nEND\n",
    );
    let failure = macro_process_file(
        &input,
        &Destination::Stdout,
        &Destination::Stdout,
        &MacroOptions::default(),
        OutputOptions::default(),
    )
    .expect_err("the call supplies no argument");
    match &failure {
        AssemblerFailure::Macro {
            file,
            error: MacroError::ArgumentCountMismatch { line: 6, .. },
        } => assert_eq!(file, &input),
        other => panic!("expected an argument count mismatch at line 6, got {other:?}"),
    }
    assert!(
        failure.to_string().contains("short.asm: line 6: "),
        "unexpected message {failure}"
    );
}

#[test]
fn test_assemble_ic_file() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let ic = write_input(
        &dir,
        "demo.ic",
        "(AD,1) (C,200)\n(IS,4) (1) (L,1)\n(IS,1) (2) (S,1)\n(DL,1) (C,2)\n(AD,2)\n",
    );
    let symtab = write_input(&dir, "demo.symtab", "ALPHA 202\n");
    let littab = write_input(&dir, "demo.littab", "='5' 203\n");
    let output = dir.path().join("demo.out");
    let words = assemble_ic_file(&ic, &symtab, &littab, &Destination::File(output.clone()))
        .expect("input is valid");
    assert_eq!(words.len(), 3);
    assert_eq!(words[0].address, Address::new(200));
    assert_eq!(
        fs::read_to_string(&output).expect("output should exist"),
        "200) 04 1 203\n201) 01 2 202\n202) 00 0 002\n"
    );
}

#[test]
fn test_assemble_ic_file_bad_table() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let ic = write_input(&dir, "demo.ic", "(AD,1) (C,200)\n(AD,2)\n");
    let symtab = write_input(&dir, "demo.symtab", "ALPHA\n");
    let littab = write_input(&dir, "demo.littab", "");
    match assemble_ic_file(&ic, &symtab, &littab, &Destination::Stdout) {
        Err(AssemblerFailure::BadInput {
            file,
            error: SyntaxError { line: 1, .. },
        }) => assert_eq!(file, symtab),
        other => panic!("expected a table syntax error, got {other:?}"),
    }
}

#[test]
fn test_assemble_ic_file_unresolved_operand() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let ic = write_input(&dir, "demo.ic", "(AD,1) (C,200)\n(IS,1) (2) (S,3)\n");
    let symtab = write_input(&dir, "demo.symtab", "ALPHA 202\n");
    let littab = write_input(&dir, "demo.littab", "");
    let output = dir.path().join("demo.out");
    assert!(matches!(
        assemble_ic_file(&ic, &symtab, &littab, &Destination::File(output.clone())),
        Err(AssemblerFailure::Codegen(
            super::super::types::CodegenError::UnresolvedOperandIndex { statement: 2, .. }
        ))
    ));
    assert!(!output.exists());
}
