//! A two-pass macro processor and the second pass of a two-pass
//! assembler.
//!
//! The macro processor reads assembly source containing macro
//! definitions, builds the macro name table (MNT), macro definition
//! table (MDT) and argument list array (ALA), and then expands each
//! macro call in the remaining intermediate code.
//!
//! The assembler's second pass reads tagged intermediate code such as
//! `(IS,04) (1) (L,1)` along with a symbol table and a literal table,
//! and generates machine code.
#![deny(unreachable_pub)]
#![deny(unsafe_code)]
#![warn(clippy::must_use_candidate)]
#![warn(clippy::manual_string_new)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::return_self_not_must_use)]
#![warn(clippy::wildcard_imports)]
#![warn(clippy::bool_to_int_with_if)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::match_same_arms)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::items_after_statements)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::unreadable_literal)]
#![warn(clippy::pedantic)]
#![allow(clippy::enum_glob_use)] // fix later
#![allow(clippy::redundant_else)] // fix later
#![allow(clippy::too_many_lines)] // fix later
#![allow(clippy::similar_names)] // fix later
#![allow(clippy::explicit_into_iter_loop)] // fix later
#![allow(clippy::default_trait_access)] // fix later
#![allow(clippy::match_wild_err_arm)] // fix later
#![allow(clippy::redundant_closure_for_method_calls)] // fix later
#![allow(clippy::inconsistent_struct_constructor)] // fix soon
#![allow(clippy::needless_continue)] // fix soon
#![allow(clippy::manual_assert)] // fix soon
#![allow(clippy::if_not_else)] // fix soon
#![allow(clippy::doc_markdown)] // fix soon
#![allow(clippy::needless_pass_by_value)] // fix soon
#![allow(clippy::unused_self)] // fix soon
#![allow(clippy::ignored_unit_patterns)] // fix soon
#![allow(clippy::match_wildcard_for_single_variants)] // fix soon
#![allow(clippy::inefficient_to_string)] // fix soon
#![allow(clippy::map_unwrap_or)] // fix soon
#![allow(clippy::unnecessary_wraps)] // fix soon
#![allow(clippy::unnecessary_semicolon)] // fix soon
#![allow(clippy::single_match_else)] // fix soon

mod codegen;
mod driver;
mod expand;
mod icparse;
mod lexer;
mod listing;
mod options;
mod pass1;
mod symtab;
mod types;

pub use codegen::{generate, generate_all, Generator, LocationCounter};
pub use driver::*;
pub use expand::{call_bindings, expand, expand_all, CallBindings, Expansion};
pub use icparse::{parse_tagged_line, parse_tagged_program};
pub use listing::{BindingsListing, MachineCodeListing, TablesListing};
pub use options::{DuplicateMacroPolicy, MacroOptions, OutputOptions};
pub use pass1::{build_macro_tables, Pass1Output};
pub use symtab::{parse_literal_table, parse_symbol_table};
pub use types::{
    AssemblerFailure, CodegenError, IoAction, IoFailed, IoTarget, LineNumber, MacroError,
    SyntaxError,
};
