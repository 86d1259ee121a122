//! The `base` crate defines the intermediate representation shared
//! by the stages of the macro processor and the assembler back end.
//! It holds data only; the stages which fill in and consume these
//! tables live in the `assembler` crate.

mod address;
mod macrotab;
mod statement;
mod symtab;

pub mod prelude;
