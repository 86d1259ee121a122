//! The prelude exports the table and statement types which make up
//! the intermediate representation.  Providing this prelude is the
//! main purpose of the base crate.
pub use super::address::*;
pub use super::macrotab::*;
pub use super::statement::*;
pub use super::symtab::*;
