//! Human-readable reports of the tables and of the generated code.
//! These are for people to read; nothing parses them.
use std::fmt::{self, Display, Formatter};

use base::prelude::{IntermediateCode, MachineWord, MacroTables};

use super::expand::CallBindings;

/// The MNT, MDT, ALA and intermediate code.  Indexes in this listing
/// count from 1.
pub struct TablesListing<'a> {
    pub tables: &'a MacroTables,
    pub intermediate: &'a IntermediateCode,
}

impl Display for TablesListing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let tables = self.tables;
        writeln!(f, "MNT:")?;
        for (i, entry) in tables.mnt().iter().enumerate() {
            writeln!(f, "{}\t{}\t{}", i + 1, entry.name, entry.body_start + 1)?;
        }

        writeln!(f)?;
        writeln!(f, "MDT:")?;
        for (i, line) in tables.mdt().iter().enumerate() {
            writeln!(f, "{}\t{line}", i + 1)?;
        }

        writeln!(f)?;
        writeln!(f, "ALA:")?;
        for (i, formals) in tables.ala().iter().enumerate() {
            let name = tables.mnt().get(i).map_or("?", |entry| entry.name.as_str());
            writeln!(f, "Macro {} ({name}):", i + 1)?;
            for (pos, (formal, placeholder)) in formals.iter().enumerate() {
                writeln!(f, "   {}\t{formal}\t{placeholder}", pos + 1)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Intermediate Code:")?;
        for line in self.intermediate.iter() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Which actual argument replaced each formal parameter, call by
/// call.
pub struct BindingsListing<'a>(pub &'a [CallBindings<'a>]);

impl Display for BindingsListing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for call in self.0 {
            writeln!(f, "Line {}: {}", call.line, call.name)?;
            for (formal, actual) in &call.bindings {
                writeln!(f, "   Before: {formal}")?;
                writeln!(f, "   After : {actual}")?;
            }
        }
        Ok(())
    }
}

/// Generated machine code, one word per line.
pub struct MachineCodeListing<'a>(pub &'a [MachineWord]);

impl Display for MachineCodeListing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for word in self.0 {
            writeln!(f, "{word}")?;
        }
        Ok(())
    }
}
