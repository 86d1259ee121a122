/// What to do when a macro is defined a second time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateMacroPolicy {
    /// Record both definitions; calls use the first one.  A warning
    /// is logged.
    #[default]
    FirstWins,
    /// Fail with [`MacroError::DuplicateMacro`](crate::MacroError::DuplicateMacro).
    Reject,
}

/// Settings for the macro processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroOptions {
    /// The line which starts a macro definition.  Matched exactly,
    /// including case.
    pub definition_keyword: String,
    /// The line which ends a macro definition.
    pub terminator_keyword: String,
    pub duplicates: DuplicateMacroPolicy,
}

impl Default for MacroOptions {
    fn default() -> MacroOptions {
        MacroOptions {
            definition_keyword: "MACRO".to_string(),
            terminator_keyword: "MEND".to_string(),
            duplicates: DuplicateMacroPolicy::default(),
        }
    }
}

/// Which reports to write along with the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Print the MNT, MDT, ALA and intermediate code.
    pub tables: bool,
    /// Print the formal-to-actual argument bindings of each macro
    /// call.
    pub bindings: bool,
}
