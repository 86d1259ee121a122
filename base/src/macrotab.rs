//! Tables built by the first pass of the macro processor: the Macro
//! Name Table (MNT), the Macro Definition Table (MDT) and the
//! Argument List Array (ALA).
//!
//! All three tables are append-only.  The MNT and the ALA are
//! index-aligned: the `n`th macro's name is `mnt[n]` and its formal
//! parameters are `ala[n]`.
use std::fmt::{self, Display, Formatter};

/// Introduces a positional placeholder (`#0`, `#1`, ...) in a macro
/// body.  Every word of this form in the MDT is a placeholder, so the
/// first pass rejects source bodies which already contain one.
pub const PLACEHOLDER_SIGIL: char = '#';

/// Returns the text of the placeholder for the formal parameter in
/// position `pos`.
pub fn placeholder(pos: usize) -> String {
    format!("{PLACEHOLDER_SIGIL}{pos}")
}

/// If `word` is a positional placeholder, return its position.
pub fn placeholder_position(word: &str) -> Option<usize> {
    let digits = word.strip_prefix(PLACEHOLDER_SIGIL)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroNameEntry {
    pub name: String,
    /// Index (counting from 0) of the first line of the macro's body
    /// in the MDT.
    pub body_start: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionLine {
    /// A line of the macro body, with formal parameters already
    /// replaced by placeholders.
    Body(String),
    /// The terminator which closes a definition (normally `MEND`).
    End(String),
}

impl DefinitionLine {
    pub fn text(&self) -> &str {
        match self {
            DefinitionLine::Body(s) | DefinitionLine::End(s) => s.as_str(),
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, DefinitionLine::End(_))
    }
}

impl Display for DefinitionLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// The MDT holds the bodies of all macros, one after the other.  Each
/// body ends with a [`DefinitionLine::End`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroDefinitionTable {
    lines: Vec<DefinitionLine>,
}

impl MacroDefinitionTable {
    pub fn new() -> MacroDefinitionTable {
        MacroDefinitionTable::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DefinitionLine> {
        self.lines.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DefinitionLine> {
        self.lines.iter()
    }

    pub fn push(&mut self, line: DefinitionLine) {
        self.lines.push(line);
    }

    /// The body lines of the macro whose body begins at `start`, not
    /// including the terminator.  Returns `None` if `start` is out of
    /// range or there is no terminator after it.
    pub fn body(&self, start: usize) -> Option<&[DefinitionLine]> {
        let tail = self.lines.get(start..)?;
        let end = tail.iter().position(DefinitionLine::is_end)?;
        Some(&tail[..end])
    }
}

impl FromIterator<DefinitionLine> for MacroDefinitionTable {
    fn from_iter<I: IntoIterator<Item = DefinitionLine>>(iter: I) -> Self {
        MacroDefinitionTable {
            lines: iter.into_iter().collect(),
        }
    }
}

/// The formal parameters of one macro, in the order in which they
/// appear in the macro header.  The parameter at position `i` is
/// represented in the MDT by the placeholder `#i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentList {
    formals: Vec<String>,
}

/// Returned by [`ArgumentList::push`] when a formal parameter is
/// declared twice in the same header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateFormal(pub String);

impl Display for DuplicateFormal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "formal parameter {} is declared more than once", self.0)
    }
}

impl std::error::Error for DuplicateFormal {}

impl ArgumentList {
    pub fn new() -> ArgumentList {
        ArgumentList::default()
    }

    /// Append a formal parameter, returning its position.
    ///
    /// # Errors
    ///
    /// Fails if `formal` is already in the list; otherwise the
    /// positions would not be a function of the parameter name.
    pub fn push(&mut self, formal: &str) -> Result<usize, DuplicateFormal> {
        if self.position_of(formal).is_some() {
            return Err(DuplicateFormal(formal.to_string()));
        }
        self.formals.push(formal.to_string());
        Ok(self.formals.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.formals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formals.is_empty()
    }

    pub fn position_of(&self, formal: &str) -> Option<usize> {
        self.formals.iter().position(|f| f == formal)
    }

    pub fn formal(&self, pos: usize) -> Option<&str> {
        self.formals.get(pos).map(String::as_str)
    }

    /// Iterate over `(formal, placeholder)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.formals
            .iter()
            .enumerate()
            .map(|(pos, formal)| (formal.as_str(), placeholder(pos)))
    }
}

/// One line of intermediate code, with the number (counting from 1)
/// of the source line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntermediateLine {
    pub source_line: usize,
    pub text: String,
}

/// The lines of source which lie outside any macro definition.  Macro
/// calls are still present in their original form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntermediateCode {
    lines: Vec<IntermediateLine>,
}

impl IntermediateCode {
    pub fn new() -> IntermediateCode {
        IntermediateCode::default()
    }

    pub fn push(&mut self, source_line: usize, text: String) {
        self.lines.push(IntermediateLine { source_line, text });
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The text of each line, in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(|line| line.text.as_str())
    }

    pub fn lines(&self) -> &[IntermediateLine] {
        &self.lines
    }
}

/// Lines collected this way are numbered consecutively from 1, as if
/// the source contained no macro definitions.
impl<S: Into<String>> FromIterator<S> for IntermediateCode {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        IntermediateCode {
            lines: iter
                .into_iter()
                .enumerate()
                .map(|(n, text)| IntermediateLine {
                    source_line: n + 1,
                    text: text.into(),
                })
                .collect(),
        }
    }
}

/// Everything the expander needs to know about one macro.
#[derive(Debug, Clone, Copy)]
pub struct MacroDefinition<'a> {
    pub name: &'a str,
    pub formals: &'a ArgumentList,
    pub body: &'a [DefinitionLine],
}

/// The MNT, MDT and ALA together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroTables {
    mnt: Vec<MacroNameEntry>,
    mdt: MacroDefinitionTable,
    ala: Vec<ArgumentList>,
}

impl MacroTables {
    pub fn new() -> MacroTables {
        MacroTables::default()
    }

    /// Assemble a set of tables from parts built elsewhere.  Nothing
    /// is checked here; inconsistencies are detected when a macro is
    /// looked up.
    pub fn from_parts(
        mnt: Vec<MacroNameEntry>,
        mdt: MacroDefinitionTable,
        ala: Vec<ArgumentList>,
    ) -> MacroTables {
        MacroTables { mnt, mdt, ala }
    }

    pub fn mnt(&self) -> &[MacroNameEntry] {
        &self.mnt
    }

    pub fn mdt(&self) -> &MacroDefinitionTable {
        &self.mdt
    }

    pub fn ala(&self) -> &[ArgumentList] {
        &self.ala
    }

    pub fn macro_count(&self) -> usize {
        self.mnt.len()
    }

    /// Start a new macro definition whose body will begin at the
    /// current end of the MDT.  Returns the index of the new macro.
    pub fn begin_definition(&mut self, name: &str, formals: ArgumentList) -> usize {
        self.mnt.push(MacroNameEntry {
            name: name.to_string(),
            body_start: self.mdt.len(),
        });
        self.ala.push(formals);
        self.mnt.len() - 1
    }

    pub fn push_body_line(&mut self, line: String) {
        self.mdt.push(DefinitionLine::Body(line));
    }

    pub fn end_definition(&mut self, terminator: &str) {
        self.mdt.push(DefinitionLine::End(terminator.to_string()));
    }

    /// Find a macro by name.  When more than one macro has this name,
    /// the one defined first is returned.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.mnt.iter().position(|entry| entry.name == name)
    }

    /// Gather the parts of macro `index` from the three tables.
    /// Returns `None` if the tables are not consistent with each
    /// other (for example the MNT entry has no ALA entry, or the
    /// body has no terminator).
    pub fn definition(&self, index: usize) -> Option<MacroDefinition<'_>> {
        let entry = self.mnt.get(index)?;
        let formals = self.ala.get(index)?;
        let body = self.mdt.body(entry.body_start)?;
        Some(MacroDefinition {
            name: entry.name.as_str(),
            formals,
            body,
        })
    }
}
