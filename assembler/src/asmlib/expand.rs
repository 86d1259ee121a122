//! Pass 2 of the macro processor: replace each macro call in the
//! intermediate code with the macro's body, substituting the actual
//! arguments for the positional placeholders.
use std::slice;

use tracing::{event, Level};

use base::prelude::{
    placeholder_position, ArgumentList, DefinitionLine, IntermediateCode, IntermediateLine, MacroTables,
};

use super::lexer::{fields, split_first_token, substitute_words};
use super::types::{LineNumber, MacroError};


/// A macro call whose body is being emitted.
#[derive(Debug)]
struct ActiveCall<'a> {
    line: LineNumber,
    name: &'a str,
    args: Vec<&'a str>,
    body: slice::Iter<'a, DefinitionLine>,
}

impl ActiveCall<'_> {
    fn substitute(&self, body_line: &str) -> Result<String, MacroError> {
        substitute_words(body_line, |word| match placeholder_position(word) {
            None => Ok(None),
            Some(pos) => match self.args.get(pos) {
                Some(actual) => Ok(Some((*actual).to_string())),
                None => Err(MacroError::ArgumentCountMismatch {
                    line: self.line,
                    name: self.name.to_string(),
                    needed: pos + 1,
                    supplied: self.args.len(),
                }),
            },
        })
    }
}

/// The expanded program, produced one line at a time.
///
/// Once an error has been returned the iterator is exhausted.
#[derive(Debug)]
pub struct Expansion<'a> {
    tables: &'a MacroTables,
    lines: &'a [IntermediateLine],
    next_line: usize,
    call: Option<ActiveCall<'a>>,
    failed: bool,
}

/// Expand the macro calls in `intermediate` using the definitions in
/// `tables`.
pub fn expand<'a>(tables: &'a MacroTables, intermediate: &'a IntermediateCode) -> Expansion<'a> {
    Expansion {
        tables,
        lines: intermediate.lines(),
        next_line: 0,
        call: None,
        failed: false,
    }
}

/// Expand the whole of `intermediate`.
///
/// # Errors
///
/// See [`Expansion`]; the first error stops the expansion.
pub fn expand_all(
    tables: &MacroTables,
    intermediate: &IntermediateCode,
) -> Result<Vec<String>, MacroError> {
    expand(tables, intermediate).collect()
}

impl<'a> Expansion<'a> {
    fn begin_call(
        &self,
        index: usize,
        line: LineNumber,
        name: &'a str,
        rest: &'a str,
    ) -> Result<ActiveCall<'a>, MacroError> {
        let tables: &'a MacroTables = self.tables;
        let def = match tables.definition(index) {
            Some(def) => def,
            None => {
                return Err(MacroError::UnknownMacroReference {
                    line,
                    name: name.to_string(),
                });
            }
        };
        let args: Vec<&'a str> = fields(rest).collect();
        let needed = def.formals.len();
        if args.len() < needed {
            return Err(MacroError::ArgumentCountMismatch {
                line,
                name: name.to_string(),
                needed,
                supplied: args.len(),
            });
        }
        if args.len() > needed {
            event!(
                Level::WARN,
                "line {line}: macro {name} takes {needed} argument(s) but {} were supplied; ignoring the extra ones",
                args.len()
            );
        }
        event!(
            Level::DEBUG,
            "line {line}: expanding {name} ({} body line(s))",
            def.body.len()
        );
        Ok(ActiveCall {
            line,
            name,
            args,
            body: def.body.iter(),
        })
    }

    fn fail(&mut self, e: MacroError) -> Option<Result<String, MacroError>> {
        self.failed = true;
        self.call = None;
        Some(Err(e))
    }
}

impl<'a> Iterator for Expansion<'a> {
    type Item = Result<String, MacroError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(call) = self.call.as_mut() {
                match call.body.next() {
                    Some(body_line) => {
                        let substituted = call.substitute(body_line.text());
                        return match substituted {
                            Ok(s) => Some(Ok(s)),
                            Err(e) => self.fail(e),
                        };
                    }
                    None => {
                        self.call = None;
                    }
                }
            }

            let lines: &'a [IntermediateLine] = self.lines;
            let entry: &'a IntermediateLine = lines.get(self.next_line)?;
            self.next_line += 1;
            let line_number: LineNumber = entry.source_line;
            let text: &'a str = entry.text.as_str();
            let (name, rest) = split_first_token(text);
            match self.tables.find(name) {
                None => return Some(Ok(text.to_string())),
                Some(index) => match self.begin_call(index, line_number, name, rest) {
                    // An empty body emits nothing, so go around again.
                    Ok(call) => self.call = Some(call),
                    Err(e) => return self.fail(e),
                },
            }
        }
    }
}

/// The actual argument bound to each formal parameter in one macro
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallBindings<'a> {
    /// The line of the source file holding the call.
    pub line: LineNumber,
    pub name: &'a str,
    /// `(formal, actual)` pairs in position order.  Formals with no
    /// actual argument are left out.
    pub bindings: Vec<(&'a str, &'a str)>,
}

/// Describe the argument bindings of every macro call in
/// `intermediate`.  Unlike [`expand`] this never fails; calls to
/// macros whose definitions are incomplete are skipped.
pub fn call_bindings<'a>(
    tables: &'a MacroTables,
    intermediate: &'a IntermediateCode,
) -> Vec<CallBindings<'a>> {
    let mut result = Vec::new();
    for entry in intermediate.lines() {
        let (name, rest) = split_first_token(&entry.text);
        let Some(def) = tables.find(name).and_then(|index| tables.definition(index)) else {
            continue;
        };
        let formals: &'a ArgumentList = def.formals;
        let bindings: Vec<(&str, &str)> = fields(rest)
            .enumerate()
            .map_while(|(pos, actual)| formals.formal(pos).map(|formal| (formal, actual)))
            .collect();
        result.push(CallBindings {
            line: entry.source_line,
            name: def.name,
            bindings,
        });
    }
    result
}
