//! Pass 1 of the macro processor: collect macro definitions into the
//! MNT, MDT and ALA, and pass everything else through as
//! intermediate code.
use std::collections::HashMap;
use std::convert::Infallible;

use tracing::{event, span, Level};

use base::prelude::{
    placeholder, placeholder_position, ArgumentList, IntermediateCode, MacroTables,
};

use super::lexer::{fields, pieces, split_first_token, substitute_words, Piece};
use super::options::{DuplicateMacroPolicy, MacroOptions};
use super::types::{LineNumber, MacroError};


/// Formal parameters are expected to start with this.
const FORMAL_SIGIL: char = '&';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pass1Output {
    pub tables: MacroTables,
    pub intermediate: IntermediateCode,
}

struct Builder<'a> {
    options: &'a MacroOptions,
    output: Pass1Output,
    /// Where each macro name was first defined.
    defined_at: HashMap<String, LineNumber>,
}

/// Replace each formal parameter in `line` by its placeholder.
fn replace_formals(line: &str, formals: &ArgumentList) -> String {
    let result: Result<String, Infallible> =
        substitute_words(line, |word| Ok(formals.position_of(word).map(placeholder)));
    match result {
        Ok(s) => s,
        Err(never) => match never {},
    }
}

/// Find a word in a body line which is not a formal parameter but
/// would be read as a placeholder by the expander.
fn placeholder_lookalike<'s>(line: &'s str, formals: &ArgumentList) -> Option<&'s str> {
    pieces(line).find_map(|(piece, word)| {
        let clash = piece == Piece::Word
            && placeholder_position(word).is_some()
            && formals.position_of(word).is_none();
        clash.then_some(word)
    })
}

impl<'a> Builder<'a> {
    fn new(options: &'a MacroOptions) -> Builder<'a> {
        Builder {
            options,
            output: Pass1Output::default(),
            defined_at: HashMap::new(),
        }
    }

    fn parse_header(
        &self,
        definition_line: LineNumber,
        header: Option<(LineNumber, &str)>,
    ) -> Result<(LineNumber, String, ArgumentList), MacroError> {
        let (line, text) = match header {
            Some(h) => h,
            None => {
                return Err(MacroError::MalformedDefinition {
                    line: definition_line,
                    msg: format!(
                        "{} is the last line, so the macro header is missing",
                        self.options.definition_keyword
                    ),
                });
            }
        };
        let (name, params) = split_first_token(text);
        if name.is_empty()
            || name == self.options.terminator_keyword
            || name == self.options.definition_keyword
        {
            return Err(MacroError::MalformedDefinition {
                line,
                msg: format!(
                    "expected a macro header after {} but found '{text}'",
                    self.options.definition_keyword
                ),
            });
        }
        let mut formals = ArgumentList::new();
        for param in fields(params) {
            if !param.starts_with(FORMAL_SIGIL) {
                event!(
                    Level::WARN,
                    "line {line}: formal parameter {param} of macro {name} does not begin with {FORMAL_SIGIL}"
                );
            }
            formals
                .push(param)
                .map_err(|e| MacroError::MalformedDefinition {
                    line,
                    msg: format!("in header of macro {name}: {e}"),
                })?;
        }
        Ok((line, name.to_string(), formals))
    }

    fn check_duplicate(&mut self, line: LineNumber, name: &str) -> Result<(), MacroError> {
        match self.defined_at.get(name) {
            Some(&first_line) => match self.options.duplicates {
                DuplicateMacroPolicy::Reject => Err(MacroError::DuplicateMacro {
                    line,
                    name: name.to_string(),
                    first_line,
                }),
                DuplicateMacroPolicy::FirstWins => {
                    event!(
                        Level::WARN,
                        "line {line}: macro {name} was already defined at line {first_line}; calls will use the earlier definition"
                    );
                    Ok(())
                }
            },
            None => {
                self.defined_at.insert(name.to_string(), line);
                Ok(())
            }
        }
    }

    /// Consume one macro definition, whose definition keyword is on
    /// `definition_line`.  `lines` is positioned at the header.
    fn define<'s, I>(&mut self, definition_line: LineNumber, lines: &mut I) -> Result<(), MacroError>
    where
        I: Iterator<Item = (LineNumber, &'s str)>,
    {
        let (header_line, name, formals) = self.parse_header(definition_line, lines.next())?;
        self.check_duplicate(header_line, &name)?;

        let mut body: Vec<String> = Vec::new();
        loop {
            match lines.next() {
                None => {
                    return Err(MacroError::MalformedDefinition {
                        line: header_line,
                        msg: format!(
                            "definition of macro {name} is not terminated by {}",
                            self.options.terminator_keyword
                        ),
                    });
                }
                Some((_, line)) if line == self.options.terminator_keyword => break,
                Some((body_line, line)) => {
                    if let Some(word) = placeholder_lookalike(line, &formals) {
                        return Err(MacroError::MalformedDefinition {
                            line: body_line,
                            msg: format!(
                                "body of macro {name} contains {word}, which is reserved for parameter placeholders"
                            ),
                        });
                    }
                    body.push(replace_formals(line, &formals));
                }
            }
        }

        let tables = &mut self.output.tables;
        let body_start = tables.mdt().len();
        let formal_count = formals.len();
        let body_len = body.len();
        tables.begin_definition(&name, formals);
        for line in body {
            tables.push_body_line(line);
        }
        tables.end_definition(&self.options.terminator_keyword);
        event!(
            Level::DEBUG,
            "defined macro {name} with {formal_count} formal parameter(s) and {body_len} body line(s) starting at MDT index {body_start}"
        );
        Ok(())
    }
}

/// Build the macro tables and intermediate code from `source`.
/// Lines are trimmed before they are examined.
///
/// # Errors
///
/// - A definition has no header, or a header which declares the same
///   formal parameter twice.
/// - A definition is not terminated before the end of the input.
/// - A macro is defined twice and `options.duplicates` is
///   [`DuplicateMacroPolicy::Reject`].
pub fn build_macro_tables<S: AsRef<str>>(
    source: &[S],
    options: &MacroOptions,
) -> Result<Pass1Output, MacroError> {
    let span = span!(Level::INFO, "macro pass 1");
    let _enter = span.enter();

    let mut builder = Builder::new(options);
    let mut lines = source
        .iter()
        .enumerate()
        .map(|(n, line)| (n + 1, line.as_ref().trim()));
    while let Some((line_number, line)) = lines.next() {
        if line == options.definition_keyword {
            builder.define(line_number, &mut lines)?;
        } else {
            builder.output.intermediate.push(line_number, line.to_string());
        }
    }
    let output = builder.output;
    event!(
        Level::INFO,
        "pass 1 found {} macro definition(s); {} line(s) of intermediate code",
        output.tables.macro_count(),
        output.intermediate.len()
    );
    Ok(output)
}
