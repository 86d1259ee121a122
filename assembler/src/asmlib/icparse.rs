//! Reading tagged intermediate code.
//!
//! Each line holds one statement, written as a sequence of
//! parenthesised fields:
//!
//! ```text
//! (AD,01) (C,200)      START 200
//! (IS,04) (1) (L,1)    MOVER AREG,='5'
//! (IS,01) (2) (S,1)    ADD BREG,ALPHA
//! (IS,00)              STOP
//! (DL,01) (C,2)        DC 2
//! (AD,02)              END
//! ```
//!
//! The first field gives the statement class and code.  An
//! imperative statement may be followed by a register number (a bare
//! number) and then an operand which is a symbol (`S`), literal
//! (`L`) or constant (`C`).
use tracing::{event, Level};

use base::prelude::{Address, Directive, OperandRef, TaggedStatement};

use super::lexer::rx::LazyRegex;
use super::types::{LineNumber, SyntaxError};


/// Lines starting with this are ignored.
pub(crate) const COMMENT_CHAR: char = ';';

static FIELD_RX: LazyRegex = LazyRegex::new(r"\(\s*(?:([A-Za-z]+)\s*,\s*)?([0-9]+)\s*\)");

/// One parenthesised field, such as `(S,1)` or `(2)`.
#[derive(Debug, PartialEq, Eq)]
struct Field {
    tag: Option<String>,
    value: u32,
}

fn split_fields(text: &str) -> Result<Vec<Field>, String> {
    let mut result = Vec::new();
    let mut pos = 0;
    for caps in FIELD_RX.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let gap = &text[pos..whole.start()];
        if !gap.trim().is_empty() {
            return Err(format!("unexpected text '{}'", gap.trim()));
        }
        pos = whole.end();
        let digits = caps.get(2).map_or("", |m| m.as_str());
        let value: u32 = digits
            .parse()
            .map_err(|e| format!("number {digits} in field {} is not valid: {e}", whole.as_str()))?;
        result.push(Field {
            tag: caps.get(1).map(|m| m.as_str().to_ascii_uppercase()),
            value,
        });
    }
    let tail = &text[pos..];
    if !tail.trim().is_empty() {
        return Err(format!("unexpected text '{}'", tail.trim()));
    }
    Ok(result)
}

fn small(value: u32, what: &str) -> Result<u8, String> {
    u8::try_from(value).map_err(|_| format!("{what} {value} is too large"))
}

fn operand_of(field: &Field) -> Result<OperandRef, String> {
    match field.tag.as_deref() {
        Some("S") => Ok(OperandRef::Symbol(field.value)),
        Some("L") => Ok(OperandRef::Literal(field.value)),
        Some("C") => Ok(OperandRef::Constant(field.value)),
        Some(other) => Err(format!(
            "operand field must be (S,n), (L,n) or (C,n), not ({other},{})",
            field.value
        )),
        None => Err(format!("operand ({}) is missing its S, L or C tag", field.value)),
    }
}

fn constant_of(fields: &[Field], what: &str) -> Result<u32, String> {
    match fields {
        [Field { tag: Some(t), value }] if t == "C" => Ok(*value),
        [] => Err(format!("{what} needs a (C,n) operand")),
        _ => Err(format!("{what} takes exactly one (C,n) operand")),
    }
}

fn directive(code: u32, rest: &[Field]) -> Result<Directive, String> {
    match code {
        1 => Ok(Directive::Start(Address::new(constant_of(rest, "START")?))),
        2 if rest.is_empty() => Ok(Directive::End),
        2 => Err("END takes no operands".to_string()),
        3 => Ok(Directive::Origin(Address::new(constant_of(rest, "ORIGIN")?))),
        // EQU and LTORG were fully dealt with in pass 1, so their
        // operands don't matter here.
        4 => Ok(Directive::Equate),
        5 => Ok(Directive::Ltorg),
        _ => Err(format!("unknown assembler directive (AD,{code})")),
    }
}

fn imperative(code: u32, rest: &[Field]) -> Result<TaggedStatement, String> {
    let opcode = small(code, "opcode")?;
    let (register, rest) = match rest.split_first() {
        Some((Field { tag: None, value }, tail)) => (small(*value, "register number")?, tail),
        _ => (0, rest),
    };
    let operand = match rest {
        [] => None,
        [field] => Some(operand_of(field)?),
        _ => {
            return Err("imperative statement has too many fields".to_string());
        }
    };
    Ok(TaggedStatement::Imperative {
        opcode,
        register,
        operand,
    })
}

fn declarative(code: u32, rest: &[Field]) -> Result<TaggedStatement, String> {
    let what = match code {
        1 => "DC",
        2 => "DS",
        _ => {
            return Err(format!("unknown declarative statement (DL,{code})"));
        }
    };
    Ok(TaggedStatement::Declarative {
        code: small(code, "declarative code")?,
        constant: constant_of(rest, what)?,
    })
}

/// Parse one line of tagged intermediate code.  `line` is only used
/// in error reports.
///
/// # Errors
///
/// Fails when the text is not a well-formed statement.
pub fn parse_tagged_line(line: LineNumber, text: &str) -> Result<TaggedStatement, SyntaxError> {
    let fail = |msg: String| SyntaxError { line, msg };
    let fields = split_fields(text).map_err(fail)?;
    let Some((first, rest)) = fields.split_first() else {
        return Err(fail("statement is empty".to_string()));
    };
    match first.tag.as_deref() {
        Some("AD") => directive(first.value, rest)
            .map(TaggedStatement::Directive)
            .map_err(fail),
        Some("IS") => imperative(first.value, rest).map_err(fail),
        Some("DL") => declarative(first.value, rest).map_err(fail),
        _ => Err(fail(
            "statement must begin with (AD,n), (IS,n) or (DL,n)".to_string(),
        )),
    }
}

/// Parse a whole program of tagged intermediate code.  Blank lines
/// and comment lines are skipped.
///
/// # Errors
///
/// Fails at the first line which cannot be parsed.
pub fn parse_tagged_program(body: &str) -> Result<Vec<TaggedStatement>, SyntaxError> {
    let mut result = Vec::new();
    for (n, text) in body.lines().enumerate() {
        let text = text.trim();
        if text.is_empty() || text.starts_with(COMMENT_CHAR) {
            continue;
        }
        result.push(parse_tagged_line(n + 1, text)?);
    }
    event!(
        Level::DEBUG,
        "read {} tagged statement(s) of intermediate code",
        result.len()
    );
    Ok(result)
}
