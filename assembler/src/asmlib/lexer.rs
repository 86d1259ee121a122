//! Splitting source lines into words.
//!
//! Parameter substitution (formal parameter to placeholder in the
//! first pass, placeholder to actual argument in the second) must
//! only ever replace complete words.  Replacing `&X` inside `&XTRA`
//! would corrupt the program.  So instead of searching the line for
//! substrings we split it into alternating words and separators and
//! substitute whole words only.
use logos::Logos;

pub(crate) mod rx;

#[derive(Debug, PartialEq, Eq, Logos, Clone, Copy)]
pub(crate) enum Piece {
    /// A symbol, mnemonic, number, literal, formal parameter or
    /// placeholder.
    #[regex(r"[^\s,+*/()-]+")]
    Word,

    /// Anything which separates words: white space, commas,
    /// arithmetic operators and parentheses.
    #[regex(r"[\s,+*/()-]+")]
    Separator,
}

/// Split `line` into its pieces, in order.  Concatenating the slices
/// gives back `line`.
pub(crate) fn pieces(line: &str) -> impl Iterator<Item = (Piece, &str)> + '_ {
    // The two token classes between them match every character, so
    // the lexer cannot actually fail.  If it somehow did, keeping the
    // text as a word means we never substitute inside it.
    Piece::lexer(line)
        .spanned()
        .map(move |(result, span)| (result.unwrap_or(Piece::Word), &line[span]))
}

/// Rebuild `line`, replacing each word for which `replacement`
/// returns `Some`.  Separators are copied unchanged.
///
/// # Errors
///
/// Returns the first error returned by `replacement`.
pub(crate) fn substitute_words<F, E>(line: &str, mut replacement: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<Option<String>, E>,
{
    let mut out = String::with_capacity(line.len());
    for (piece, text) in pieces(line) {
        match piece {
            Piece::Word => match replacement(text)? {
                Some(s) => out.push_str(&s),
                None => out.push_str(text),
            },
            Piece::Separator => out.push_str(text),
        }
    }
    Ok(out)
}

/// Split a list of macro parameters or arguments.  Items are
/// separated by white space and/or commas.
pub(crate) fn fields(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.split(|ch: char| ch.is_whitespace() || ch == ',')
        .filter(|s| !s.is_empty())
}

/// Split a line into its first white-space delimited token and the
/// (trimmed) remainder.
pub(crate) fn split_first_token(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim_start()),
        None => (line, ""),
    }
}
