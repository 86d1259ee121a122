//! Loading symbol and literal tables from text.
//!
//! Each non-blank line holds a name (or literal) and an address,
//! separated by white space:
//!
//! ```text
//! ; SYMTAB
//! ALPHA  202
//! BETA   207
//! ```
//!
//! The order of the lines is the order of the ordinals used by the
//! intermediate code.
use base::prelude::{Address, Literal, LiteralTable, Symbol, SymbolTable};

use super::icparse::COMMENT_CHAR;
use super::types::{LineNumber, SyntaxError};

fn parse_entries(body: &str) -> Result<Vec<(String, Address)>, SyntaxError> {
    let mut result = Vec::new();
    for (n, text) in body.lines().enumerate() {
        let line: LineNumber = n + 1;
        let text = text.trim();
        if text.is_empty() || text.starts_with(COMMENT_CHAR) {
            continue;
        }
        let mut words = text.split_whitespace();
        let (name, address) = match (words.next(), words.next(), words.next()) {
            (Some(name), Some(address), None) => (name, address),
            _ => {
                return Err(SyntaxError {
                    line,
                    msg: format!("expected a name and an address, found '{text}'"),
                });
            }
        };
        let address: u32 = address.parse().map_err(|e| SyntaxError {
            line,
            msg: format!("'{address}' is not a valid address: {e}"),
        })?;
        result.push((name.to_string(), Address::new(address)));
    }
    Ok(result)
}

/// Read a symbol table.
///
/// # Errors
///
/// Fails on a line which does not hold exactly a name and an address.
pub fn parse_symbol_table(body: &str) -> Result<SymbolTable, SyntaxError> {
    Ok(parse_entries(body)?
        .into_iter()
        .map(|(name, address)| Symbol { name, address })
        .collect())
}

/// Read a literal table.
///
/// # Errors
///
/// Fails on a line which does not hold exactly a literal and an
/// address.
pub fn parse_literal_table(body: &str) -> Result<LiteralTable, SyntaxError> {
    Ok(parse_entries(body)?
        .into_iter()
        .map(|(text, address)| Literal { text, address })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table() {
        let symtab = parse_symbol_table("; symbols\nALPHA 202\n\n  BETA\t207  \n")
            .expect("table is valid");
        assert_eq!(symtab.len(), 2);
        assert_eq!(symtab.address_of(1), Some(Address::new(202)));
        assert_eq!(symtab.get(2).map(|s| s.name.as_str()), Some("BETA"));
    }

    #[test]
    fn test_literal_table() {
        let littab = parse_literal_table("='5' 203\n='1' 204\n").expect("table is valid");
        assert_eq!(littab.get(1).map(|l| l.text.as_str()), Some("='5'"));
        assert_eq!(littab.address_of(2), Some(Address::new(204)));
    }

    #[test]
    fn test_bad_lines() {
        assert_eq!(
            parse_symbol_table("ALPHA 202\nBETA\n").map(|t| t.len()),
            Err(SyntaxError {
                line: 2,
                msg: "expected a name and an address, found 'BETA'".to_string(),
            })
        );
        assert!(parse_symbol_table("ALPHA 202 17\n").is_err());
        match parse_literal_table("='5' -3\n") {
            Err(SyntaxError { line: 1, msg }) => {
                assert!(msg.contains("not a valid address"), "unexpected message {msg}");
            }
            other => panic!("expected an error on line 1, got {other:?}"),
        }
    }
}
