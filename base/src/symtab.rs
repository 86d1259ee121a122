//! Symbol and literal tables, as produced by the first pass of the
//! assembler.
//!
//! Intermediate code refers to entries of these tables by ordinal
//! position (counting from 1) rather than by name: `(S,1)` is the
//! first symbol, `(L,2)` the second literal.  So lookup here is
//! positional too.
use super::address::Address;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    /// The literal as written, for example `='5'`.
    pub text: String,
    pub address: Address,
}

/// Something which occupies a known address.
pub trait Located {
    fn address(&self) -> Address;
}

impl Located for Symbol {
    fn address(&self) -> Address {
        self.address
    }
}

impl Located for Literal {
    fn address(&self) -> Address {
        self.address
    }
}

/// A table addressed by ordinal position, starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdinalTable<T> {
    entries: Vec<T>,
}

pub type SymbolTable = OrdinalTable<Symbol>;
pub type LiteralTable = OrdinalTable<Literal>;

impl<T> Default for OrdinalTable<T> {
    fn default() -> Self {
        OrdinalTable {
            entries: Vec::new(),
        }
    }
}

impl<T> OrdinalTable<T> {
    pub fn new() -> OrdinalTable<T> {
        OrdinalTable::default()
    }

    /// Append an entry, returning its ordinal.
    pub fn push(&mut self, entry: T) -> u32 {
        self.entries.push(entry);
        u32::try_from(self.entries.len()).unwrap_or(u32::MAX)
    }

    /// Fetch the entry at `ordinal`, counting from 1.  Ordinal 0 is
    /// never valid.
    pub fn get(&self, ordinal: u32) -> Option<&T> {
        let index = usize::try_from(ordinal).ok()?.checked_sub(1)?;
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(ordinal, entry)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.entries.iter().enumerate().map(|(i, e)| (i + 1, e))
    }
}

impl<T: Located> OrdinalTable<T> {
    pub fn address_of(&self, ordinal: u32) -> Option<Address> {
        self.get(ordinal).map(Located::address)
    }
}

impl<T> FromIterator<T> for OrdinalTable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        OrdinalTable {
            entries: iter.into_iter().collect(),
        }
    }
}
