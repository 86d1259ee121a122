use std::fmt::{self, Display, Formatter};

#[cfg(test)]
use test_strategy::Arbitrary;

/// A memory address as seen by the assembler.  The location counter
/// holds one of these, as do the symbol and literal tables.
#[cfg_attr(test, derive(Arbitrary))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u32);

impl Address {
    pub const ZERO: Address = Address(0);
    pub const MAX: Address = Address(u32::MAX);

    pub const fn new(n: u32) -> Address {
        Address(n)
    }

    /// The address of the next memory word, or `None` if this is
    /// the last address.
    #[must_use]
    pub fn successor(self) -> Option<Address> {
        self.0.checked_add(1).map(Address)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for Address {
    fn from(n: u32) -> Address {
        Address(n)
    }
}

impl From<Address> for u32 {
    fn from(a: Address) -> u32 {
        a.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // Honour width and alignment so that listings can line up.
        Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::Address;
    use test_strategy::proptest;

    #[test]
    fn test_successor() {
        assert_eq!(Address::new(200).successor(), Some(Address::new(201)));
        assert_eq!(Address::MAX.successor(), None);
    }

    #[test]
    fn test_display_honours_width() {
        assert_eq!(format!("{:>5}", Address::new(42)), "   42");
    }

    #[proptest]
    fn successor_is_one_more(a: Address) {
        match a.successor() {
            Some(next) => {
                assert!(next > a);
                assert_eq!(next.value() - a.value(), 1);
            }
            None => assert_eq!(a, Address::MAX),
        }
    }
}
