//! Pass 2 of the assembler: turn tagged intermediate code into
//! machine words, resolving symbol and literal references through
//! the tables built by pass 1.
use tracing::{event, Level};

use base::prelude::{
    Address, Directive, LiteralTable, MachineWord, OperandRef, SymbolTable, TaggedStatement,
};

use super::types::CodegenError;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Position {
    #[default]
    Unset,
    At(Address),
    /// A word was placed at [`Address::MAX`]; there is no room for
    /// another.
    Exhausted,
}

/// The location counter (LC).  It holds no value until a `START` or
/// `ORIGIN` directive sets it, and it never moves backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationCounter(Position);

impl LocationCounter {
    pub fn new() -> LocationCounter {
        LocationCounter(Position::Unset)
    }

    /// The address of the next word, if it has one.
    pub fn get(&self) -> Option<Address> {
        match self.0 {
            Position::At(address) => Some(address),
            Position::Unset | Position::Exhausted => None,
        }
    }

    fn set(&mut self, statement: usize, to: Address) -> Result<(), CodegenError> {
        let from = match self.0 {
            Position::Unset => None,
            Position::At(here) => Some(here).filter(|here| to < *here),
            Position::Exhausted => Some(Address::MAX),
        };
        match from {
            Some(from) => Err(CodegenError::LocationCounterRegression {
                statement,
                from,
                to,
            }),
            None => {
                self.0 = Position::At(to);
                Ok(())
            }
        }
    }

    /// Return the current value and move on to the next word.
    fn allocate(&mut self, statement: usize) -> Result<Address, CodegenError> {
        match self.0 {
            Position::Unset => Err(CodegenError::UninitializedLocationCounter { statement }),
            Position::Exhausted => Err(CodegenError::AddressOverflow { statement }),
            Position::At(here) => {
                self.0 = here.successor().map_or(Position::Exhausted, Position::At);
                Ok(here)
            }
        }
    }
}

/// Machine code for a sequence of tagged statements, generated one
/// word at a time.  Directives produce no words.
///
/// After the first error, the generator produces nothing more.
#[derive(Debug)]
pub struct Generator<'t, I> {
    statements: I,
    symtab: &'t SymbolTable,
    littab: &'t LiteralTable,
    lc: LocationCounter,
    /// Number of the most recently read statement, counting from 1.
    statement: usize,
    failed: bool,
}

/// Generate code for `statements`, using `symtab` and `littab` to
/// resolve operand references.
pub fn generate<'t, I>(
    statements: I,
    symtab: &'t SymbolTable,
    littab: &'t LiteralTable,
) -> Generator<'t, I::IntoIter>
where
    I: IntoIterator<Item = TaggedStatement>,
{
    Generator {
        statements: statements.into_iter(),
        symtab,
        littab,
        lc: LocationCounter::new(),
        statement: 0,
        failed: false,
    }
}

impl<I> Generator<'_, I> {
    /// The current value of the location counter.
    pub fn location_counter(&self) -> LocationCounter {
        self.lc
    }

    fn resolve(&self, operand: OperandRef) -> Result<u32, CodegenError> {
        let (found, table_len) = match operand {
            OperandRef::Constant(value) => return Ok(value),
            OperandRef::Symbol(n) => (self.symtab.address_of(n), self.symtab.len()),
            OperandRef::Literal(n) => (self.littab.address_of(n), self.littab.len()),
        };
        found
            .map(u32::from)
            .ok_or(CodegenError::UnresolvedOperandIndex {
                statement: self.statement,
                operand,
                table_len,
            })
    }

    fn directive(&mut self, d: Directive) -> Result<(), CodegenError> {
        match d.sets_location() {
            Some(address) => {
                event!(
                    Level::DEBUG,
                    "statement {}: location counter set to {address}",
                    self.statement
                );
                self.lc.set(self.statement, address)
            }
            None => Ok(()),
        }
    }

    fn word(&mut self, opcode: u8, register: u8, operand: u32) -> Result<MachineWord, CodegenError> {
        let address = self.lc.allocate(self.statement)?;
        Ok(MachineWord {
            address,
            opcode,
            register,
            operand,
        })
    }

    /// Process one statement, returning the word it generates, if
    /// any.
    fn step(&mut self, statement: TaggedStatement) -> Result<Option<MachineWord>, CodegenError> {
        match statement {
            TaggedStatement::Directive(d) => {
                self.directive(d)?;
                Ok(None)
            }
            TaggedStatement::Imperative {
                opcode,
                register,
                operand,
            } => {
                let operand_address = match operand {
                    Some(op) => self.resolve(op)?,
                    None => 0,
                };
                self.word(opcode, register, operand_address).map(Some)
            }
            TaggedStatement::Declarative { code: _, constant } => {
                self.word(0, 0, constant).map(Some)
            }
        }
    }
}

impl<I> Iterator for Generator<'_, I>
where
    I: Iterator<Item = TaggedStatement>,
{
    type Item = Result<MachineWord, CodegenError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let statement = self.statements.next()?;
            self.statement += 1;
            match self.step(statement) {
                Ok(Some(word)) => return Some(Ok(word)),
                Ok(None) => (),
                Err(e) => {
                    event!(Level::DEBUG, "code generation stopped: {e}");
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Generate the code for a whole program.
///
/// # Errors
///
/// Fails on the first statement which cannot be assembled.
pub fn generate_all(
    statements: &[TaggedStatement],
    symtab: &SymbolTable,
    littab: &LiteralTable,
) -> Result<Vec<MachineWord>, CodegenError> {
    generate(statements.iter().copied(), symtab, littab).collect()
}
