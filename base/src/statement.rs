//! Tagged intermediate code, as consumed by the second pass of the
//! assembler, and the machine words it produces.
use std::fmt::{self, Display, Formatter};

use super::address::Address;

/// Assembler directives (statement class `AD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `START` (AD,1): set the location counter.
    Start(Address),
    /// `END` (AD,2).
    End,
    /// `ORIGIN` (AD,3): move the location counter.
    Origin(Address),
    /// `EQU` (AD,4).
    Equate,
    /// `LTORG` (AD,5).
    Ltorg,
}

impl Directive {
    pub fn code(&self) -> u8 {
        match self {
            Directive::Start(_) => 1,
            Directive::End => 2,
            Directive::Origin(_) => 3,
            Directive::Equate => 4,
            Directive::Ltorg => 5,
        }
    }

    /// The new value of the location counter, for directives which
    /// set it.
    pub fn sets_location(&self) -> Option<Address> {
        match self {
            Directive::Start(a) | Directive::Origin(a) => Some(*a),
            Directive::End | Directive::Equate | Directive::Ltorg => None,
        }
    }
}

/// The operand of an imperative statement.  Symbol and literal
/// references are ordinals (counting from 1) into the symbol and
/// literal tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandRef {
    Symbol(u32),
    Literal(u32),
    Constant(u32),
}

impl Display for OperandRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OperandRef::Symbol(n) => write!(f, "(S,{n})"),
            OperandRef::Literal(n) => write!(f, "(L,{n})"),
            OperandRef::Constant(n) => write!(f, "(C,{n})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggedStatement {
    /// Statement class `AD`; produces no machine word.
    Directive(Directive),
    /// Statement class `IS`.  A missing register field is register 0
    /// and a missing operand assembles as operand address 0.
    Imperative {
        opcode: u8,
        register: u8,
        operand: Option<OperandRef>,
    },
    /// Statement class `DL` (`DC` is code 1, `DS` code 2).  Occupies
    /// exactly one word.
    Declarative { code: u8, constant: u32 },
}

impl Display for TaggedStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TaggedStatement::Directive(d) => {
                write!(f, "(AD,{:02})", d.code())?;
                match d.sets_location() {
                    Some(a) => write!(f, " (C,{a})"),
                    None => Ok(()),
                }
            }
            TaggedStatement::Imperative {
                opcode,
                register,
                operand,
            } => {
                write!(f, "(IS,{opcode:02}) ({register})")?;
                match operand {
                    Some(op) => write!(f, " {op}"),
                    None => Ok(()),
                }
            }
            TaggedStatement::Declarative { code, constant } => {
                write!(f, "(DL,{code:02}) (C,{constant})")
            }
        }
    }
}

/// One word of generated machine code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineWord {
    pub address: Address,
    pub opcode: u8,
    pub register: u8,
    pub operand: u32,
}

impl Display for MachineWord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}) {:02} {} {:03}",
            self.address, self.opcode, self.register, self.operand
        )
    }
}
