use test_strategy::proptest;

use base::prelude::{Literal, Symbol};

use super::*;

fn symtab() -> SymbolTable {
    [Symbol {
        name: "ALPHA".to_string(),
        address: Address::new(202),
    }]
    .into_iter()
    .collect()
}

fn littab() -> LiteralTable {
    [Literal {
        text: "='5'".to_string(),
        address: Address::new(203),
    }]
    .into_iter()
    .collect()
}

fn start(n: u32) -> TaggedStatement {
    TaggedStatement::Directive(Directive::Start(Address::new(n)))
}

fn is(opcode: u8, register: u8, operand: Option<OperandRef>) -> TaggedStatement {
    TaggedStatement::Imperative {
        opcode,
        register,
        operand,
    }
}

fn word(address: u32, opcode: u8, register: u8, operand: u32) -> MachineWord {
    MachineWord {
        address: Address::new(address),
        opcode,
        register,
        operand,
    }
}

#[test]
fn test_demo_program() {
    let program = [
        start(200),
        is(4, 1, Some(OperandRef::Literal(1))),
        is(1, 2, Some(OperandRef::Symbol(1))),
        TaggedStatement::Declarative {
            code: 1,
            constant: 2,
        },
        TaggedStatement::Directive(Directive::End),
    ];
    assert_eq!(
        generate_all(&program, &symtab(), &littab()),
        Ok(vec![
            word(200, 4, 1, 203),
            word(201, 1, 2, 202),
            word(202, 0, 0, 2),
        ])
    );
}

#[test]
fn test_symbol_reference_and_counter_advance() {
    let symbols = symtab();
    let literals = littab();
    let program = [start(200), is(1, 1, Some(OperandRef::Symbol(1)))];
    let mut generator = generate(program, &symbols, &literals);
    assert_eq!(generator.next(), Some(Ok(word(200, 1, 1, 202))));
    assert_eq!(
        generator.location_counter().get(),
        Some(Address::new(201))
    );
    assert_eq!(generator.next(), None);
}

#[test]
fn test_constant_operand_needs_no_table() {
    let empty_symbols = SymbolTable::new();
    let empty_literals = LiteralTable::new();
    let program = [start(10), is(7, 0, Some(OperandRef::Constant(99))), is(0, 0, None)];
    assert_eq!(
        generate_all(&program, &empty_symbols, &empty_literals),
        Ok(vec![word(10, 7, 0, 99), word(11, 0, 0, 0)])
    );
}

#[test]
fn test_uninitialized_location_counter() {
    let program = [is(1, 1, Some(OperandRef::Symbol(1))), start(200)];
    assert_eq!(
        generate_all(&program, &symtab(), &littab()),
        Err(CodegenError::UninitializedLocationCounter { statement: 1 })
    );
    let program = [TaggedStatement::Declarative {
        code: 1,
        constant: 1,
    }];
    assert_eq!(
        generate_all(&program, &symtab(), &littab()),
        Err(CodegenError::UninitializedLocationCounter { statement: 1 })
    );
}

#[test]
fn test_out_of_range_symbol() {
    let program = [start(200), is(1, 1, Some(OperandRef::Symbol(2)))];
    assert_eq!(
        generate_all(&program, &symtab(), &littab()),
        Err(CodegenError::UnresolvedOperandIndex {
            statement: 2,
            operand: OperandRef::Symbol(2),
            table_len: 1,
        })
    );
}

#[test]
fn test_ordinal_zero_is_out_of_range() {
    let program = [start(200), is(4, 1, Some(OperandRef::Literal(0)))];
    assert!(matches!(
        generate_all(&program, &symtab(), &littab()),
        Err(CodegenError::UnresolvedOperandIndex { statement: 2, .. })
    ));
}

#[test]
fn test_no_output_after_error() {
    let symbols = symtab();
    let literals = littab();
    let program = [
        start(200),
        is(1, 1, Some(OperandRef::Symbol(1))),
        is(1, 1, Some(OperandRef::Symbol(5))),
        is(1, 1, Some(OperandRef::Symbol(1))),
    ];
    let items: Vec<_> = generate(program, &symbols, &literals).collect();
    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(items[1].is_err());
}

#[test]
fn test_origin_moves_forward_only() {
    let forward = [
        start(100),
        is(1, 0, None),
        TaggedStatement::Directive(Directive::Origin(Address::new(150))),
        is(2, 0, None),
    ];
    assert_eq!(
        generate_all(&forward, &symtab(), &littab()),
        Ok(vec![word(100, 1, 0, 0), word(150, 2, 0, 0)])
    );

    let backward = [
        start(100),
        is(1, 0, None),
        TaggedStatement::Directive(Directive::Origin(Address::new(50))),
    ];
    assert_eq!(
        generate_all(&backward, &symtab(), &littab()),
        Err(CodegenError::LocationCounterRegression {
            statement: 3,
            from: Address::new(101),
            to: Address::new(50),
        })
    );
}

#[test]
fn test_last_address_holds_a_word() {
    let program = [start(u32::MAX - 1), is(1, 0, None), is(2, 0, None)];
    assert_eq!(
        generate_all(&program, &symtab(), &littab()),
        Ok(vec![word(u32::MAX - 1, 1, 0, 0), word(u32::MAX, 2, 0, 0)])
    );
}

#[test]
fn test_address_overflow() {
    let symbols = symtab();
    let literals = littab();
    let program = [start(u32::MAX), is(1, 0, None), is(2, 0, None)];
    let mut generator = generate(program, &symbols, &literals);
    assert_eq!(generator.next(), Some(Ok(word(u32::MAX, 1, 0, 0))));
    assert_eq!(generator.location_counter().get(), None);
    assert_eq!(
        generator.next(),
        Some(Err(CodegenError::AddressOverflow { statement: 3 }))
    );
    assert_eq!(generator.next(), None);
}

#[test]
fn test_origin_after_last_address_is_a_regression() {
    let program = [
        start(u32::MAX),
        is(1, 0, None),
        TaggedStatement::Directive(Directive::Origin(Address::new(5))),
    ];
    assert_eq!(
        generate_all(&program, &symtab(), &littab()),
        Err(CodegenError::LocationCounterRegression {
            statement: 3,
            from: Address::MAX,
            to: Address::new(5),
        })
    );
}

#[test]
fn test_resolution_is_repeatable() {
    let program = [
        start(0),
        is(1, 1, Some(OperandRef::Symbol(1))),
        is(2, 1, Some(OperandRef::Symbol(1))),
    ];
    let words = generate_all(&program, &symtab(), &littab()).expect("program is valid");
    assert_eq!(words[0].operand, words[1].operand);
}

#[proptest]
fn addresses_increase_by_one(
    #[strategy(0u32..1_000_000)] origin: u32,
    #[strategy(proptest::collection::vec(proptest::bool::ANY, 0..50))] kinds: Vec<bool>,
) {
    // Each element of `kinds` selects an imperative (true) or
    // declarative (false) statement, with EQU directives in between.
    let mut program = vec![start(origin)];
    for (i, imperative) in kinds.iter().enumerate() {
        program.push(if *imperative {
            is(1, 1, Some(OperandRef::Symbol(1)))
        } else {
            TaggedStatement::Declarative {
                code: 1,
                constant: u32::try_from(i).unwrap_or(0),
            }
        });
        program.push(TaggedStatement::Directive(Directive::Equate));
    }
    let words = generate_all(&program, &symtab(), &littab()).expect("program is valid");
    assert_eq!(words.len(), kinds.len());
    for (i, w) in words.iter().enumerate() {
        let expected = u64::from(origin) + u64::try_from(i).unwrap_or(u64::MAX);
        assert_eq!(u64::from(w.address.value()), expected);
    }
}
