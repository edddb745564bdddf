use sml::{
    error::{ExecutionError, ParseErrorKind},
    instruction::{OpCode, Register},
    label_table::LabelTable,
    machine::{Machine, TestIo},
    overflow::Bound,
    program::Program,
    translator::{InstructionTable, Translator},
};

fn run(source: &str) -> Result<Machine<TestIo>, ExecutionError> {
    let table = InstructionTable::new();
    let translator = Translator::new(&table);

    let mut machine = Machine::new(TestIo::new());
    machine.load(&translator, source)
        .expect("could not translate the program");

    println!("{}", machine.program);
    println!("{}", machine.labels);

    machine.execute()?;

    println!("{}", machine.registers);

    Ok(machine)
}

#[test]
fn test_arithmetic_program() {
    let machine = run(include_str!("arithmetic.sml")).unwrap();

    assert_eq!(machine.registers.get(Register::EAX), 3);
    assert_eq!(machine.registers.get(Register::EBX), 3);
    assert_eq!(machine.registers.get(Register::ECX), 1);
    assert!(machine.io.values().is_empty());
}

#[test]
fn test_factorial_program() {
    let machine = run(include_str!("factorial.sml")).unwrap();

    assert_eq!(machine.io.into_values(), vec![720]);
}

#[test]
fn test_factorial_overflow() {
    let source = include_str!("factorial.sml").replace("mov EAX 6", "mov EAX 13");

    match run(&source) {
        Err(ExecutionError::ArithmeticOverflow(err)) => {
            assert_eq!(err.opcode, OpCode::Multiply);
            assert_eq!(err.result, Register::EBX);
            assert_eq!(err.source, Register::EAX);
            assert_eq!(err.value1, 1_037_836_800);
            assert_eq!(err.value2, 3);
            assert_eq!(err.bound, Bound::Maximum);
        }
        Err(other) => panic!("expected an overflow, got {}", other),
        Ok(_) => panic!("expected an overflow"),
    }
}

#[test]
fn test_countdown_program() {
    let machine = run(include_str!("countdown.sml")).unwrap();

    assert_eq!(machine.io.values(), &[3, 2, 1]);
    assert_eq!(machine.labels.get_address("loop"), Ok(2));
}

#[test]
fn test_sum_program() {
    let machine = run(include_str!("sum.sml")).unwrap();

    assert_eq!(machine.io.values(), &[5050]);
}

#[test]
fn test_repeated_execution() {
    let table = InstructionTable::new();
    let translator = Translator::new(&table);

    let mut machine = Machine::new(TestIo::new());
    machine.load(&translator, include_str!("countdown.sml")).unwrap();

    let first = machine.execute().unwrap();
    let registers = machine.registers.clone();
    let second = machine.execute().unwrap();

    assert_eq!(first, second);
    assert_eq!(registers, machine.registers);
    assert_eq!(machine.io.values(), &[3, 2, 1, 3, 2, 1]);
}

#[test]
fn test_identical_sources_translate_identically() {
    let table = InstructionTable::new();
    let translator = Translator::new(&table);

    let translate = |source: &str| {
        let mut labels = LabelTable::new();
        let mut program = Program::new();
        translator.translate(source, &mut labels, &mut program).unwrap();
        (labels, program)
    };

    assert_eq!(
        translate(include_str!("factorial.sml")),
        translate(include_str!("factorial.sml")),
    );
}

#[test]
fn test_translation_error_location() {
    let table = InstructionTable::new();
    let translator = Translator::new(&table);
    let mut machine = Machine::new(TestIo::new());

    let err = machine.load(&translator, "mov EAX 1\n\nloop: add EAX EBXX\n").unwrap_err();

    assert_eq!(err.line, 3);
    assert_eq!(err.column(), 15);
    assert_eq!(err.kind, ParseErrorKind::InvalidRegister {
        opcode: OpCode::Add,
        token: "EBXX".into(),
        suggestion: Some(Register::EBX),
    });
}
