use sml::{
    machine::{Machine, TestIo},
    translator::{InstructionTable, Translator},
};

use slog::{o, Drain, Logger};
use slog_term::{FullFormat, TermDecorator};

fn terminal_logger() -> Logger {
    let decorator = TermDecorator::new().build();
    let drain = FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, o!())
}

#[test]
fn test_logged_run_matches_silent_run() {
    let source = include_str!("countdown.sml");
    let table = InstructionTable::new();

    let logger = terminal_logger();
    let translator = Translator::with_logger(&table, logger.clone());
    let mut logged = Machine::with_logger(TestIo::new(), logger);
    let report = logged.load(&translator, source).unwrap();

    let translator = Translator::new(&table);
    let mut silent = Machine::new(TestIo::new());
    silent.load(&translator, source).unwrap();

    assert!(report.is_clean());
    assert_eq!(logged.execute(), silent.execute());
    assert_eq!(logged.io, silent.io);
    assert_eq!(logged.registers, silent.registers);
}

#[test]
fn test_duplicate_label_is_logged_and_reported() {
    let table = InstructionTable::new();
    let translator = Translator::with_logger(&table, terminal_logger());

    let mut io = TestIo::new();
    let mut machine = Machine::new(&mut io);

    let report = machine
        .load(&translator, "mov EAX 2\nmov EBX 1\nl: out EAX\nl: sub EAX EBX\njnz EAX l\n")
        .unwrap();

    assert_eq!(report.instructions, 5);
    assert_eq!(report.duplicate_labels.len(), 1);
    assert_eq!(report.duplicate_labels[0].0, 4);

    // The first binding wins, so the loop re-runs `out`.
    machine.execute().unwrap();
    drop(machine);

    assert_eq!(io.values(), &[2, 1]);
}
