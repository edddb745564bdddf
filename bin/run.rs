use std::fmt;
use std::process;

use clap::{App, Arg, ArgMatches};
use slog::{o, warn, Discard, Drain, Logger};
use slog_term::{FullFormat, TermDecorator};

use sml::{
    error::{ExecutionError, ParseError},
    machine::{Machine, StdIo},
    translator::{InstructionTable, Translator},
};

enum Error {
    IO(std::io::Error),
    Parse(ParseError),
    Execution(ExecutionError),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IO(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Error {
        Error::Parse(e)
    }
}

impl From<ExecutionError> for Error {
    fn from(e: ExecutionError) -> Error {
        Error::Execution(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IO(err) => write!(f, "IO error: {}", err),
            Error::Parse(err) => write!(f, "Parse error {}", err),
            Error::Execution(err) => write!(f, "Execution error: {}", err),
        }
    }
}

fn parse_arguments() -> ArgMatches<'static> {
    App::new("smlrun")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility for translating and executing SML programs")
        .arg(Arg::with_name("source")
             .help("File containing SML source code")
             .value_name("SOURCE")
             .required(true)
             .index(1))
        .arg(Arg::with_name("verbose")
             .help("Log translation and execution to the terminal")
             .short("v")
             .long("verbose"))
        .arg(Arg::with_name("dump")
             .help("Print the translated program and its labels before running it")
             .long("dump"))
        .arg(Arg::with_name("registers")
             .help("Print the registers after the program has finished")
             .long("registers"))
        .get_matches()
}

fn build_logger(verbose: bool) -> Logger {
    if !verbose {
        return Logger::root(Discard, o!());
    }

    let decorator = TermDecorator::new().stderr().build();
    let drain = FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, o!())
}

fn main() {
    let args = parse_arguments();

    // SOURCE is required, clap exits before this point without it.
    let file_path = args.value_of("source").unwrap_or_default();

    let logger = build_logger(args.is_present("verbose"));

    let result = run(&args, file_path, logger);

    if let Err(err) = result {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(args: &ArgMatches, file_path: &str, logger: Logger) -> Result<(), Error> {
    let source = std::fs::read_to_string(file_path)?;

    let table = InstructionTable::new();
    let translator = Translator::with_logger(&table, logger.clone());
    let mut machine = Machine::with_logger(StdIo, logger.clone());

    let report = machine.load(&translator, &source)?;

    for (line, err) in &report.duplicate_labels {
        warn!(logger, "{}", err; "file" => file_path, "line" => *line);
        eprintln!("warning at line {}: {}", line, err);
    }

    if args.is_present("dump") {
        println!("{}", machine.program);
        println!("{}", machine.labels);
    }

    machine.execute()?;

    if args.is_present("registers") {
        println!("{}", machine.registers);
    }

    Ok(())
}
