use clap::Parser;
use clausium::{
    cli,
    dimacs::{DimacsParser, ExtendedParseError},
    Cnf,
};
use miette::Result;
use std::{io::Cursor, path::PathBuf};

/// Parses a DIMACS CNF file and prints it back in DIMACS form.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Input formula in DIMACS CNF format, read from stdin when omitted.
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let contents = cli::read_input(args.input.as_deref())?;
    let reader = Cursor::new(&contents);

    let cnf: Cnf = match DimacsParser::new(reader).parse() {
        Ok(cnf) => cnf,
        Err(err) => Err(ExtendedParseError { source_code: contents, related: vec![err] })?,
    };

    print!("{cnf}");
    Ok(())
}
