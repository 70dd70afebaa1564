use clap::{ColorChoice, Parser};
use colored::Colorize;
use requestty::symbols;
use std::{
    io::{IsTerminal, stdout},
    process,
};
use vimeo_dl::{Args, error::Error, logger};

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    colored::control::set_override(match args.color {
        ColorChoice::Always => true,
        ColorChoice::Auto => stdout().is_terminal(),
        ColorChoice::Never => false,
    });
    logger::init(args.verbose)?;

    args.execute()?;
    Ok(())
}

fn main() {
    let mut symbols = symbols::UNICODE;
    symbols.completed = '•';
    symbols.cross = 'x';
    symbols::set(symbols);

    if let Err(e) = run() {
        match e.downcast_ref::<Error>() {
            Some(Error::Cancelled) => eprintln!("\nAborted."),
            _ => eprintln!("{}: {}", "error".bold().red(), e),
        }

        process::exit(1);
    }
}
