// sysy-parse: scope-resolving parser front end

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};

use sysy_parse::driver::{self, DriverError, Options};
use sysy_parse::parser::ErrorKind;

#[derive(Parser)]
#[command(name = "sysy-parse")]
#[command(about = "Parse a source file into a scope-resolved AST", version)]
struct Cli {
    /// Input source file
    input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "a.out")]
    output: PathBuf,

    /// Write the AST trace to the output file
    #[arg(short = 'a', long = "ast")]
    dump_ast: bool,

    /// Write the token stream to the output file
    #[arg(short = 't', long = "tokens")]
    dump_tokens: bool,
}

impl From<Cli> for Options {
    fn from(cli: Cli) -> Self {
        Options {
            input: cli.input,
            output: cli.output,
            dump_ast: cli.dump_ast,
            dump_tokens: cli.dump_tokens,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options = Options::from(Cli::parse());

    if let Err(err) = driver::run(&options) {
        let mut stderr = io::stderr();
        let styled = stderr.is_terminal();
        // Best effort: the process exits either way
        let _ = report(&mut stderr, &err, styled);
        std::process::exit(1);
    }
}

/// Print a fatal error, highlighting the error class when `styled`
fn report(out: &mut impl Write, err: &DriverError, styled: bool) -> io::Result<()> {
    let label = match err {
        DriverError::Parse(parse) => match parse.kind() {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::UndefinedIdentifier => "undefined identifier",
            ErrorKind::Internal => "internal error",
        },
        DriverError::Read { .. } | DriverError::Write { .. } => "io error",
    };

    if !styled {
        writeln!(out, "{}: {}", label, err)?;
        return out.flush();
    }

    execute!(
        out,
        SetForegroundColor(Color::Red),
        SetAttribute(Attribute::Bold),
        Print(label),
        SetAttribute(Attribute::Reset),
        ResetColor,
        Print(": "),
        Print(err),
        Print("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undefined_name_error() -> DriverError {
        DriverError::Parse(driver::parse_source("int main(){ return c; }").unwrap_err())
    }

    #[test]
    fn test_plain_report_has_no_escapes() {
        let mut out = Vec::new();
        report(&mut out, &undefined_name_error(), false).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "undefined identifier: Undefined identifier 'c' at line 1, column 20\n"
        );
    }

    #[test]
    fn test_styled_report_colours_label() {
        let mut out = Vec::new();
        report(&mut out, &undefined_name_error(), true).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with('\x1b'));
        assert!(text.contains("undefined identifier"));
        assert!(text.ends_with("Undefined identifier 'c' at line 1, column 20\n"));
    }
}
