use std::path::PathBuf;

use clap::{arg, command, value_parser, ValueEnum};

#[derive(Debug, Clone)]
pub struct ShadeConfig {
    pub paths: Vec<PathBuf>,
    pub output: OutputKind,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum CompilationStage {
    Lexer,
    #[default]
    Parser,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Pretty,
    Debug,
    Ron,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LexerOutputFormat {
    #[default]
    Pretty,
    Debug,
}

impl TryFrom<OutputFormat> for LexerOutputFormat {
    type Error = &'static str;

    fn try_from(format: OutputFormat) -> Result<LexerOutputFormat, Self::Error> {
        match format {
            OutputFormat::Pretty => Ok(Self::Pretty),
            OutputFormat::Debug => Ok(Self::Debug),
            OutputFormat::Ron => Err("the RON format is only available for the parser stage"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParserOutputFormat {
    #[default]
    Pretty,
    Debug,
    Ron,
}

impl From<OutputFormat> for ParserOutputFormat {
    fn from(format: OutputFormat) -> ParserOutputFormat {
        match format {
            OutputFormat::Pretty => Self::Pretty,
            OutputFormat::Debug => Self::Debug,
            OutputFormat::Ron => Self::Ron,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Lexer(LexerOutputFormat),
    Parser(ParserOutputFormat),
}

fn command() -> clap::Command {
    command!()
        .arg(
            arg!(files: <FILE> ... "input files")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            arg!(-s --stage <STAGE> "the stage after which to stop and dump the result")
                .value_parser(value_parser!(CompilationStage))
                .required(false),
        )
        .arg(
            arg!(-f --format <FORMAT> "the output format")
                .value_parser(value_parser!(OutputFormat))
                .required(false),
        )
}

fn parse_args_from<I, T>(args: I) -> Result<ShadeConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    use clap::error::ErrorKind;

    let mut command = command();
    let matches = command.try_get_matches_from_mut(args)?;

    let paths = matches
        .get_many::<PathBuf>("files")
        .ok_or_else(|| command.error(ErrorKind::MissingRequiredArgument, "no input files"))?
        .cloned()
        .collect();

    let stage = matches
        .get_one::<CompilationStage>("stage")
        .copied()
        .unwrap_or_default();
    let format = matches.get_one::<OutputFormat>("format").copied();

    let output = match stage {
        CompilationStage::Lexer => OutputKind::Lexer(match format {
            Some(format) => format
                .try_into()
                .map_err(|msg| command.error(ErrorKind::ValueValidation, msg))?,
            None => Default::default(),
        }),

        CompilationStage::Parser => {
            OutputKind::Parser(format.map(Into::into).unwrap_or_default())
        }
    };

    Ok(ShadeConfig { paths, output })
}

pub fn parse_args_or_exit() -> ShadeConfig {
    match parse_args_from(std::env::args_os()) {
        Ok(cfg) => cfg,

        Err(e) => {
            e.format(&mut command()).exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Result<ShadeConfig, clap::Error> {
        parse_args_from(std::iter::once("shade").chain(args.iter().copied()))
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn defaults_to_a_pretty_ast() {
        let cfg = parse(&["a.shd", "b.shd"]).unwrap();

        assert_eq!(cfg.paths, vec![PathBuf::from("a.shd"), PathBuf::from("b.shd")]);
        assert_eq!(cfg.output, OutputKind::Parser(ParserOutputFormat::Pretty));
    }

    #[test]
    fn lexer_stage_with_format() {
        let cfg = parse(&["-s", "lexer", "-f", "debug", "a.shd"]).unwrap();

        assert_eq!(cfg.output, OutputKind::Lexer(LexerOutputFormat::Debug));
    }

    #[test]
    fn ron_is_rejected_for_tokens() {
        assert!(parse(&["--stage", "lexer", "--format", "ron", "a.shd"]).is_err());
        assert_eq!(
            parse(&["--format", "ron", "a.shd"]).unwrap().output,
            OutputKind::Parser(ParserOutputFormat::Ron)
        );
    }

    #[test]
    fn files_are_required() {
        assert!(parse(&["-s", "parser"]).is_err());
    }
}
