use std::io;

use shade::ast::dump::{dump_ast, AstDumpFormat};
use shade::ast::Program;
use shade::parse::token::TokenValue;
use shade::parse::{Cursor, Lexer, Parsed, Parser, ParserError};

use super::config::{OutputKind, ParserOutputFormat};
use super::dump::dump_tokens;
use super::{PassOutput, RunnerCtx};

pub fn load_files(ctx: &mut RunnerCtx<'_, '_>) -> PassOutput<()> {
    for path in &ctx.config.paths {
        let result = ctx.source.borrow_mut().load(path.clone());

        if let Err(e) = result {
            ctx.diagnostics
                .error()
                .with_message(format!("could not load file {}", path.display()))
                .with_source(Box::new(e))
                .emit();
        }
    }

    ctx.stop_if_errors(())
}

pub fn scan_files<'buf>(ctx: &mut RunnerCtx<'buf, '_>) -> PassOutput<Vec<Lexer<'buf>>> {
    let lexers = ctx
        .source
        .borrow()
        .iter()
        .map(|src_file| Lexer::new(Cursor::new(src_file)))
        .collect();

    PassOutput::continue_with_output(lexers)
}

pub fn dump_tokens_if_asked<'buf>(
    ctx: &mut RunnerCtx<'buf, '_>,
    lexers: Vec<Lexer<'buf>>,
) -> PassOutput<Vec<Lexer<'buf>>> {
    let OutputKind::Lexer(format) = ctx.config.output else {
        return PassOutput::continue_with_output(lexers);
    };

    for lexer in lexers {
        let tokens = lexer.collect::<Vec<_>>();

        if let Err(e) = dump_tokens(format, tokens.iter().copied(), io::stdout().lock()) {
            ctx.diagnostics
                .error()
                .with_message("could not dump the tokens to stdout".to_owned())
                .with_source(Box::new(e))
                .emit();
        }

        for &token in &tokens {
            if let TokenValue::Invalid(_) = token.value {
                ctx.diagnostics
                    .error()
                    .with_span_and_error(&ParserError::InvalidCharacter(token))
                    .emit();
            }
        }
    }

    PassOutput::stop_with_output(vec![])
}

/// Parses every file, reporting all syntax errors.
///
/// Programs are kept even when errors were found: they hold the statements that did parse.
pub fn parse_all<'buf>(
    ctx: &mut RunnerCtx<'buf, '_>,
    lexers: Vec<Lexer<'buf>>,
) -> PassOutput<Vec<Program<'buf>>> {
    let mut result = Vec::with_capacity(lexers.len());

    for lexer in lexers {
        let Parsed { program, errors } = Parser::new(lexer).parse();

        for e in &errors {
            ctx.diagnostics.error().with_span_and_error(e).emit();
        }

        result.push(program);
    }

    PassOutput::continue_with_output(result)
}

pub fn dump_asts_if_asked<'buf>(
    ctx: &mut RunnerCtx<'buf, '_>,
    asts: Vec<Program<'buf>>,
) -> PassOutput<Vec<Program<'buf>>> {
    let OutputKind::Parser(format) = ctx.config.output else {
        return PassOutput::continue_with_output(asts);
    };

    let format = match format {
        ParserOutputFormat::Pretty => AstDumpFormat::Pretty,
        ParserOutputFormat::Debug => AstDumpFormat::Debug,
        ParserOutputFormat::Ron => AstDumpFormat::Ron,
    };

    for ast in &asts {
        if let Err(e) = dump_ast(format, ast, io::stdout().lock()) {
            ctx.diagnostics
                .error()
                .with_message("could not dump an ast to stdout".to_owned())
                .with_source(Box::new(e))
                .emit();
        }
    }

    PassOutput::stop_with_output(asts)
}
