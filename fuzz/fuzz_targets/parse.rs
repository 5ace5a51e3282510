#![no_main]

use libfuzzer_sys::fuzz_target;

use shade::parse::{Cursor, Lexer, Parsed, Parser};
use shade::position::HasSpan;
use shade::source::{Source, SourceBuffer};

fuzz_target!(|code: &[u8]| {
    let Ok(code) = std::str::from_utf8(code) else { return };

    let mut source_buf = SourceBuffer::new();
    let mut source = Source::new(&mut source_buf);
    let source_id = source.load_from_string("fuzz-input.shd".into(), code.to_owned());
    let source_file = source.get(source_id).unwrap();

    let tokens = Lexer::new(Cursor::new(source_file)).collect::<Vec<_>>();
    assert!(tokens.last().map_or(false, |token| token.is_eof()));
    assert!(tokens
        .windows(2)
        .all(|pair| pair[0].span.end.byte <= pair[1].span.start.byte));

    let Parsed { program, errors } = Parser::new(Lexer::new(Cursor::new(source_file))).parse();

    for stmt in &program.stmts {
        assert!(stmt.span().end.byte <= code.len());
    }

    for e in &errors {
        assert!(e.span().start.byte <= code.len());
    }
});
