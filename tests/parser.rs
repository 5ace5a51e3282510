use std::io::Write;
use std::path::Path;

use paste::paste;
use pretty_assertions::assert_str_eq;

use shade::ast::dump::{dump_ast, AstDumpFormat};
use shade::parse::{Cursor, Lexer, Parsed, Parser};
use shade::position::HasSpan;
use shade::source::{Source, SourceBuffer};

macro_rules! run_parser_test {
    ($filename:expr) => ({
        let mut source_buf = SourceBuffer::new();
        let mut source = Source::new(&mut source_buf);
        let code = include_str!(concat!("parser/", $filename, ".shd"));
        let source_id = source.load_from_string(
            Path::new("tests").join("parser").join(concat!($filename, ".shd")),
            code.to_owned(),
        );
        let source_file = source.get(source_id).unwrap();

        let cursor = Cursor::new(source_file);
        let lexer = Lexer::new(cursor);
        let Parsed { program, errors } = Parser::new(lexer).parse();

        let mut actual = vec![];
        dump_ast(AstDumpFormat::Pretty, &program, &mut actual).unwrap();

        for e in &errors {
            let start = e.span().start;
            assert_eq!(start.src, Some(source_id));
            writeln!(actual, "ERR {}:{} {}", start.line, start.col, e).unwrap();
        }

        let expected = include_str!(concat!("parser/", $filename, ".ast"));

        assert_str_eq!(String::from_utf8(actual).unwrap(), expected);
    });

    { $( $filename:ident ),+ $(,)? } => {
        $(
            paste! {
                #[test]
                fn [< test_ $filename >]() {
                    run_parser_test!(concat!(stringify!($filename)));
                }
            }
        )+
    };
}

run_parser_test! {
    pass_empty,
    pass_declarations,
    pass_assignments,
    pass_functions,
    fail_missing_assign,
    fail_recovery,
    fail_string_operand,
    fail_trailing_comma,
    fail_unterminated_body,
    fail_nested_braces,
    fail_stacked_comments,
    fail_invalid_in_body,
}

#[test]
fn parse_result_serializes_to_ron() {
    let parsed = Parser::new(Lexer::new(Cursor::detached("Int4 x = y;\n)"))).parse();
    let ron = ron::to_string(&parsed).unwrap();

    assert!(ron.contains("UnrecognizedStatement"), "{ron}");
    assert!(ron.contains("\"y\""), "{ron}");
}
