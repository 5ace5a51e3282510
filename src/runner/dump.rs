use std::io::{self, Write};

use shade::parse::token::Token;

use super::config::LexerOutputFormat;

pub fn dump_tokens<'buf, I>(format: LexerOutputFormat, tokens: I, mut out: impl Write) -> io::Result<()>
where
    I: Iterator<Item = Token<'buf>>,
{
    match format {
        LexerOutputFormat::Pretty => dump_tokens_pretty(tokens, out),
        LexerOutputFormat::Debug => writeln!(out, "{:#?}", tokens.collect::<Vec<_>>()),
    }
}

fn dump_tokens_pretty<'buf, I>(tokens: I, mut out: impl Write) -> io::Result<()>
where
    I: Iterator<Item = Token<'buf>>,
{
    for token in tokens.take_while(|token| !token.is_eof()) {
        writeln!(
            out,
            "Line {}, Col {:2}: {:<15} | Value: {}",
            token.line(),
            token.col(),
            token.value.kind_name(),
            token.text().unwrap_or_default(),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use shade::parse::{Cursor, Lexer};

    fn dump(src: &str, format: LexerOutputFormat) -> String {
        let mut buf = vec![];
        dump_tokens(format, Lexer::new(Cursor::detached(src)), &mut buf).unwrap();

        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn pretty_listing() {
        let src = "Const Int4 x = 42; // answer\nvoid main(Vec3 v) { return \"ok\"; } @";

        assert_snapshot!(dump(src, LexerOutputFormat::Pretty), @r###"
        Line 1, Col  1: Keyword         | Value: Const
        Line 1, Col  7: TypeName        | Value: Int4
        Line 1, Col 12: Identifier      | Value: x
        Line 1, Col 14: Operator        | Value: =
        Line 1, Col 16: NumberLiteral   | Value: 42
        Line 1, Col 18: Symbol          | Value: ;
        Line 3, Col  1: TypeName        | Value: void
        Line 3, Col  6: Identifier      | Value: main
        Line 3, Col 10: Symbol          | Value: (
        Line 3, Col 11: TypeName        | Value: Vec3
        Line 3, Col 16: Identifier      | Value: v
        Line 3, Col 17: Symbol          | Value: )
        Line 3, Col 19: Symbol          | Value: {
        Line 3, Col 21: Keyword         | Value: return
        Line 3, Col 28: StringLiteral   | Value: ok
        Line 3, Col 32: Symbol          | Value: ;
        Line 3, Col 34: Symbol          | Value: }
        Line 3, Col 36: Invalid         | Value: @
        "###);
    }

    #[test]
    fn empty_input_lists_nothing() {
        assert_eq!(dump("  \n// only a comment", LexerOutputFormat::Pretty), "");
    }

    #[test]
    fn debug_listing_ends_with_eof() {
        let out = dump("x", LexerOutputFormat::Debug);

        assert!(out.contains("Ident(\n"), "{out}");
        assert!(out.trim_end().ends_with("]"), "{out}");
        assert!(out.contains("Eof"), "{out}");
    }
}
