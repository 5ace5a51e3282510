use std::fmt::{self, Display};

use itertools::Itertools;
use once_cell::sync::OnceCell;
use phf::phf_map;
use serde::Serialize;

use crate::position::{HasSpan, Span};

pub const VERTICAL_TAB: char = '\x0b';
pub const FORM_FEED: char = '\x0c';

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'buf> {
    pub value: TokenValue<'buf>,
    pub span: Span,
}

impl<'buf> Token<'buf> {
    pub fn ty(&self) -> TokenType {
        self.value.ty()
    }

    /// Returns the token's text, which is absent only for the end-of-input token.
    ///
    /// String literals are returned without their quotes.
    pub fn text(&self) -> Option<&'buf str> {
        self.value.text()
    }

    pub fn line(&self) -> usize {
        self.span.start.line
    }

    pub fn col(&self) -> usize {
        self.span.start.col
    }

    pub fn is_eof(&self) -> bool {
        self.value == TokenValue::Eof
    }
}

impl HasSpan for Token<'_> {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenValue<'buf> {
    Keyword(Keyword),
    TypeName(TypeName),
    Ident(&'buf str),
    Operator(Operator),
    Number(&'buf str),
    String(&'buf str),
    Symbol(Symbol),
    Eof,
    Invalid(&'buf str),
}

impl<'buf> TokenValue<'buf> {
    pub fn ty(&self) -> TokenType {
        match *self {
            Self::Keyword(kw) => TokenType::Keyword(kw),
            Self::TypeName(_) => TokenType::TypeName,
            Self::Ident(_) => TokenType::Identifier,
            Self::Operator(op) => TokenType::Operator(op),
            Self::Number(_) => TokenType::NumberLiteral,
            Self::String(_) => TokenType::StringLiteral,
            Self::Symbol(sym) => TokenType::Symbol(sym),
            Self::Eof => TokenType::EndOfInput,
            Self::Invalid(_) => TokenType::Invalid,
        }
    }

    pub fn text(&self) -> Option<&'buf str> {
        match *self {
            Self::Keyword(kw) => Some(kw.as_str()),
            Self::TypeName(ty) => Some(ty.as_str()),
            Self::Operator(op) => Some(op.as_str()),
            Self::Symbol(sym) => Some(sym.as_str()),
            Self::Ident(s) | Self::Number(s) | Self::String(s) | Self::Invalid(s) => Some(s),
            Self::Eof => None,
        }
    }

    /// The name of the token's kind, as printed in token listings.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Keyword(_) => "Keyword",
            Self::TypeName(_) => "TypeName",
            Self::Ident(_) => "Identifier",
            Self::Operator(_) => "Operator",
            Self::Number(_) => "NumberLiteral",
            Self::String(_) => "StringLiteral",
            Self::Symbol(_) => "Symbol",
            Self::Eof => "EndOfInput",
            Self::Invalid(_) => "Invalid",
        }
    }
}

/// A token kind as referred to in diagnostics.
///
/// Keywords, operators and symbols carry the exact lexeme expected.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Keyword(Keyword),
    TypeName,
    Identifier,
    Operator(Operator),
    NumberLiteral,
    StringLiteral,
    Symbol(Symbol),
    EndOfInput,
    Invalid,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(kw) => write!(f, "keyword `{}`", kw),
            Self::TypeName => write!(f, "a type name"),
            Self::Identifier => write!(f, "an identifier"),
            Self::Operator(op) => write!(f, "`{}`", op),
            Self::NumberLiteral => write!(f, "a number"),
            Self::StringLiteral => write!(f, "a string"),
            Self::Symbol(sym) => write!(f, "`{}`", sym),
            Self::EndOfInput => write!(f, "end of input"),
            Self::Invalid => write!(f, "an invalid character"),
        }
    }
}

macro_rules! lexemes {
    ($( $(#[$attr:meta])* $name:ident { $( $lit:literal => $variant:ident ),+ $(,)? } )+) => {
        $(
            $(#[$attr])*
            #[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
            pub enum $name {
                $( $variant ),+
            }

            impl $name {
                const LEXEMES: phf::Map<&'static str, $name> = phf_map! {
                    $( $lit => Self::$variant ),+
                };

                pub fn as_str(self) -> &'static str {
                    match self {
                        $( Self::$variant => $lit ),+
                    }
                }

                pub fn parse_exact(input: &str) -> Option<$name> {
                    Self::LEXEMES.get(input).copied()
                }

                fn get_prefix_lengths() -> &'static [usize] {
                    static PREFIX_LENGTHS: OnceCell<Vec<usize>> = OnceCell::new();

                    PREFIX_LENGTHS.get_or_init(|| {
                        let mut lengths = [$( $lit.len() ),+];
                        lengths.sort_unstable();
                        lengths.into_iter().rev().dedup().collect()
                    })
                }

                /// Matches the longest lexeme `input` starts with.
                pub fn parse_prefix(input: &str) -> Option<$name> {
                    Self::get_prefix_lengths()
                        .iter()
                        .filter_map(|&len| input.get(0..len))
                        .find_map(|prefix| Self::LEXEMES.get(prefix))
                        .copied()
                }
            }

            impl Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.as_str())
                }
            }
        )+
    };
}

lexemes! {
    Keyword {
        "Const" => Const,
        "Var" => Var,
        "if" => If,
        "else" => Else,
        "for" => For,
        "while" => While,
        "return" => Return,
        "true" => True,
        "false" => False,
    }

    Operator {
        "==" => Equals,
        "!=" => NotEquals,
        "<=" => LessEquals,
        ">=" => GreaterEquals,
        "&&" => And,
        "||" => Or,
        "+" => Plus,
        "-" => Minus,
        "*" => Asterisk,
        "/" => Slash,
        "=" => Assign,
        "<" => Less,
        ">" => Greater,
        "!" => Not,
    }

    Symbol {
        "(" => ParenLeft,
        ")" => ParenRight,
        "{" => BraceLeft,
        "}" => BraceRight,
        "," => Comma,
        ";" => Semicolon,
    }
}

/// A built-in type name.
///
/// The set is closed: `Int1` through `Int32` and `Vec2` through `Vec5` are the only sized
/// types, so `Int`, `Int0`, `Int33`, `Int04`, `Vec1` and `Vec6` are plain identifiers.
#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum TypeName {
    Void,
    Float,
    Bool,
    Int(u8),
    Vec(u8),
}

static TYPE_NAMES: phf::Map<&'static str, TypeName> = phf_map! {
    "void" => TypeName::Void,
    "Float" => TypeName::Float,
    "Bool" => TypeName::Bool,
    "Int1" => TypeName::Int(1),
    "Int2" => TypeName::Int(2),
    "Int3" => TypeName::Int(3),
    "Int4" => TypeName::Int(4),
    "Int5" => TypeName::Int(5),
    "Int6" => TypeName::Int(6),
    "Int7" => TypeName::Int(7),
    "Int8" => TypeName::Int(8),
    "Int9" => TypeName::Int(9),
    "Int10" => TypeName::Int(10),
    "Int11" => TypeName::Int(11),
    "Int12" => TypeName::Int(12),
    "Int13" => TypeName::Int(13),
    "Int14" => TypeName::Int(14),
    "Int15" => TypeName::Int(15),
    "Int16" => TypeName::Int(16),
    "Int17" => TypeName::Int(17),
    "Int18" => TypeName::Int(18),
    "Int19" => TypeName::Int(19),
    "Int20" => TypeName::Int(20),
    "Int21" => TypeName::Int(21),
    "Int22" => TypeName::Int(22),
    "Int23" => TypeName::Int(23),
    "Int24" => TypeName::Int(24),
    "Int25" => TypeName::Int(25),
    "Int26" => TypeName::Int(26),
    "Int27" => TypeName::Int(27),
    "Int28" => TypeName::Int(28),
    "Int29" => TypeName::Int(29),
    "Int30" => TypeName::Int(30),
    "Int31" => TypeName::Int(31),
    "Int32" => TypeName::Int(32),
    "Vec2" => TypeName::Vec(2),
    "Vec3" => TypeName::Vec(3),
    "Vec4" => TypeName::Vec(4),
    "Vec5" => TypeName::Vec(5),
};

const INT_NAMES: [&str; 32] = [
    "Int1", "Int2", "Int3", "Int4", "Int5", "Int6", "Int7", "Int8", "Int9", "Int10", "Int11",
    "Int12", "Int13", "Int14", "Int15", "Int16", "Int17", "Int18", "Int19", "Int20", "Int21",
    "Int22", "Int23", "Int24", "Int25", "Int26", "Int27", "Int28", "Int29", "Int30", "Int31",
    "Int32",
];

const VEC_NAMES: [&str; 4] = ["Vec2", "Vec3", "Vec4", "Vec5"];

impl TypeName {
    pub fn parse_exact(input: &str) -> Option<TypeName> {
        TYPE_NAMES.get(input).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Float => "Float",
            Self::Bool => "Bool",
            Self::Int(bits) => INT_NAMES[usize::from(bits) - 1],
            Self::Vec(width) => VEC_NAMES[usize::from(width) - 2],
        }
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn type_names_round_trip_through_text() {
        for (&name, &ty) in TYPE_NAMES.entries() {
            assert_eq!(ty.as_str(), name);
        }

        assert_eq!(TYPE_NAMES.len(), 3 + 32 + 4);
    }

    #[test]
    fn type_name_set_is_closed() {
        for name in ["Int1", "Int7", "Int32", "Vec2", "Vec3", "Vec5", "void", "Float", "Bool"] {
            assert!(TypeName::parse_exact(name).is_some(), "{name}");
        }

        for name in ["Int", "Vec", "Int0", "Int33", "Int04", "Vec1", "Vec6", "int4", "Void"] {
            assert_eq!(TypeName::parse_exact(name), None, "{name}");
        }
    }

    #[test]
    fn operators_match_longest_first() {
        assert_eq!(Operator::parse_prefix("==="), Some(Operator::Equals));
        assert_eq!(Operator::parse_prefix("<x"), Some(Operator::Less));
        assert_eq!(Operator::parse_prefix("&x"), None);
        assert_eq!(Operator::parse_prefix("||"), Some(Operator::Or));
        assert_eq!(Operator::parse_prefix(""), None);
    }

    #[test]
    fn eof_has_no_text() {
        assert_eq!(TokenValue::Eof.text(), None);
        assert_eq!(TokenValue::String("hi").text(), Some("hi"));
        assert_eq!(TokenValue::Keyword(Keyword::Const).text(), Some("Const"));
        assert_eq!(TokenValue::TypeName(TypeName::Vec(3)).text(), Some("Vec3"));
    }
}
