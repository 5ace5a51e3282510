mod cursor;
mod lexer;
mod lookahead;
mod parser;
pub mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use lookahead::Lookahead;
pub use parser::{Parsed, Parser, ParserError};
