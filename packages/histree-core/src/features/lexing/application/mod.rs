pub mod lexer;

pub use lexer::tokenize;
