pub mod decimal;
pub mod error;
pub mod eval;
pub mod harness;
pub mod lex;
pub mod op;

pub use decimal::{DIVISION_SCALE, Decimal, ParseDecimalError};
pub use error::{ErrorKind, EvalError};
pub use eval::{Evaluator, evaluate};
pub use lex::{Lexer, Token, TokenKind};
pub use op::{ArithmeticError, Op, apply};
