use std::ops::Range;

use log::{debug, trace};
use miette::{NamedSource, SourceSpan};

use crate::{
    Lexer,
    decimal::Decimal,
    error::{EvalError, Paren},
    lex::{Token, TokenKind},
    op::{ArithmeticError, Op, apply},
};

/// Evaluates `expression` and returns its normalized value.
///
/// ```
/// let value = decimal_eval::evaluate("222 * ( 12 + ( 1 - 3 ) * 2 ) / 8").unwrap();
/// assert_eq!(value.to_string(), "222");
/// ```
pub fn evaluate(expression: &str) -> Result<Decimal, EvalError> {
    Evaluator::new(None, expression).run()
}

/// A value on the operand stack, with the input it was computed from.
#[derive(Debug)]
struct Operand {
    value: Decimal,
    span: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Symbol {
    Open,
    Op(Op),
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    symbol: Symbol,
    offset: usize,
}

/// One run of the two-stack shunting-yard evaluation over a single expression.
pub struct Evaluator<'de> {
    filename: Option<&'de str>,
    whole: &'de str,
    operands: Vec<Operand>,
    operators: Vec<Pending>,
}

impl<'de> Evaluator<'de> {
    pub fn new(filename: Option<&'de str>, whole: &'de str) -> Self {
        Self {
            filename,
            whole,
            operands: Vec::new(),
            operators: Vec::new(),
        }
    }

    pub fn run(mut self) -> Result<Decimal, EvalError> {
        let lexer = Lexer::new(self.filename, self.whole);
        for token in lexer {
            self.feed(token?)?;
        }
        self.finish()
    }

    fn feed(&mut self, token: Token<'de>) -> Result<(), EvalError> {
        let offset = token.offset;
        let op = match token.kind {
            TokenKind::Number(value) => {
                self.operands.push(Operand {
                    value,
                    span: offset..offset + token.literal.len(),
                });
                return Ok(());
            }
            TokenKind::LeftParen => {
                self.operators.push(Pending {
                    symbol: Symbol::Open,
                    offset,
                });
                return Ok(());
            }
            TokenKind::RightParen => return self.close_paren(offset),
            TokenKind::Plus => Op::Plus,
            TokenKind::Minus => Op::Minus,
            TokenKind::Star => Op::Star,
            TokenKind::Slash => Op::Slash,
        };

        while let Some(&Pending {
            symbol: Symbol::Op(top),
            offset: top_offset,
        }) = self.operators.last()
        {
            if top.precedence() < op.precedence() {
                break;
            }
            self.operators.pop();
            self.fold(top, top_offset)?;
        }

        self.operators.push(Pending {
            symbol: Symbol::Op(op),
            offset,
        });
        Ok(())
    }

    fn close_paren(&mut self, offset: usize) -> Result<(), EvalError> {
        loop {
            match self.operators.pop() {
                Some(Pending {
                    symbol: Symbol::Open,
                    ..
                }) => return Ok(()),
                Some(Pending {
                    symbol: Symbol::Op(op),
                    offset,
                }) => self.fold(op, offset)?,
                None => {
                    return Err(EvalError::UnmatchedParen {
                        src: self.source(),
                        bad_bit: SourceSpan::from(offset..offset + 1),
                        paren: Paren::Close,
                    });
                }
            }
        }
    }

    /// Pops two operands, applies `op` and pushes the result.
    fn fold(&mut self, op: Op, offset: usize) -> Result<(), EvalError> {
        let (Some(b), Some(a)) = (self.operands.pop(), self.operands.pop()) else {
            return Err(EvalError::MissingOperand {
                src: self.source(),
                bad_bit: SourceSpan::from(offset..offset + 1),
                op: op.symbol(),
            });
        };

        trace!("fold {} {op} {}", a.value, b.value);
        let span = a.span.start..b.span.end;
        let value = match apply(op, a.value, b.value) {
            Ok(value) => value,
            Err(ArithmeticError::DivisionByZero) => {
                return Err(EvalError::DivisionByZero {
                    src: self.source(),
                    bad_bit: SourceSpan::from(b.span),
                });
            }
        };

        self.operands.push(Operand { value, span });
        Ok(())
    }

    fn finish(mut self) -> Result<Decimal, EvalError> {
        while let Some(pending) = self.operators.pop() {
            match pending.symbol {
                Symbol::Open => {
                    return Err(EvalError::UnmatchedParen {
                        src: self.source(),
                        bad_bit: SourceSpan::from(pending.offset..pending.offset + 1),
                        paren: Paren::Open,
                    });
                }
                Symbol::Op(op) => self.fold(op, pending.offset)?,
            }
        }

        let mut operands = std::mem::take(&mut self.operands).into_iter();
        let (Some(result), extra) = (operands.next(), operands.next()) else {
            return Err(EvalError::EmptyExpression {
                src: self.source(),
                bad_bit: SourceSpan::from(0..self.whole.len()),
            });
        };
        if let Some(extra) = extra {
            return Err(EvalError::DanglingOperand {
                src: self.source(),
                bad_bit: SourceSpan::from(extra.span),
            });
        }

        let value = result.value.normalized();
        debug!("evaluated {:?} to {value}", self.whole);
        Ok(value)
    }

    fn source(&self) -> NamedSource<String> {
        NamedSource::new(self.filename.unwrap_or("<input>"), self.whole.to_string())
    }
}
