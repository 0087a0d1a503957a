mod chain;
mod operator;
mod tokenizer;

pub use chain::TokenChain;
pub use operator::{Operator, HIGHEST_PRIORITY};
pub(crate) use tokenizer::Tokenizer;

/// A scanned token: either a resolved scalar or a binary operator.
///
/// Operands are already fully resolved by the time they are pushed; nested
/// constructs (parentheses, function calls, unary prefixes) collapse to a
/// scalar inside the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Operand(f64),
    Operator(Operator),
}

impl Token {
    pub fn token_type(&self) -> TokenType {
        match self {
            Token::Operand(_) => TokenType::Operand,
            Token::Operator(_) => TokenType::Operator,
        }
    }
}

/// Drives grammar validation: the chain must alternate operands and
/// operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Operand,
    Operator,
}
