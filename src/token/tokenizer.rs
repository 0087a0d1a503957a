use log::{debug, trace};

use super::{Operator, Token, TokenChain, TokenType};
use crate::error::{Error, Result};
use crate::function::{FunctionCallSite, FunctionContext};
use crate::symbol::{ExecutionEnv, Symbol};
use crate::util;

/// Decides when a bounded sub-scan stops consuming characters.
type StopCondition = fn(u8) -> bool;

/// The scanner: walks the source buffer left-to-right, eagerly resolving
/// nested constructs (parentheses, function arguments, unary prefixes) into
/// scalars via bounded sub-scans, and feeds the resulting token stream into
/// a [`TokenChain`].
///
/// A sub-scan is a fresh `Tokenizer` over the same source and environment
/// with its own chain and an explicit `(position, stop condition)` view;
/// the parent reads the child's final position back when it completes.
pub(crate) struct Tokenizer<'a> {
    source: &'a [u8],
    env: &'a ExecutionEnv,
    chain: TokenChain,
    loop_condition: StopCondition,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a [u8], env: &'a ExecutionEnv) -> Self {
        Tokenizer::bounded(source, env, |_| true, 0)
    }

    fn bounded(
        source: &'a [u8],
        env: &'a ExecutionEnv,
        loop_condition: StopCondition,
        pos: usize,
    ) -> Self {
        Tokenizer {
            source,
            env,
            chain: TokenChain::new(),
            loop_condition,
            pos,
        }
    }

    fn branch(&self, loop_condition: StopCondition, pos: usize) -> Tokenizer<'a> {
        Tokenizer::bounded(self.source, self.env, loop_condition, pos)
    }

    /// Scans the whole view and hands back the chain, ready to solve.
    pub fn scan(mut self) -> Result<TokenChain> {
        self.read_tokens()?;
        Ok(self.chain)
    }

    fn read_tokens(&mut self) -> Result<()> {
        while self.has_remaining() {
            let current = self.advance();
            match current {
                b' ' | b'\r' | b'\t' => {}
                b'0'..=b'9' => {
                    let value = self.read_double(current, true)?;
                    self.chain.push(Token::Operand(value))?;
                }
                b'*' => self.push_operator(Operator::Multiplication)?,
                b'/' => self.push_operator(Operator::Division)?,
                b'+' => self.push_operator(Operator::Addition)?,
                b'%' => self.push_operator(Operator::Modulo)?,
                b'^' => self.push_operator(Operator::Power)?,
                b'-' => match self.chain.last_type() {
                    TokenType::Operand => self.push_operator(Operator::Subtraction)?,
                    TokenType::Operator => {
                        let value = self.read_double(b'0', false)?;
                        self.chain.push(Token::Operand(-value))?;
                    }
                },
                b'<' => match self.advance_or_err()? {
                    b'<' => self.push_operator(Operator::LeftShift)?,
                    b'=' => self.push_operator(Operator::LessThanOrEqual)?,
                    _ => {
                        self.push_operator(Operator::LessThan)?;
                        self.pos -= 1; // put the character after '<' back
                    }
                },
                b'>' => match self.advance_or_err()? {
                    b'>' => self.push_operator(Operator::RightShift)?,
                    b'=' => self.push_operator(Operator::GreaterThanOrEqual)?,
                    _ => {
                        self.push_operator(Operator::GreaterThan)?;
                        self.pos -= 1;
                    }
                },
                b'=' => {
                    if !self.matches(b'=') {
                        return Err(Error::IncompleteComparison);
                    }
                    self.push_operator(Operator::Equals)?;
                }
                b'&' => {
                    if self.matches(b'&') {
                        self.push_operator(Operator::LogicalAnd)?;
                    } else {
                        self.push_operator(Operator::BitwiseAnd)?;
                    }
                }
                b'|' => {
                    if self.matches(b'|') {
                        self.push_operator(Operator::LogicalOr)?;
                    } else {
                        self.push_operator(Operator::BitwiseOr)?;
                    }
                }
                b'(' => {
                    // support for things like 2(1 + 1) -> 2 * (1 + 1)
                    if self.chain.last_type() == TokenType::Operand {
                        self.push_operator(Operator::Multiplication)?;
                    }
                    let value = self.read_brackets()?;
                    self.chain.push(Token::Operand(value))?;
                }
                b'!' => {
                    if self.current_or(Error::ExpectedOperand)? == b'=' {
                        self.pos += 1;
                        self.push_operator(Operator::NotEquals)?;
                    } else {
                        // highest-priority prefix, solved immediately
                        let value = self.read_unary_operand()?;
                        self.chain.push(Token::Operand(util::bool_not(value)))?;
                    }
                }
                b'~' => {
                    let value = self.read_unary_operand()?;
                    let negated = !util::require_int(value)?;
                    self.chain.push(Token::Operand(f64::from(negated)))?;
                }
                c if util::is_identifier_start(c) => {
                    // support for things like 2cos(1) -> 2 * cos(1)
                    if self.chain.last_type() == TokenType::Operand {
                        self.push_operator(Operator::Multiplication)?;
                    }
                    let value = self.read_symbol()?;
                    self.chain.push(Token::Operand(value))?;
                }
                c => return Err(self.unexpected_char(c)),
            }
        }
        Ok(())
    }

    fn push_operator(&mut self, op: Operator) -> Result<()> {
        self.chain.push(Token::Operator(op))
    }

    /// Builds the error for the rejected byte at the previous position.
    ///
    /// The source is scanned bytewise, so a multi-byte character must be
    /// decoded before it lands in an error message; every byte consumed
    /// before it was ASCII, so the byte starts a character.
    fn unexpected_char(&self, byte: u8) -> Error {
        let c = std::str::from_utf8(&self.source[self.pos - 1..])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(byte as char);
        Error::UnexpectedChar(c)
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.source.len() && (self.loop_condition)(self.source[self.pos])
    }

    fn advance(&mut self) -> u8 {
        let current = self.source[self.pos];
        self.pos += 1;
        current
    }

    fn advance_or_err(&mut self) -> Result<u8> {
        if !self.has_remaining() {
            return Err(Error::ExpectedOperand);
        }
        Ok(self.advance())
    }

    fn current(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn current_or(&self, err: Error) -> Result<u8> {
        self.current().ok_or(err)
    }

    fn matches(&mut self, expected: u8) -> bool {
        if self.current() == Some(expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    /// Reads a numeric literal starting at the current position.
    ///
    /// `initial` is the already consumed first digit, or `b'0'` when the
    /// caller consumed a minus sign instead (`read_number` false). In that
    /// case, a bare identifier start after the sign yields 1 so the caller's
    /// negation produces -1 and implicit multiplication attaches the symbol
    /// (`-cos(1)`, `-pi`).
    fn read_double(&mut self, initial: u8, mut read_number: bool) -> Result<f64> {
        let mut result = f64::from(initial - b'0');

        while self.pos < self.source.len() {
            let current = self.advance();
            match current {
                b'0'..=b'9' => {
                    result = result * 10.0 + f64::from(current - b'0');
                    read_number = true;
                }
                b'.' => {
                    if !read_number {
                        return Err(Error::MissingIntegerPart);
                    }
                    return Ok(result + self.read_decimal_part()?);
                }
                _ => {
                    self.pos -= 1; // read one character too far
                    break;
                }
            }
        }
        if !read_number {
            return match self.current() {
                Some(c) if util::is_identifier_start(c) => Ok(1.0),
                _ => Err(Error::ExpectedNumber),
            };
        }
        Ok(result)
    }

    fn read_decimal_part(&mut self) -> Result<f64> {
        let old_pos = self.pos;
        let mut result = 0.0;
        let mut divider = 10.0; // always a power of ten

        while let Some(current @ b'0'..=b'9') = self.current() {
            result += f64::from(current - b'0') / divider;
            divider *= 10.0;
            self.pos += 1;
        }
        if self.pos == old_pos {
            return Err(Error::MissingDecimalPart);
        }
        Ok(result)
    }

    /// Runs a bounded sub-scan over the parenthesized sub-expression and
    /// resumes past the matching `)`.
    fn read_brackets(&mut self) -> Result<f64> {
        trace!("entering parenthesized sub-expression at {}", self.pos);
        let mut sub = self.branch(|c| c != b')', self.pos);
        sub.read_tokens()?;
        let value = std::mem::take(&mut sub.chain).solve()?;

        if sub.current() != Some(b')') {
            return Err(Error::MissingClosingParen);
        }
        self.pos = sub.pos + 1;
        Ok(value)
    }

    /// Solves the remainder of the enclosing view for a unary prefix
    /// operator (`!`, `~`), reusing the parent's stop condition.
    fn read_unary_operand(&mut self) -> Result<f64> {
        let mut sub = self.branch(self.loop_condition, self.pos);
        sub.read_tokens()?;
        let value = std::mem::take(&mut sub.chain).solve()?;
        self.pos = sub.pos;
        Ok(value)
    }

    /// Resolves the identifier starting one character back (the dispatch
    /// loop already consumed its first character).
    fn read_symbol(&mut self) -> Result<f64> {
        let start = self.pos - 1;
        let env = self.env;
        let symbol = env.lookup_symbol(self.source, start)?;
        self.pos = start + symbol.name().len();

        match symbol {
            Symbol::Variable(variable) => Ok(variable.value()),
            Symbol::Function(function) => self.read_function_call(function),
        }
    }

    fn read_function_call(&mut self, function: &FunctionCallSite) -> Result<f64> {
        debug!("scanning call to function {}", function.name());
        if !self.matches(b'(') {
            return Err(Error::MissingFunctionOpenParen(function.name().to_string()));
        }

        let mut context = FunctionContext::new();
        let next = self.current_or(Error::MissingFunctionCloseParen(
            function.name().to_string(),
        ))?;
        if next != b')' {
            // arguments were provided
            if !function.supports_args() {
                return Err(Error::UnexpectedParameters(function.name().to_string()));
            }

            let mut sub = self.branch(|c| c != b',' && c != b')', self.pos);
            sub.read_tokens()?;
            context.add(std::mem::take(&mut sub.chain).solve()?);

            while sub.current() == Some(b',') {
                // + 1 to consume the comma
                sub = sub.branch(|c| c != b',' && c != b')', sub.pos + 1);
                sub.read_tokens()?;
                context.add(std::mem::take(&mut sub.chain).solve()?);
            }
            self.pos = sub.pos;
        }
        if !self.matches(b')') {
            return Err(Error::MissingFunctionCloseParen(function.name().to_string()));
        }

        function.apply(&context)
    }
}
