use super::{Symbol, SymbolLookup, Variable};
use crate::builtins;
use crate::error::{Error, Result};
use crate::function::{FunctionCallSite, FunctionContext};
use crate::util;

/// An environment instance to which symbols can be bound.
///
/// A parse only sees the symbols bound to the environment it was given.
/// Mutation takes `&mut self` and parsing borrows `&self`, so a symbol
/// table can never be modified while a parse against it is in flight.
#[derive(Debug, Default)]
pub struct ExecutionEnv {
    symbols: SymbolLookup,
}

impl ExecutionEnv {
    /// Creates an empty environment, with no symbols bound.
    pub fn new() -> Self {
        ExecutionEnv::default()
    }

    /// Creates an environment pre-seeded with the default symbol catalogue.
    pub fn with_builtins() -> Self {
        let mut env = ExecutionEnv::new();
        builtins::register(&mut env).expect("builtin symbol catalogue is valid");
        env
    }

    pub fn insert_variable(&mut self, name: &str, value: f64) -> Result<()> {
        self.insert_symbol(Variable::new(name, value)?.into())
    }

    /// Inserts a function taking no arguments.
    pub fn insert_nullary<F>(&mut self, name: &str, fn_: F) -> Result<()>
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        self.insert_symbol(FunctionCallSite::new(name, 0, move |_| Ok(fn_()))?.into())
    }

    /// Inserts a function taking exactly one argument.
    pub fn insert_unary<F>(&mut self, name: &str, fn_: F) -> Result<()>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.insert_symbol(
            FunctionCallSite::new(name, 1, move |ctx| Ok(fn_(ctx.get_double(0)?)))?.into(),
        )
    }

    /// Inserts a function taking exactly two arguments.
    pub fn insert_binary<F>(&mut self, name: &str, fn_: F) -> Result<()>
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.insert_symbol(
            FunctionCallSite::new(name, 2, move |ctx| {
                Ok(fn_(ctx.get_double(0)?, ctx.get_double(1)?))
            })?
            .into(),
        )
    }

    /// Inserts a function accepting between `min_args` and `max_args`
    /// arguments, both inclusive.
    pub fn insert_function<F>(
        &mut self,
        name: &str,
        min_args: usize,
        max_args: usize,
        fn_: F,
    ) -> Result<()>
    where
        F: Fn(&FunctionContext) -> Result<f64> + Send + Sync + 'static,
    {
        self.insert_symbol(FunctionCallSite::with_bounds(name, min_args, max_args, fn_)?.into())
    }

    /// Inserts a symbol, failing if the name is already bound, either as a
    /// variable or as a function.
    pub fn insert_symbol(&mut self, symbol: Symbol) -> Result<()> {
        self.symbols.insert(symbol)
    }

    /// Inserts a symbol unless its name is already bound; returns the prior
    /// symbol in that case.
    pub fn insert_if_absent(&mut self, symbol: Symbol) -> Result<Option<Symbol>> {
        self.symbols.insert_if_absent(symbol)
    }

    /// Unbinds a symbol by name, returning it if it was bound.
    pub fn remove_symbol(&mut self, name: &str) -> Option<Symbol> {
        self.symbols.remove(name)
    }

    /// Resolves the symbol whose name starts at `pos` in the scanner's
    /// buffer, reporting the scanned identifier run on a miss.
    pub(crate) fn lookup_symbol(&self, buf: &[u8], pos: usize) -> Result<&Symbol> {
        self.symbols.lookup(buf, pos).ok_or_else(|| {
            let run_end = buf[pos..]
                .iter()
                .position(|&c| !util::is_identifier_char(c))
                .map_or(buf.len(), |offset| pos + offset);
            let name = String::from_utf8_lossy(&buf[pos..run_end]).into_owned();
            Error::SymbolNotFound(name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut env = ExecutionEnv::new();
        env.insert_variable("answer", 42.0).unwrap();

        match env.lookup_symbol(b"answer", 0).unwrap() {
            Symbol::Variable(variable) => assert_eq!(variable.value(), 42.0),
            other => panic!("expected variable, got {other:?}"),
        }
    }

    #[test]
    fn test_lookup_miss_reports_scanned_run() {
        let env = ExecutionEnv::new();
        assert_eq!(
            env.lookup_symbol(b"unknown_var + 1", 0).unwrap_err(),
            Error::SymbolNotFound("unknown_var".to_string())
        );
        // run ends at the buffer end as well
        assert_eq!(
            env.lookup_symbol(b"1+abc", 2).unwrap_err(),
            Error::SymbolNotFound("abc".to_string())
        );
    }

    #[test]
    fn test_duplicate_across_kinds() {
        let mut env = ExecutionEnv::new();
        env.insert_unary("f", f64::sqrt).unwrap();
        assert_eq!(
            env.insert_variable("f", 1.0),
            Err(Error::DuplicateSymbol("f".to_string()))
        );
    }

    #[test]
    fn test_remove_and_reinsert() {
        let mut env = ExecutionEnv::new();
        env.insert_variable("x", 1.0).unwrap();
        assert!(env.remove_symbol("x").is_some());
        assert!(env.remove_symbol("x").is_none());
        env.insert_variable("x", 2.0).unwrap();
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let mut env = ExecutionEnv::new();
        env.insert_variable("x", 1.0).unwrap();

        let prior = env
            .insert_if_absent(Variable::new("x", 9.0).unwrap().into())
            .unwrap();
        assert!(prior.is_some());

        match env.lookup_symbol(b"x", 0).unwrap() {
            Symbol::Variable(variable) => assert_eq!(variable.value(), 1.0),
            other => panic!("expected variable, got {other:?}"),
        }
    }

    #[test]
    fn test_builtins_are_seeded() {
        let env = ExecutionEnv::with_builtins();
        assert!(env.lookup_symbol(b"pi", 0).is_ok());
        assert!(env.lookup_symbol(b"sin", 0).is_ok());
        assert!(env.lookup_symbol(b"max", 0).is_ok());
    }
}
