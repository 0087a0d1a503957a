mod env;
mod lookup;

pub use env::ExecutionEnv;
pub use lookup::SymbolLookup;

use crate::error::{Error, Result};
use crate::function::FunctionCallSite;
use crate::util;

/// A named entry in an environment: either a constant value or an
/// invokable function.
#[derive(Debug, Clone)]
pub enum Symbol {
    Variable(Variable),
    Function(FunctionCallSite),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(variable) => variable.name(),
            Symbol::Function(function) => function.name(),
        }
    }
}

impl From<Variable> for Symbol {
    fn from(variable: Variable) -> Self {
        Symbol::Variable(variable)
    }
}

impl From<FunctionCallSite> for Symbol {
    fn from(function: FunctionCallSite) -> Self {
        Symbol::Function(function)
    }
}

/// A named constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    value: f64,
}

impl Variable {
    pub fn new(name: &str, value: f64) -> Result<Self> {
        if !util::is_valid_identifier_name(name) {
            return Err(Error::InvalidSymbolName(name.to_string()));
        }
        Ok(Variable {
            name: name.to_string(),
            value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}
