use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::util;

/// The callback invoked when a registered function is applied.
pub type Callback = Arc<dyn Fn(&FunctionContext) -> Result<f64> + Send + Sync>;

/// An arity-checked, invokable named function.
///
/// Invocation happens via [`FunctionCallSite::apply`]; see
/// [`FunctionContext`] for how callbacks consume their arguments.
#[derive(Clone)]
pub struct FunctionCallSite {
    name: String,
    min_args: usize,
    max_args: usize,
    function: Callback,
}

impl FunctionCallSite {
    /// Creates a function taking exactly `num_args` arguments.
    pub fn new<F>(name: &str, num_args: usize, function: F) -> Result<Self>
    where
        F: Fn(&FunctionContext) -> Result<f64> + Send + Sync + 'static,
    {
        FunctionCallSite::with_bounds(name, num_args, num_args, function)
    }

    /// Creates a function accepting between `min_args` and `max_args`
    /// arguments, both inclusive.
    pub fn with_bounds<F>(name: &str, min_args: usize, max_args: usize, function: F) -> Result<Self>
    where
        F: Fn(&FunctionContext) -> Result<f64> + Send + Sync + 'static,
    {
        if !util::is_valid_identifier_name(name) {
            return Err(Error::InvalidSymbolName(name.to_string()));
        }
        if min_args > max_args {
            return Err(Error::InvalidArity);
        }
        Ok(FunctionCallSite {
            name: name.to_string(),
            min_args,
            max_args,
            function: Arc::new(function),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the scanner should attempt to scan an argument list.
    pub fn supports_args(&self) -> bool {
        self.max_args > 0
    }

    /// Invokes the callback after validating the argument count.
    pub fn apply(&self, context: &FunctionContext) -> Result<f64> {
        let provided = context.size();
        if provided < self.min_args {
            return Err(Error::NotEnoughArguments {
                expected: self.min_args,
                got: provided,
            });
        }
        if provided > self.max_args {
            return Err(Error::TooManyArguments {
                max: self.max_args,
                got: provided,
            });
        }
        (self.function)(context)
    }
}

impl fmt::Debug for FunctionCallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionCallSite")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

/// The arguments of one function invocation, in call order.
///
/// Owned by a single invocation and discarded after the call returns.
#[derive(Debug, Default)]
pub struct FunctionContext {
    parameters: Vec<f64>,
}

impl FunctionContext {
    pub fn new() -> Self {
        FunctionContext::default()
    }

    pub fn size(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Appends an argument; should not be called once the callback runs.
    pub fn add(&mut self, value: f64) {
        self.parameters.push(value);
    }

    /// Returns the argument at `index`, bounds-checked.
    pub fn get_double(&self, index: usize) -> Result<f64> {
        self.parameters
            .get(index)
            .copied()
            .ok_or(Error::ArgumentOutOfBounds {
                index,
                size: self.size(),
            })
    }

    /// Returns the argument at `index` as an exact integer.
    pub fn get_int(&self, index: usize) -> Result<i32> {
        let value = self.get_double(index)?;
        let int_value = value as i32;
        if int_value as f64 != value {
            return Err(Error::NonIntegerArgument {
                ordinal: util::ordinal_name(index),
                value,
            });
        }
        Ok(int_value)
    }

    /// Like [`FunctionContext::get_int`], but also range-checks the value
    /// (both bounds inclusive).
    pub fn get_bounded_int(&self, index: usize, min: i32, max: i32) -> Result<i32> {
        let value = self.get_int(index)?;
        if value < min || value > max {
            return Err(Error::IntArgumentOutOfRange {
                min,
                max,
                ordinal: util::ordinal_name(index),
                value,
            });
        }
        Ok(value)
    }

    /// Shorthand for [`FunctionContext::get_bounded_int`] with a zero lower
    /// bound.
    pub fn get_unsigned_int(&self, index: usize, max: i32) -> Result<i32> {
        self.get_bounded_int(index, 0, max)
    }

    /// Returns the argument at `index`, range-checked (bounds inclusive).
    pub fn get_bounded_double(&self, index: usize, min: f64, max: f64) -> Result<f64> {
        let value = self.get_double(index)?;
        if value < min || value > max {
            return Err(Error::ArgumentOutOfRange {
                min,
                max,
                ordinal: util::ordinal_name(index),
                value,
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_of(values: &[f64]) -> FunctionContext {
        let mut context = FunctionContext::new();
        for value in values {
            context.add(*value);
        }
        context
    }

    #[test]
    fn test_constructor_validation() {
        assert!(FunctionCallSite::new("valid_name", 1, |ctx| ctx.get_double(0)).is_ok());
        assert_eq!(
            FunctionCallSite::new("1bad", 1, |_| Ok(0.0)).map(|_| ()),
            Err(Error::InvalidSymbolName("1bad".to_string()))
        );
        assert_eq!(
            FunctionCallSite::with_bounds("f", 3, 2, |_| Ok(0.0)).map(|_| ()),
            Err(Error::InvalidArity)
        );
    }

    #[test]
    fn test_arity_boundaries() {
        let site = FunctionCallSite::with_bounds("f", 1, 2, |ctx| ctx.get_double(0)).unwrap();

        assert_eq!(
            site.apply(&context_of(&[])),
            Err(Error::NotEnoughArguments {
                expected: 1,
                got: 0
            })
        );
        assert_eq!(site.apply(&context_of(&[1.0])), Ok(1.0));
        assert_eq!(site.apply(&context_of(&[1.0, 2.0])), Ok(1.0));
        assert_eq!(
            site.apply(&context_of(&[1.0, 2.0, 3.0])),
            Err(Error::TooManyArguments { max: 2, got: 3 })
        );
    }

    #[test]
    fn test_supports_args() {
        let nullary = FunctionCallSite::new("f", 0, |_| Ok(1.0)).unwrap();
        let unary = FunctionCallSite::new("g", 1, |ctx| ctx.get_double(0)).unwrap();
        assert!(!nullary.supports_args());
        assert!(unary.supports_args());
    }

    #[test]
    fn test_get_double_bounds_checked() {
        let context = context_of(&[1.5]);
        assert_eq!(context.get_double(0), Ok(1.5));
        assert_eq!(
            context.get_double(1),
            Err(Error::ArgumentOutOfBounds { index: 1, size: 1 })
        );
    }

    #[test]
    fn test_get_int_requires_exact_integer() {
        let context = context_of(&[2.0, 2.5]);
        assert_eq!(context.get_int(0), Ok(2));
        assert_eq!(
            context.get_int(1),
            Err(Error::NonIntegerArgument {
                ordinal: "second".to_string(),
                value: 2.5
            })
        );
    }

    #[test]
    fn test_bounded_accessors() {
        let context = context_of(&[5.0, -1.0]);
        assert_eq!(context.get_bounded_int(0, 0, 10), Ok(5));
        assert_eq!(
            context.get_bounded_int(1, 0, 10),
            Err(Error::IntArgumentOutOfRange {
                min: 0,
                max: 10,
                ordinal: "second".to_string(),
                value: -1
            })
        );
        assert_eq!(context.get_unsigned_int(0, 5), Ok(5));
        assert_eq!(
            context.get_bounded_double(1, 0.0, 1.0),
            Err(Error::ArgumentOutOfRange {
                min: 0.0,
                max: 1.0,
                ordinal: "second".to_string(),
                value: -1.0
            })
        );
    }

    #[test]
    fn test_context_grows() {
        let mut context = FunctionContext::new();
        for i in 0..100 {
            context.add(i as f64);
        }
        assert_eq!(context.size(), 100);
        assert_eq!(context.get_double(99), Ok(99.0));
    }
}
