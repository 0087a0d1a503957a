//! The default symbol catalogue.
//!
//! This is configuration layered on top of the engine, not part of its
//! contract: everything here goes through the same public [`ExecutionEnv`]
//! insert calls available to callers.

use rand::Rng;

use crate::error::{Error, Result};
use crate::symbol::ExecutionEnv;
use crate::util;

/// Registers the default functions and constants into `env`.
pub fn register(env: &mut ExecutionEnv) -> Result<()> {
    // trigonometric
    env.insert_unary("sin", f64::sin)?;
    env.insert_unary("cos", f64::cos)?;
    env.insert_unary("tan", f64::tan)?;
    env.insert_unary("asin", f64::asin)?;
    env.insert_unary("acos", f64::acos)?;
    env.insert_unary("atan", f64::atan)?;
    env.insert_unary("sinh", f64::sinh)?;
    env.insert_unary("cosh", f64::cosh)?;
    env.insert_unary("tanh", f64::tanh)?;

    env.insert_unary("sqrt", f64::sqrt)?;
    env.insert_unary("cbrt", f64::cbrt)?;
    env.insert_binary("pow", f64::powf)?;
    env.insert_unary("log", f64::ln)?;
    env.insert_unary("rad", f64::to_radians)?;
    env.insert_unary("floor", f64::floor)?;
    env.insert_unary("ceil", f64::ceil)?;
    env.insert_unary("abs", f64::abs)?;
    env.insert_unary("int", f64::trunc)?;

    // boolean
    env.insert_binary("and", util::bool_and)?;
    env.insert_binary("nand", |a, b| util::bool_not(util::bool_and(a, b)))?;
    env.insert_binary("or", util::bool_or)?;
    env.insert_binary("nor", |a, b| util::bool_not(util::bool_or(a, b)))?;
    env.insert_binary("xor", |a, b| {
        util::bool_to_double((a != 0.0) ^ (b != 0.0))
    })?;
    env.insert_binary("xnor", |a, b| {
        util::bool_to_double((a != 0.0) == (b != 0.0))
    })?;
    env.insert_unary("not", util::bool_not)?;
    env.insert_unary("bool", |x| util::bool_to_double(x != 0.0))?;

    // constants
    env.insert_variable("pi", std::f64::consts::PI)?;
    env.insert_variable("e", std::f64::consts::E)?;
    env.insert_variable("true", 1.0)?;
    env.insert_variable("false", 0.0)?;

    // variadic aggregates
    env.insert_function("min", 2, usize::MAX, |ctx| {
        let mut min = ctx.get_double(0)?;
        for i in 1..ctx.size() {
            min = min.min(ctx.get_double(i)?);
        }
        Ok(min)
    })?;
    env.insert_function("max", 2, usize::MAX, |ctx| {
        let mut max = ctx.get_double(0)?;
        for i in 1..ctx.size() {
            max = max.max(ctx.get_double(i)?);
        }
        Ok(max)
    })?;
    env.insert_function("avg", 2, usize::MAX, |ctx| {
        let mut sum = 0.0;
        for i in 0..ctx.size() {
            sum += ctx.get_double(i)?;
        }
        Ok(sum / ctx.size() as f64)
    })?;
    env.insert_function("sum", 2, usize::MAX, |ctx| {
        let mut sum = 0.0;
        for i in 0..ctx.size() {
            sum += ctx.get_double(i)?;
        }
        Ok(sum)
    })?;

    env.insert_function("round", 1, 2, |ctx| {
        let value = ctx.get_double(0)?;
        if ctx.size() == 1 {
            return Ok(value.round());
        }
        let places = ctx.get_unsigned_int(1, 9)?;
        let factor = util::power_of_ten(places as u32);
        Ok((value * factor).round() / factor)
    })?;

    env.insert_function("rand", 0, 2, |ctx| {
        let (min, max) = match ctx.size() {
            0 => (0.0, 1.0),
            1 => (0.0, ctx.get_double(0)?),
            _ => (ctx.get_double(0)?, ctx.get_double(1)?),
        };
        // also rejects NaN bounds
        if !(min < max) {
            return Err(Error::EmptyRandomRange { min, max });
        }
        Ok(rand::rng().random_range(min..max))
    })?;

    env.insert_function("gcd", 2, 2, |ctx| {
        Ok(util::gcd(ctx.get_int(0)?, ctx.get_int(1)?) as f64)
    })?;
    env.insert_function("lcm", 2, 2, |ctx| {
        Ok(util::lcm(ctx.get_int(0)?, ctx.get_int(1)?) as f64)
    })?;

    Ok(())
}
