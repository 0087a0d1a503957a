use crate::error::{Error, Result};

const COMMON_POWERS_OF_TEN: [f64; 10] = [
    1.0,
    10.0,
    100.0,
    1_000.0,
    10_000.0,
    100_000.0,
    1_000_000.0,
    10_000_000.0,
    100_000_000.0,
    1_000_000_000.0,
];

const COMMON_ORDINAL_NAMES: [&str; 10] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
];

pub fn power_of_ten(exponent: u32) -> f64 {
    match COMMON_POWERS_OF_TEN.get(exponent as usize) {
        Some(power) => *power,
        None => 10f64.powi(exponent as i32),
    }
}

/// Ordinal word for a zero-based argument index, used in error messages.
pub fn ordinal_name(index: usize) -> String {
    match COMMON_ORDINAL_NAMES.get(index) {
        Some(name) => (*name).to_string(),
        None => format!("{}th", index + 1),
    }
}

/// Coerces a double into an `i32`, failing if that would lose precision.
pub fn require_int(x: f64) -> Result<i32> {
    let int_val = x as i32;
    if int_val as f64 != x {
        return Err(Error::IntegerRequired(x));
    }
    Ok(int_val)
}

pub fn bool_to_double(x: bool) -> f64 {
    if x {
        1.0
    } else {
        0.0
    }
}

pub fn double_to_bool(x: f64) -> bool {
    x != 0.0
}

pub fn bool_not(x: f64) -> f64 {
    bool_to_double(x == 0.0)
}

pub fn bool_and(a: f64, b: f64) -> f64 {
    bool_to_double(a != 0.0 && b != 0.0)
}

pub fn bool_or(a: f64, b: f64) -> f64 {
    bool_to_double(a != 0.0 || b != 0.0)
}

pub fn is_identifier_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

pub fn is_identifier_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

pub fn is_valid_identifier_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        Some(&first) if is_identifier_start(first) => {
            bytes[1..].iter().all(|&c| is_identifier_char(c))
        }
        _ => false,
    }
}

pub fn gcd(a: i32, b: i32) -> i32 {
    gcd_u32(a.unsigned_abs(), b.unsigned_abs()) as i32
}

pub fn lcm(a: i32, b: i32) -> i32 {
    if a == 0 || b == 0 {
        return 0;
    }
    let (a, b) = (a.unsigned_abs(), b.unsigned_abs());
    (a / gcd_u32(a, b) * b) as i32
}

fn gcd_u32(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let tmp = b;
        b = a % b;
        a = tmp;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_int() {
        assert_eq!(require_int(4.0), Ok(4));
        assert_eq!(require_int(-4.0), Ok(-4));
        assert_eq!(require_int(4.5), Err(Error::IntegerRequired(4.5)));
    }

    #[test]
    fn test_ordinal_names() {
        assert_eq!(ordinal_name(0), "first");
        assert_eq!(ordinal_name(9), "tenth");
        assert_eq!(ordinal_name(10), "11th");
    }

    #[test]
    fn test_identifier_names() {
        assert!(is_valid_identifier_name("sin"));
        assert!(is_valid_identifier_name("_private"));
        assert!(is_valid_identifier_name("a_00__1"));
        assert!(is_valid_identifier_name("xA3"));
        assert!(!is_valid_identifier_name(""));
        assert!(!is_valid_identifier_name("1abc"));
        assert!(!is_valid_identifier_name("has space"));
        assert!(!is_valid_identifier_name("kebab-case"));
    }

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(-12, 18), 6);
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(lcm(4, 6), 12);
        assert_eq!(lcm(0, 5), 0);
        assert_eq!(lcm(-4, 6), 12);
    }
}
