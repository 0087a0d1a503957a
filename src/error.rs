use thiserror::Error;

/// Every way an expression can fail to evaluate.
///
/// All failures are synchronous and abort the whole parse; the engine never
/// returns partial results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // grammar violations
    #[error("unexpected character {0}")]
    UnexpectedChar(char),
    #[error("expected operator, got operand")]
    MisplacedOperand,
    #[error("expected operand, got operator")]
    MisplacedOperator,
    #[error("expected an operand")]
    ExpectedOperand,
    #[error("expected a number")]
    ExpectedNumber,
    #[error("expected a number before the decimal point")]
    MissingIntegerPart,
    #[error("expected the decimal part of a number")]
    MissingDecimalPart,
    #[error("expected another '=' for comparison")]
    IncompleteComparison,
    #[error("missing closing parenthesis")]
    MissingClosingParen,
    #[error("cannot solve an empty expression")]
    EmptyExpression,
    #[error("unexpected trailing operator")]
    TrailingOperator,

    // symbol errors
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),
    #[error("symbol {0} was already inserted")]
    DuplicateSymbol(String),
    #[error("invalid identifier name: {0}")]
    InvalidSymbolName(String),
    #[error("character {0} is not allowed in a symbol name")]
    InvalidSymbolChar(char),

    // function call errors
    #[error("missing opening parenthesis for function call {0}")]
    MissingFunctionOpenParen(String),
    #[error("missing closing parenthesis for function call {0}")]
    MissingFunctionCloseParen(String),
    #[error("did not expect any parameters for function {0}")]
    UnexpectedParameters(String),
    #[error("min_args must be less than or equal to max_args")]
    InvalidArity,
    #[error("not enough arguments provided (expected {expected}, got {got})")]
    NotEnoughArguments { expected: usize, got: usize },
    #[error("too many arguments provided (max {max}, got {got})")]
    TooManyArguments { max: usize, got: usize },

    #[error("rand bounds must satisfy min < max, got min {min} and max {max}")]
    EmptyRandomRange { min: f64, max: f64 },

    // numeric coercion errors
    #[error("an integer is required, got {0}")]
    IntegerRequired(f64),
    #[error("argument index {index} is out of bounds for {size} arguments")]
    ArgumentOutOfBounds { index: usize, size: usize },
    #[error("expected an integer as {ordinal} argument, got {value}")]
    NonIntegerArgument { ordinal: String, value: f64 },
    #[error("expected an integer between {min} and {max} as {ordinal} argument, got {value}")]
    IntArgumentOutOfRange {
        min: i32,
        max: i32,
        ordinal: String,
        value: i32,
    },
    #[error("expected a value between {min} and {max} as {ordinal} argument, got {value}")]
    ArgumentOutOfRange {
        min: f64,
        max: f64,
        ordinal: String,
        value: f64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
