use crate::{ops::Operator, value::Tag};

/// Result alias that carries the custom [`MultitypeError`] type.
pub type Result<T> = std::result::Result<T, MultitypeError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum MultitypeError {
    /// Free-form message, mostly used by the command line front-end.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON encoding and decoding errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Both operands must carry the same tag for ordering and arithmetic.
    #[error("cannot apply `{op}` to {lhs} and {rhs}")]
    TypeMismatch { op: Operator, lhs: Tag, rhs: Tag },
    /// The operator is not defined for this tag at all.
    #[error("`{op}` is not supported for {tag} values")]
    Unsupported { op: Operator, tag: Tag },
    #[error("division by zero on {tag} values")]
    DivisionByZero { tag: Tag },
    /// An option line that is not of the form `key = value`.
    #[error("line {line}: expected `key = value`, found `{content}`")]
    InvalidLine { line: usize, content: String },
    #[error("line {line}: option `{key}` is already defined")]
    DuplicateKey { line: usize, key: String },
    /// An integer outside the `i64` range of [`crate::Value::Int`].
    #[error("{value} does not fit in a 64-bit signed integer")]
    IntOutOfRange { value: String },
    /// An option that the `key = value` text format cannot express.
    #[error("option `{key}` cannot be written as text: {reason}")]
    Unrepresentable { key: String, reason: &'static str },
}

impl MultitypeError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for MultitypeError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for MultitypeError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
