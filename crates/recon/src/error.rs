use std::fmt;

/// Classified validation failure, surfaced verbatim to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInputKind {
    InvalidInput,
    EmptyInput,
    MissingField,
}

impl InvalidInputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::EmptyInput => "EMPTY_INPUT",
            Self::MissingField => "MISSING_FIELD",
        }
    }
}

impl fmt::Display for InvalidInputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which input list a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordList {
    Orders,
    Transactions,
}

impl RecordList {
    /// Plural list name, as in "orders must be an array".
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Transactions => "transactions",
        }
    }

    /// Singular record noun, as in "order at index 0".
    pub fn record_noun(&self) -> &'static str {
        match self {
            Self::Orders => "order",
            Self::Transactions => "transaction",
        }
    }
}

#[derive(Debug)]
pub enum MatchError {
    /// A list argument is not a list.
    InvalidInput { list: RecordList },
    /// Both lists are empty.
    EmptyInput,
    /// A record lacks a non-empty `orderId`.
    MissingField { list: RecordList, index: usize },
    /// A record could not be decoded (bad number, malformed row, etc.).
    RecordParse { list: RecordList, index: usize, message: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (weights out of range, etc.).
    ConfigValidation(String),
    /// IO / document-level decode error.
    Io(String),
}

impl MatchError {
    /// Validation kind, or `None` for errors outside the validator's taxonomy.
    pub fn kind(&self) -> Option<InvalidInputKind> {
        match self {
            Self::InvalidInput { .. } => Some(InvalidInputKind::InvalidInput),
            Self::EmptyInput => Some(InvalidInputKind::EmptyInput),
            Self::MissingField { .. } => Some(InvalidInputKind::MissingField),
            _ => None,
        }
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { list } => {
                write!(f, "INVALID_INPUT: {} must be an array", list.as_str())
            }
            Self::EmptyInput => {
                write!(f, "EMPTY_INPUT: both orders and transactions are empty")
            }
            Self::MissingField { list, index } => write!(
                f,
                "MISSING_FIELD: {} at index {index} is missing orderId",
                list.record_noun()
            ),
            Self::RecordParse { list, index, message } => write!(
                f,
                "{} at index {index}: {message}",
                list.record_noun()
            ),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for MatchError {}
