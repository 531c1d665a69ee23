use thiserror::Error;

/// Why a front-matter record was rejected. Every variant names the offending field when there is one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} exceeds {max} characters (found {len})")]
    TooLong { field: &'static str, max: usize, len: usize },

    #[error("{field} not a valid date: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("{field} is invalid: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("malformed front-matter: {0}")]
    Malformed(String),

    #[error("front-matter block is missing")]
    MissingFrontMatter,

    #[error("end of the front-matter block is missing")]
    UnclosedFrontMatter,
}

impl From<toml::de::Error> for ValidationError {
    fn from(value: toml::de::Error) -> Self {
        ValidationError::Malformed(value.to_string().trim_end().to_string())
    }
}

impl From<serde_yaml::Error> for ValidationError {
    fn from(value: serde_yaml::Error) -> Self {
        ValidationError::Malformed(value.to_string())
    }
}
