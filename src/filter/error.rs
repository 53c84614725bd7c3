use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid id \"{value}\"; expected a comma-separated list of integers.")]
    InvalidId { param: &'static str, value: String },

    #[error("Invalid value \"{value}\"; expected 0 or 1.")]
    InvalidFlag { param: &'static str, value: String },
}

impl FilterError {
    /// Query parameter the error refers to
    pub fn param(&self) -> &'static str {
        match self {
            FilterError::InvalidId { param, .. } => *param,
            FilterError::InvalidFlag { param, .. } => *param,
        }
    }
}
