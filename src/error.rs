use thiserror::Error;

/// Reasons a rota run refuses to start.
///
/// Every variant is raised during validation, before any grid is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RotaError {
    #[error("roster is empty: at least one employee is required")]
    EmptyRoster,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl RotaError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        RotaError::InvalidConfiguration(message.into())
    }

    /// Short machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            RotaError::EmptyRoster => "EMPTY_ROSTER",
            RotaError::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
        }
    }
}

pub type Result<T> = std::result::Result<T, RotaError>;
