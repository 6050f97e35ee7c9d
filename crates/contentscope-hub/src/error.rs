//! Registry errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    /// An action with this name is already registered
    #[error("Action '{0}' is already registered")]
    DuplicateAction(String),

    /// No action with this name is registered
    #[error("Action '{0}' is not registered")]
    UnknownAction(String),
}

pub type HubResult<T> = std::result::Result<T, HubError>;
