use thiserror::Error;

/// Errors surfaced by the domain services.
///
/// The REST layer maps each variant to exactly one HTTP status; messages are
/// safe to echo to the client (no credentials, hashes, or tokens).
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required field is missing or malformed (HTTP 400)
    #[error("{0}")]
    Validation(String),

    /// Login failed because the password did not match (HTTP 401)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The resource does not exist, where that is an error (HTTP 404)
    #[error("{0}")]
    NotFound(String),

    /// A child with this name is already registered and the caller chose
    /// the reject policy (HTTP 409)
    #[error("Child {0} is already registered")]
    DuplicateChild(String),

    /// The persistence layer failed (HTTP 500, generic message to clients)
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_client_safe() {
        let err = DomainError::Validation("babyName and dateOfBirth are required".to_string());
        assert_eq!(err.to_string(), "babyName and dateOfBirth are required");

        let err = DomainError::DuplicateChild("Ada".to_string());
        assert_eq!(err.to_string(), "Child Ada is already registered");
    }
}
