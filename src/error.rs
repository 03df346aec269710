use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Network unreachable, DNS failure, or timeout. Retried only when the
    /// operator retries; prior screen data stays visible.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server-side failure (5xx or a failure envelope without a 4xx status).
    #[error("API error: {0}")]
    Api(String),

    /// Server-reported rejection (4xx with a message). Shown inline next to
    /// the triggering action or form.
    #[error("{message}")]
    Validation { message: String },

    /// Response body did not match the expected envelope shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A dispatch for this action and target is already in flight.
    #[error("'{kind}' already in flight for '{target}'")]
    DispatchInFlight { kind: String, target: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid action kind '{0}'")]
    InvalidActionKind(String),

    #[error("invalid sort direction '{0}'")]
    InvalidSortDirection(String),

    #[error("invalid segment: {0}")]
    InvalidSegment(String),

    #[error("invalid export format '{0}'")]
    InvalidExportFormat(String),

    #[error("invalid severity '{0}'")]
    InvalidSeverity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl ConsoleError {
    pub fn invalid_action_kind(s: String) -> Self {
        ConsoleError::InvalidActionKind(s)
    }

    pub fn invalid_sort_direction(s: String) -> Self {
        ConsoleError::InvalidSortDirection(s)
    }

    pub fn invalid_export_format(s: String) -> Self {
        ConsoleError::InvalidExportFormat(s)
    }

    pub fn invalid_severity(s: String) -> Self {
        ConsoleError::InvalidSeverity(s)
    }

    /// Human-readable message for the operator, with a generic fallback
    /// when the server omitted one.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Validation { message } if !message.is_empty() => message.clone(),
            ConsoleError::Transport(_) => "The server could not be reached. Try again.".to_string(),
            ConsoleError::Api(message) if !message.is_empty() => message.clone(),
            _ => "The operation failed. Try again.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_passthrough() {
        let err = ConsoleError::Validation {
            message: "locked".to_string(),
        };
        assert_eq!(err.user_message(), "locked");
        assert_eq!(err.to_string(), "locked");
    }

    #[test]
    fn test_empty_validation_falls_back() {
        let err = ConsoleError::Validation {
            message: String::new(),
        };
        assert_eq!(err.user_message(), "The operation failed. Try again.");
    }

    #[test]
    fn test_api_message_passthrough() {
        let err = ConsoleError::Api("upstream exploded".to_string());
        assert_eq!(err.user_message(), "upstream exploded");
    }

    #[test]
    fn test_dispatch_in_flight_display() {
        let err = ConsoleError::DispatchInFlight {
            kind: "approve".to_string(),
            target: "W123".to_string(),
        };
        assert_eq!(err.to_string(), "'approve' already in flight for 'W123'");
    }
}
