use thiserror::Error;

/// The main error type for Apex task operations
#[derive(Debug, Error)]
pub enum ApexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration not found: {0}")]
    ConfigNotFound(String),

    #[error("no tasks defined")]
    NoTasksDefined,

    #[error("task not defined: \"{0}\"")]
    TaskNotFound(String),

    #[error("Command '{command}' aborted with exit code: {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("unknown runner '{runner}' for task '{task}'")]
    UnknownRunner { task: String, runner: String },

    #[error("Circular task dependency detected: {0}")]
    CycleDetected(String),

    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

impl ApexError {
    /// Process exit code the hosting CLI should terminate with
    pub fn exit_code(&self) -> i32 {
        match self {
            ApexError::CommandFailed { code, .. } => *code,
            _ => 1,
        }
    }
}

/// Result type alias for Apex operations
pub type ApexResult<T> = Result<T, ApexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_is_forwarded_for_failed_commands() {
        let err = ApexError::CommandFailed {
            command: "exit 7".to_string(),
            code: 7,
        };
        assert_eq!(err.exit_code(), 7);
        assert_eq!(err.to_string(), "Command 'exit 7' aborted with exit code: 7");
    }

    #[test]
    fn test_other_errors_use_generic_exit_code() {
        assert_eq!(ApexError::NoTasksDefined.exit_code(), 1);
        assert_eq!(ApexError::TaskNotFound("lint".to_string()).exit_code(), 1);
        assert_eq!(
            ApexError::TaskNotFound("lint".to_string()).to_string(),
            "task not defined: \"lint\""
        );
    }
}
