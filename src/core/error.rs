use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,

    ValidationInvalidArgument,

    ProjectExists,

    PromptNonInteractive,
    PromptFailed,

    OutputRenderFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::ProjectExists => "project.exists",

            ErrorCode::PromptNonInteractive => "prompt.non_interactive",
            ErrorCode::PromptFailed => "prompt.failed",

            ErrorCode::OutputRenderFailed => "output.render_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectExistsDetails {
    pub root_dir: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDetails {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFailedDetails {
    pub format: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let problem = problem.into();
        Self::new(
            ErrorCode::ValidationInvalidArgument,
            format!("Invalid argument: {}", problem),
            to_details(InvalidArgumentDetails {
                field: field.into(),
                problem,
                tried,
            }),
        )
    }

    /// A local app project already lives at (or above) the directory being initialized.
    pub fn project_exists(root_dir: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ProjectExists,
            "A project already exists",
            to_details(ProjectExistsDetails {
                root_dir: root_dir.into(),
            }),
        )
        .with_hint("Run the command from a directory outside of the existing app project")
    }

    pub fn prompt_non_interactive(prompt: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::PromptNonInteractive,
            "Cannot prompt for input without an interactive terminal",
            to_details(PromptDetails {
                prompt: prompt.into(),
                error: None,
            }),
        )
        .with_hint("Provide the value with a command-line flag instead")
    }

    pub fn prompt_failed(prompt: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::PromptFailed,
            "Failed to read prompt answer",
            to_details(PromptDetails {
                prompt: prompt.into(),
                error: Some(error.into()),
            }),
        )
    }

    pub fn render_failed(format: impl Into<String>, error: impl Into<String>) -> Self {
        let error = error.into();
        Self::new(
            ErrorCode::OutputRenderFailed,
            format!("Failed to render output: {}", error),
            to_details(RenderFailedDetails {
                format: format.into(),
                error,
            }),
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            to_details(ConfigInvalidJsonDetails {
                path: path.into(),
                error: err.to_string(),
            }),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalIoError,
            "IO error",
            to_details(InternalIoErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            to_details(InternalJsonErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    pub fn is_prompt_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::PromptNonInteractive | ErrorCode::PromptFailed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_exists_carries_root_dir_and_hint() {
        let err = Error::project_exists("/work/app");

        assert_eq!(err.code.as_str(), "project.exists");
        assert_eq!(err.details["rootDir"], "/work/app");
        assert_eq!(err.hints.len(), 1);
    }

    #[test]
    fn prompt_errors_are_classified() {
        assert!(Error::prompt_non_interactive("App Name").is_prompt_error());
        assert!(Error::prompt_failed("App Name", "eof").is_prompt_error());
        assert!(!Error::internal_unexpected("boom").is_prompt_error());
    }

    #[test]
    fn prompt_failed_omits_nothing_it_was_given() {
        let err = Error::prompt_failed("Secret Value", "stream closed");

        assert_eq!(err.details["prompt"], "Secret Value");
        assert_eq!(err.details["error"], "stream closed");
    }

    #[test]
    fn render_failed_message_includes_cause() {
        let err = Error::render_failed("json", "key must be a string");

        assert_eq!(err.code, ErrorCode::OutputRenderFailed);
        assert!(err.message.contains("key must be a string"));
    }
}
