use std::path::PathBuf;
use std::process::ExitCode;

/// Errors that cause template-sync to exit with a specific code.
#[derive(Debug, thiserror::Error)]
pub enum ExitError {
    #[error("config error: {0}")]
    Config(String),

    /// Non-success response from the template API. Displays the raw body.
    #[error("{body}")]
    Api { status: u16, body: String },

    #[error("'{}' does not follow expected naming format", path.display())]
    NamingFormat { path: PathBuf },

    #[error("'{}' has an invalid template id {segment:?}", path.display())]
    InvalidTemplateId { path: PathBuf, segment: String },

    #[error(
        "More than one file references the same template: '{}' and '{}' reference template #{id}",
        first.display(),
        second.display()
    )]
    DuplicateTemplate {
        first: PathBuf,
        second: PathBuf,
        id: u64,
    },
}

impl ExitError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ExitError::Config(_) => ExitCode::from(2),
            ExitError::Api { .. }
            | ExitError::NamingFormat { .. }
            | ExitError::InvalidTemplateId { .. }
            | ExitError::DuplicateTemplate { .. } => ExitCode::FAILURE,
        }
    }
}
