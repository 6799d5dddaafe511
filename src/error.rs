use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("Unknown project type: {0}")]
    UnknownProjectType(String),

    #[error("Unknown input '{key}' for project type '{project_type}'")]
    UnknownInput { project_type: String, key: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CalcError>;
