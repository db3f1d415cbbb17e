use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollapseError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown initial condition: {0}")]
    UnsupportedProfile(String),

    #[error("Unsupported coordinate system: {0}")]
    UnsupportedCoordSystem(String),

    #[error("Lapse rescaling can only be inverted for phantom fields (epsilon = -1), got epsilon = {epsilon}")]
    InvalidRescaling { epsilon: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CollapseResult<T> = Result<T, CollapseError>;
