use thiserror::Error;

/// Failure of a platform window call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("window class registration failed: {0}")]
    ClassRegistration(String),
    #[error("window creation failed: {0}")]
    WindowCreation(String),
    #[error("drawing surface unavailable: {0}")]
    Surface(String),
    #[error("setting window opacity failed: {0}")]
    Opacity(String),
    #[error("presenting frame failed: {0}")]
    Present(String),
    #[error("timer call failed: {0}")]
    Timer(String),
    #[error("window destruction failed: {0}")]
    Destroy(String),
    #[error("window handle is no longer valid")]
    InvalidWindow,
}

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("could not create overlay window: {0}")]
    Create(#[from] SurfaceError),
    #[error("invalid wall-clock time {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
