use std::fmt;

#[derive(Debug)]
pub enum VgenError {
    ConfigError(String),
    RequestError(String),
    ResponseError(String),
    RenderError(String),
    InternalError(String),
}

impl VgenError {
    /// The bare message carried by the error, without the category prefix.
    /// This is the text a controller surfaces to the user.
    pub fn message(&self) -> &str {
        match self {
            VgenError::ConfigError(msg)
            | VgenError::RequestError(msg)
            | VgenError::ResponseError(msg)
            | VgenError::RenderError(msg)
            | VgenError::InternalError(msg) => msg,
        }
    }
}

impl fmt::Display for VgenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VgenError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            VgenError::RequestError(msg) => write!(f, "Request error: {}", msg),
            VgenError::ResponseError(msg) => write!(f, "Response error: {}", msg),
            VgenError::RenderError(msg) => write!(f, "Render error: {}", msg),
            VgenError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for VgenError {}

pub type Result<T> = std::result::Result<T, VgenError>;
