use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("surface ({width}x{height}) does not provide a 2D drawing context")]
    NoDrawingContext { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, EngineError>;
