//! Unified error types for tessera_engine

use thiserror::Error;

/// Main error type for engine operations
#[derive(Debug, Error)]
pub enum TesseraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Shader compilation failed: {log}")]
    ShaderCompile { log: String },

    #[error("Shader link failed: {log}")]
    ShaderLink { log: String },

    #[error("Invalid tile definition: {0}")]
    InvalidTile(#[from] serde_json::Error),
}

pub type EngineResult<T> = anyhow::Result<T>;
