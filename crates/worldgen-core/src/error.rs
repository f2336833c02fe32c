//! Error taxonomy for the generation pipeline.

use thiserror::Error;

/// Errors that can abort a generation run.
///
/// A* exhaustion and over-clustered river seeds are deliberately absent here:
/// both are recoverable conditions the erosion stage handles inline (falling
/// back to a lake, skipping the seed) and only ever reach a `warn!` log.
#[derive(Debug, Error)]
pub enum WorldgenError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("tectonic driver failed: {0}")]
    TectonicDriver(String),

    #[error("index ({x}, {y}) out of bounds for {width}x{height} grid")]
    Bounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, WorldgenError>;
