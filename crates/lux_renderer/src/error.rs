//! Errors raised by the renderer.
//!
//! Misses and the depth limit are ordinary terminal states of the
//! integrator and never show up here.

use thiserror::Error;

/// Errors that can occur while rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("hit on primitive {index} has no resolvable surface")]
    InvalidGeometry { index: usize },

    #[error("surface of primitive {index} has no material")]
    InvalidMaterial { index: usize },

    #[error("invalid render options: {0}")]
    InvalidOptions(String),

    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("render cancelled")]
    Cancelled,
}

pub type RenderResult<T> = Result<T, RenderError>;
