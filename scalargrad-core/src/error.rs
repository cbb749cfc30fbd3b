use thiserror::Error;

/// Custom error type for the ScalarGrad library.
#[derive(Error, Debug, PartialEq, Eq, Clone)] // PartialEq for easier testing
pub enum ScalarGradError {
    #[error("Shape mismatch: expected {expected} inputs, got {actual} during operation {operation}")]
    ShapeMismatch {
        expected: usize,
        actual: usize,
        operation: String,
    },

    #[error("Cannot write through a non-leaf node during operation {operation}")]
    NotLeaf { operation: String },

    #[error("Network has no trainable structure: {reason}")]
    EmptyNetwork { reason: String },
}
