use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("A polygon needs between {min} and {max} vertices, got {found}")]
    VertexCount {
        min: usize,
        max: usize,
        found: usize,
    },
}
