use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("Out of range")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Key not found")]
    KeyNotFound,
}
