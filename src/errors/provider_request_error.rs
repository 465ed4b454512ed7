use thiserror::Error;

#[derive(Debug, Error)]
#[error("Provider request failed with error: {message}")]
pub(crate) struct ProviderRequestError {
    message: String,
}

impl ProviderRequestError {
    pub fn new(msg: String) -> Self {
        Self {
            message: msg,
        }
    }
}
