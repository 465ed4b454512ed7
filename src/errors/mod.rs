pub(crate) mod collection_error;
pub(crate) mod parking_error;
pub(crate) mod provider_request_error;
