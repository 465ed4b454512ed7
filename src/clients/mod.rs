pub(crate) mod provider_client;
