pub(crate) mod provider_server;
