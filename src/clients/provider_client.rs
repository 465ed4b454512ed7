use std::env;
use std::error::Error;
use std::sync::Arc;
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, Method};
use crate::config::{ClientConfig, Command};
use crate::core::identity::Identity;
use crate::core::lot::ParkingState;
use crate::core::spot::SpotMetadata;
use crate::errors::provider_request_error::ProviderRequestError;
use crate::server::provider_server::{SpotResponse, SpotsResponse, StateResponse, CALLER_HEADER};

#[async_trait]
pub(crate) trait ProviderInteractions {
    async fn create_spot(&self) -> Result<usize, Box<dyn Error>>;
    async fn destroy_spot(&self) -> Result<usize, Box<dyn Error>>;
    async fn acquire_spot(&self) -> Result<usize, Box<dyn Error>>;
    async fn release_spot(&self) -> Result<usize, Box<dyn Error>>;
    async fn get_spot_index(&self) -> Result<usize, Box<dyn Error>>;
    async fn get_parking_state(&self) -> Result<ParkingState, Box<dyn Error>>;
    async fn get_parking_spots(&self) -> Result<Vec<SpotMetadata>, Box<dyn Error>>;
}

/// Talks to a parking provider on behalf of a single caller.
pub(crate) struct ProviderClient {
    client: Arc<Client>,
    address: String,
    caller: Identity,
}

impl ProviderClient {
    pub fn new(client: Arc<Client>, address: String, caller: Identity) -> Self {
        Self {
            client,
            address,
            caller,
        }
    }

    async fn spot_call(&self, method: Method, path: &str) -> Result<usize, Box<dyn Error>> {
        let request_url = format!("{}/{}", self.address, path);
        debug!("{} {} as {}", method, request_url, self.caller);
        let resp = self.client
            .request(method, request_url)
            .header(CALLER_HEADER, self.caller.as_str())
            .send().await?;
        let data: SpotResponse = resp.json().await?;
        match data.get_index() {
            Some(index) if data.is_success() => Ok(index),
            _ => Err(Box::new(ProviderRequestError::new(data.get_msg()))),
        }
    }
}

#[async_trait]
impl ProviderInteractions for ProviderClient {
    async fn create_spot(&self) -> Result<usize, Box<dyn Error>> {
        self.spot_call(Method::POST, "spots").await
    }

    async fn destroy_spot(&self) -> Result<usize, Box<dyn Error>> {
        self.spot_call(Method::DELETE, "spots").await
    }

    async fn acquire_spot(&self) -> Result<usize, Box<dyn Error>> {
        self.spot_call(Method::POST, "acquire").await
    }

    async fn release_spot(&self) -> Result<usize, Box<dyn Error>> {
        self.spot_call(Method::POST, "release").await
    }

    async fn get_spot_index(&self) -> Result<usize, Box<dyn Error>> {
        self.spot_call(Method::GET, "spots/index").await
    }

    async fn get_parking_state(&self) -> Result<ParkingState, Box<dyn Error>> {
        let request_url = format!("{}/state", self.address);
        let resp = self.client.get(request_url).send().await?;
        let data: StateResponse = resp.json().await?;
        Ok(data.get_state())
    }

    async fn get_parking_spots(&self) -> Result<Vec<SpotMetadata>, Box<dyn Error>> {
        let request_url = format!("{}/spots", self.address);
        let resp = self.client.get(request_url).send().await?;
        let data: SpotsResponse = resp.json().await?;
        Ok(data.get_spots())
    }
}

async fn run_command(provider: &ProviderClient, command: Command) -> Result<String, Box<dyn Error>> {
    let out = match command {
        Command::Create => format!("created spot {}", provider.create_spot().await?),
        Command::Destroy => format!("destroyed spot {}", provider.destroy_spot().await?),
        Command::Acquire => format!("acquired spot {}", provider.acquire_spot().await?),
        Command::Release => format!("released spot {}", provider.release_spot().await?),
        Command::Index => format!("holding spot {}", provider.get_spot_index().await?),
        Command::State => {
            let state = provider.get_parking_state().await?;
            format!("free: {}, occupied: {}", state.free_spots, state.occupied_spots)
        }
        Command::Spots => serde_json::to_string_pretty(&provider.get_parking_spots().await?)?,
    };
    Ok(out)
}

#[tokio::main]
pub async fn main() {
    let args: Vec<String> = env::args().collect();
    let config = match ClientConfig::from_args(&args) {
        Some(config) => config,
        None => {
            error!("client mode needs --caller <id> and --cmd <create|destroy|acquire|release|state|spots|index>");
            return;
        }
    };
    let provider = ProviderClient::new(Arc::new(Client::new()), config.address, config.caller);
    match run_command(&provider, config.command).await {
        Ok(out) => {
            info!("{:?} succeeded", config.command);
            println!("{out}");
        }
        Err(e) => error!("{:?} failed: {}", config.command, e),
    }
}
