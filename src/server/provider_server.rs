use std::env;
use std::sync::Arc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use warp::{Filter, Rejection, Reply};
use crate::config::ProviderConfig;
use crate::core::clock::SystemClock;
use crate::core::events::ParkingEvent;
use crate::core::identity::Identity;
use crate::core::lot::ParkingState;
use crate::core::provider::{ParkingProvider, SpotInteractions, StateInteractions};
use crate::core::spot::SpotMetadata;
use crate::errors::parking_error::ParkingError;

pub(crate) const CALLER_HEADER: &str = "x-caller";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct SpotResponse {
    success: bool,
    message: String,
    index: Option<usize>,
}

impl SpotResponse {
    pub fn is_success(&self) -> bool { self.success }
    pub fn get_index(&self) -> Option<usize> { self.index }
    pub fn get_msg(&self) -> String { self.message.clone() }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct StateResponse {
    success: bool,
    message: String,
    state: ParkingState,
}

impl StateResponse {
    pub fn get_state(&self) -> ParkingState { self.state }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct SpotsResponse {
    success: bool,
    message: String,
    spots: Vec<SpotMetadata>,
}

impl SpotsResponse {
    pub fn get_spots(&self) -> Vec<SpotMetadata> { self.spots.clone() }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct EventsResponse {
    success: bool,
    message: String,
    events: Vec<ParkingEvent>,
}

fn spot_reply(result: Result<usize, ParkingError>, done: &str) -> warp::reply::Json {
    let resp = match result {
        Ok(index) => SpotResponse {
            success: true,
            message: done.to_string(),
            index: Some(index),
        },
        Err(e) => SpotResponse {
            success: false,
            message: e.to_string(),
            index: None,
        },
    };
    debug!("spot request -> {:?}", resp);
    warp::reply::json(&resp)
}

fn with_caller() -> impl Filter<Extract=(Identity, ), Error=Rejection> + Clone {
    warp::header::<String>(CALLER_HEADER).map(Identity::new)
}

async fn handle_create(caller: Identity, provider: Arc<ParkingProvider>) -> Result<impl Reply, Rejection> {
    Ok(spot_reply(provider.create_spot(&caller).await, "Parking spot created"))
}

async fn handle_destroy(caller: Identity, provider: Arc<ParkingProvider>) -> Result<impl Reply, Rejection> {
    Ok(spot_reply(provider.destroy_spot(&caller).await, "Parking spot destroyed"))
}

async fn handle_acquire(caller: Identity, provider: Arc<ParkingProvider>) -> Result<impl Reply, Rejection> {
    Ok(spot_reply(provider.acquire_spot(&caller).await, "Parking spot acquired"))
}

async fn handle_release(caller: Identity, provider: Arc<ParkingProvider>) -> Result<impl Reply, Rejection> {
    Ok(spot_reply(provider.release_spot(&caller).await, "Parking spot released"))
}

async fn handle_index(caller: Identity, provider: Arc<ParkingProvider>) -> Result<impl Reply, Rejection> {
    Ok(spot_reply(provider.get_spot_index(&caller).await, "Parking spot found"))
}

async fn handle_state(provider: Arc<ParkingProvider>) -> Result<impl Reply, Rejection> {
    let resp = StateResponse {
        success: true,
        message: "Parking state".to_string(),
        state: provider.get_parking_state().await,
    };
    Ok(warp::reply::json(&resp))
}

async fn handle_spots(provider: Arc<ParkingProvider>) -> Result<impl Reply, Rejection> {
    let resp = SpotsResponse {
        success: true,
        message: "Parking spots".to_string(),
        spots: provider.get_parking_spots().await,
    };
    Ok(warp::reply::json(&resp))
}

async fn handle_events(offset: usize, provider: Arc<ParkingProvider>) -> Result<impl Reply, Rejection> {
    let resp = EventsResponse {
        success: true,
        message: "Parking events".to_string(),
        events: provider.get_events(offset).await,
    };
    Ok(warp::reply::json(&resp))
}

pub(crate) fn routes(provider: Arc<ParkingProvider>) -> impl Filter<Extract=(impl Reply, ), Error=Rejection> + Clone {
    let provider_filter = warp::any().map(move || Arc::clone(&provider));

    // POST /spots
    let route_create = warp::path("spots")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_caller())
        .and(provider_filter.clone())
        .and_then(handle_create);

    // DELETE /spots
    let route_destroy = warp::path("spots")
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_caller())
        .and(provider_filter.clone())
        .and_then(handle_destroy);

    let route_spots = warp::path("spots")
        .and(warp::path::end())
        .and(warp::get())
        .and(provider_filter.clone())
        .and_then(handle_spots);

    let route_index = warp::path!("spots" / "index")
        .and(warp::get())
        .and(with_caller())
        .and(provider_filter.clone())
        .and_then(handle_index);

    let route_acquire = warp::path("acquire")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_caller())
        .and(provider_filter.clone())
        .and_then(handle_acquire);

    let route_release = warp::path("release")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_caller())
        .and(provider_filter.clone())
        .and_then(handle_release);

    let route_state = warp::path("state")
        .and(warp::path::end())
        .and(warp::get())
        .and(provider_filter.clone())
        .and_then(handle_state);

    let route_events = warp::path!("events" / usize)
        .and(warp::get())
        .and(provider_filter.clone())
        .and_then(handle_events);

    route_create
        .or(route_destroy)
        .or(route_spots)
        .or(route_index)
        .or(route_acquire)
        .or(route_release)
        .or(route_state)
        .or(route_events)
}

#[tokio::main]
pub async fn main() {
    let args: Vec<String> = env::args().collect();
    let config = ProviderConfig::from_args(&args);
    debug!("provider config = {:?}", config);

    let provider = Arc::new(ParkingProvider::new(Arc::new(config.roles()), Arc::new(SystemClock)));

    info!("Starting parking provider at :{}", config.port);
    warp::serve(routes(provider)).run(([127, 0, 0, 1], config.port)).await;
}
