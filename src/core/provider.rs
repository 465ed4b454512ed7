use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;
use crate::core::capability::CapabilityCheck;
use crate::core::clock::Clock;
use crate::core::events::ParkingEvent;
use crate::core::identity::Identity;
use crate::core::lot::{ParkingLot, ParkingState};
use crate::core::spot::SpotMetadata;
use crate::errors::parking_error::ParkingError;

#[async_trait]
pub trait SpotInteractions {
    async fn create_spot(&self, caller: &Identity) -> Result<usize, ParkingError>;
    async fn destroy_spot(&self, caller: &Identity) -> Result<usize, ParkingError>;
    async fn acquire_spot(&self, caller: &Identity) -> Result<usize, ParkingError>;
    async fn release_spot(&self, caller: &Identity) -> Result<usize, ParkingError>;
}

#[async_trait]
pub trait StateInteractions {
    async fn get_parking_state(&self) -> ParkingState;
    async fn get_parking_spots(&self) -> Vec<SpotMetadata>;
    async fn get_spot_index(&self, caller: &Identity) -> Result<usize, ParkingError>;
    async fn get_events(&self, offset: usize) -> Vec<ParkingEvent>;
}

/// Shared handle to a parking lot. Writers are serialized by the lock and
/// readers always see a whole mutation or none of it.
pub struct ParkingProvider {
    lot: RwLock<ParkingLot>,
}

impl ParkingProvider {
    pub fn new(capabilities: Arc<dyn CapabilityCheck>, clock: Arc<dyn Clock>) -> Self {
        Self {
            lot: RwLock::new(ParkingLot::new(capabilities, clock)),
        }
    }
}

#[async_trait]
impl SpotInteractions for ParkingProvider {
    async fn create_spot(&self, caller: &Identity) -> Result<usize, ParkingError> {
        self.lot.write().await.create_spot(caller)
    }

    async fn destroy_spot(&self, caller: &Identity) -> Result<usize, ParkingError> {
        self.lot.write().await.destroy_spot(caller)
    }

    async fn acquire_spot(&self, caller: &Identity) -> Result<usize, ParkingError> {
        self.lot.write().await.acquire_spot(caller)
    }

    async fn release_spot(&self, caller: &Identity) -> Result<usize, ParkingError> {
        self.lot.write().await.release_spot(caller)
    }
}

#[async_trait]
impl StateInteractions for ParkingProvider {
    async fn get_parking_state(&self) -> ParkingState {
        self.lot.read().await.parking_state()
    }

    async fn get_parking_spots(&self) -> Vec<SpotMetadata> {
        self.lot.read().await.parking_spots()
    }

    async fn get_spot_index(&self, caller: &Identity) -> Result<usize, ParkingError> {
        self.lot.read().await.spot_index(caller)
    }

    async fn get_events(&self, offset: usize) -> Vec<ParkingEvent> {
        self.lot.read().await.events_since(offset)
    }
}
