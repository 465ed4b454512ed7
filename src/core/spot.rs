use serde::{Deserialize, Serialize};
use crate::core::identity::Identity;
use crate::errors::parking_error::ParkingError;

/// Read-only view of a spot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotMetadata {
    pub taken: bool,
    pub owner: Option<Identity>,
    pub acquire_timestamp: u64,
    pub release_timestamp: u64,
}

/// A single parking spot: free, or occupied by exactly one owner.
#[derive(Debug, Clone, Default)]
pub struct Spot {
    owner: Option<Identity>,
    acquire_timestamp: u64,
    release_timestamp: u64,
}

impl Spot {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_taken(&self) -> bool {
        self.owner.is_some()
    }

    pub fn owner(&self) -> Option<&Identity> {
        self.owner.as_ref()
    }

    // Does not check for a current owner; the lot only hands out free spots.
    pub fn acquire(&mut self, identity: Identity, now: u64) {
        self.owner = Some(identity);
        self.acquire_timestamp = now;
        self.release_timestamp = 0;
    }

    pub fn release(&mut self, identity: &Identity, now: u64) -> Result<(), ParkingError> {
        if self.owner.as_ref() != Some(identity) {
            return Err(ParkingError::NotOwner);
        }
        self.owner = None;
        self.acquire_timestamp = 0;
        self.release_timestamp = now;
        Ok(())
    }

    pub fn metadata(&self) -> SpotMetadata {
        SpotMetadata {
            taken: self.is_taken(),
            owner: self.owner.clone(),
            acquire_timestamp: self.acquire_timestamp,
            release_timestamp: self.release_timestamp,
        }
    }
}
