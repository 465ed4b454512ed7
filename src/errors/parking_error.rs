use thiserror::Error;
use crate::core::capability::Capability;
use crate::errors::collection_error::CollectionError;

/// Which pool operation ran into an empty pool; only changes the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Destroy,
    Acquire,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParkingError {
    #[error("{}", unauthorized_message(.0))]
    Unauthorized(Capability),
    #[error("{}", empty_pool_message(.0))]
    EmptyPool(Operation),
    #[error("No unoccupied parking spots")]
    NoFreeSpot,
    #[error("No parking spot on record")]
    NotFound,
    #[error("Only owner may release")]
    NotOwner,
    #[error("Caller already holds a parking spot")]
    AlreadyOccupant,
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

fn unauthorized_message(capability: &Capability) -> &'static str {
    match capability {
        Capability::CanCreate => "Only minter may create spot",
        Capability::CanDestroy => "Only burner may destroy spot",
    }
}

fn empty_pool_message(operation: &Operation) -> &'static str {
    match operation {
        Operation::Destroy => "No parking spots to remove",
        Operation::Acquire => "No parking spots to acquire",
    }
}
