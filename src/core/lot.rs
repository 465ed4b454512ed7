use std::sync::Arc;
use log::warn;
use serde::{Deserialize, Serialize};
use crate::core::capability::{Capability, CapabilityCheck};
use crate::core::clock::Clock;
use crate::core::compact_list::CompactList;
use crate::core::events::{EventLog, ParkingEvent};
use crate::core::existence_map::{EraseSignal, ExistenceMap, InsertSignal};
use crate::core::identity::Identity;
use crate::core::spot::{Spot, SpotMetadata};
use crate::errors::parking_error::{Operation, ParkingError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingState {
    pub free_spots: usize,
    pub occupied_spots: usize,
}

/// The allocation core: a pool of spots plus the occupant -> index lookup.
///
/// Every mutation checks all of its preconditions before writing anything,
/// so a failed call leaves the lot untouched. `free + occupied` always equals
/// the pool length, and `occupants` holds exactly the owners of taken spots,
/// each pointing at the spot's current index.
pub struct ParkingLot {
    pool: CompactList<Spot>,
    occupants: ExistenceMap<Identity, usize>,
    free: usize,
    occupied: usize,
    capabilities: Arc<dyn CapabilityCheck>,
    clock: Arc<dyn Clock>,
    events: EventLog,
}

impl ParkingLot {
    pub fn new(capabilities: Arc<dyn CapabilityCheck>, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool: CompactList::new(),
            occupants: ExistenceMap::new(),
            free: 0,
            occupied: 0,
            capabilities,
            clock,
            events: EventLog::new(),
        }
    }

    pub fn create_spot(&mut self, caller: &Identity) -> Result<usize, ParkingError> {
        if !self.capabilities.can_create(caller) {
            warn!("{caller} tried to create a spot without the minter role");
            return Err(ParkingError::Unauthorized(Capability::CanCreate));
        }
        let index = self.pool.append(Spot::new());
        self.free += 1;
        self.events.emit(ParkingEvent::SpotCreated { index });
        Ok(index)
    }

    pub fn destroy_spot(&mut self, caller: &Identity) -> Result<usize, ParkingError> {
        if !self.capabilities.can_destroy(caller) {
            warn!("{caller} tried to destroy a spot without the burner role");
            return Err(ParkingError::Unauthorized(Capability::CanDestroy));
        }
        let index = self.first_free(Operation::Destroy)?;

        let (_, relocation) = self.pool.erase_at(index)?;
        self.free -= 1;
        self.events.emit(ParkingEvent::SpotDestroyed { index });

        // the formerly-last spot now sits at `index`; its owner must follow it.
        if let Some(relocation) = relocation {
            if let Some(owner) = self.pool.at(relocation.to)?.owner().cloned() {
                self.record_occupant(owner, relocation.to);
            }
        }
        Ok(index)
    }

    pub fn acquire_spot(&mut self, caller: &Identity) -> Result<usize, ParkingError> {
        let index = self.first_free(Operation::Acquire)?;
        if self.occupants.contains(caller) {
            warn!("{caller} already holds a spot, refusing a second one");
            return Err(ParkingError::AlreadyOccupant);
        }

        let now = self.clock.now();
        self.pool.at_mut(index)?.acquire(caller.clone(), now);
        self.record_occupant(caller.clone(), index);
        self.free -= 1;
        self.occupied += 1;
        self.events.emit(ParkingEvent::SpotAcquired { occupant: caller.clone(), index, at: now });
        Ok(index)
    }

    pub fn release_spot(&mut self, caller: &Identity) -> Result<usize, ParkingError> {
        let index = match self.occupants.get(caller) {
            Ok(index) => *index,
            Err(_) => {
                warn!("{caller} tried to release without a spot on record");
                return Err(ParkingError::NotFound);
            }
        };

        let now = self.clock.now();
        self.pool.at_mut(index)?.release(caller, now)?;
        let signal = self.occupants.erase(caller);
        self.emit_erase(caller, signal);
        self.free += 1;
        self.occupied -= 1;
        self.events.emit(ParkingEvent::SpotReleased { occupant: caller.clone(), index, at: now });
        Ok(index)
    }

    pub fn parking_state(&self) -> ParkingState {
        ParkingState { free_spots: self.free, occupied_spots: self.occupied }
    }

    pub fn parking_spots(&self) -> Vec<SpotMetadata> {
        self.pool.iter().map(Spot::metadata).collect()
    }

    pub fn spot_index(&self, caller: &Identity) -> Result<usize, ParkingError> {
        self.occupants.get(caller).copied().map_err(|_| ParkingError::NotFound)
    }

    pub fn events_since(&self, offset: usize) -> Vec<ParkingEvent> {
        self.events.since(offset).to_vec()
    }

    fn first_free(&self, operation: Operation) -> Result<usize, ParkingError> {
        if self.pool.length() == 0 {
            warn!("{:?} refused, no parking spots exist", operation);
            return Err(ParkingError::EmptyPool(operation));
        }
        if self.free == 0 {
            warn!("{:?} refused, all {} spots are occupied", operation, self.occupied);
            return Err(ParkingError::NoFreeSpot);
        }
        self.pool.position(|spot| !spot.is_taken()).ok_or(ParkingError::NoFreeSpot)
    }

    fn record_occupant(&mut self, occupant: Identity, index: usize) {
        let event = match self.occupants.insert_or_replace(occupant.clone(), index) {
            InsertSignal::Inserted => ParkingEvent::Inserted { occupant, index },
            InsertSignal::Replaced => ParkingEvent::Replaced { occupant, index },
        };
        self.events.emit(event);
    }

    fn emit_erase(&mut self, occupant: &Identity, signal: EraseSignal) {
        let occupant = occupant.clone();
        let event = match signal {
            EraseSignal::Erased => ParkingEvent::Erased { occupant },
            EraseSignal::NotErased => ParkingEvent::NotErased { occupant },
        };
        self.events.emit(event);
    }

    #[cfg(test)]
    fn pool_len(&self) -> usize {
        self.pool.length()
    }

    #[cfg(test)]
    fn occupant_count(&self) -> usize {
        self.occupants.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use rand::Rng;
    use crate::core::capability::{Capability, MockCapabilityCheck, RoleRegistry};
    use crate::core::clock::ManualClock;
    use crate::core::events::ParkingEvent;
    use crate::core::identity::Identity;
    use crate::core::lot::{ParkingLot, ParkingState};
    use crate::errors::parking_error::{Operation, ParkingError};

    fn admin() -> Identity {
        Identity::new("deployer")
    }

    fn new_lot() -> (ParkingLot, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let lot = ParkingLot::new(Arc::new(RoleRegistry::new().with_admin(admin())), clock.clone());
        (lot, clock)
    }

    fn assert_invariants(lot: &ParkingLot) {
        let state = lot.parking_state();
        let spots = lot.parking_spots();
        assert_eq!(lot.pool_len(), state.free_spots + state.occupied_spots);
        assert_eq!(state.free_spots, spots.iter().filter(|s| !s.taken).count());
        assert_eq!(state.occupied_spots, lot.occupant_count());
        for (index, spot) in spots.iter().enumerate() {
            if let Some(owner) = &spot.owner {
                assert_eq!(Ok(index), lot.spot_index(owner));
            }
        }
    }

    #[test]
    fn test_initial_state() {
        let (lot, _) = new_lot();
        assert_eq!(ParkingState { free_spots: 0, occupied_spots: 0 }, lot.parking_state());
        assert!(lot.parking_spots().is_empty());
    }

    #[test]
    fn test_acquire_and_release_single_spot() {
        let (mut lot, clock) = new_lot();
        let a = Identity::new("a");
        let b = Identity::new("b");

        lot.create_spot(&admin()).unwrap();
        assert_eq!(ParkingState { free_spots: 1, occupied_spots: 0 }, lot.parking_state());
        assert_eq!(1, lot.parking_spots().len());

        assert_eq!(Ok(0), lot.acquire_spot(&a));
        assert_eq!(ParkingState { free_spots: 0, occupied_spots: 1 }, lot.parking_state());
        assert_eq!(Ok(0), lot.spot_index(&a));
        assert_eq!(Err(ParkingError::NoFreeSpot), lot.acquire_spot(&b));

        clock.advance(4_000);
        assert_eq!(Ok(0), lot.release_spot(&a));
        assert_eq!(ParkingState { free_spots: 1, occupied_spots: 0 }, lot.parking_state());
        assert_eq!(Err(ParkingError::NotFound), lot.spot_index(&a));
        let spot = &lot.parking_spots()[0];
        assert_eq!(5_000, spot.release_timestamp);
        assert_eq!(0, spot.acquire_timestamp);
        assert_invariants(&lot);
    }

    #[test]
    fn test_destroy_relocates_occupant_index() {
        let (mut lot, _) = new_lot();
        let a = Identity::new("a");
        let b = Identity::new("b");

        lot.create_spot(&admin()).unwrap();
        lot.create_spot(&admin()).unwrap();
        lot.acquire_spot(&a).unwrap();
        lot.acquire_spot(&b).unwrap();
        assert_eq!(Err(ParkingError::NoFreeSpot), lot.destroy_spot(&admin()));

        lot.release_spot(&a).unwrap();
        assert_eq!(Ok(0), lot.destroy_spot(&admin()));
        // b's spot was last and has been swapped into slot 0.
        assert_eq!(Ok(0), lot.spot_index(&b));
        assert_eq!(Some(b.clone()), lot.parking_spots()[0].owner);
        assert_eq!(ParkingState { free_spots: 0, occupied_spots: 1 }, lot.parking_state());
        assert_eq!(Ok(0), lot.release_spot(&b));
        assert_invariants(&lot);
    }

    #[test]
    fn test_destroy_last_spot_needs_no_relocation() {
        let (mut lot, _) = new_lot();
        let a = Identity::new("a");
        lot.create_spot(&admin()).unwrap();
        lot.create_spot(&admin()).unwrap();
        lot.acquire_spot(&a).unwrap();
        let before = lot.events_since(0).len();
        assert_eq!(Ok(1), lot.destroy_spot(&admin()));
        assert_eq!(Ok(0), lot.spot_index(&a));
        assert_eq!(vec![ParkingEvent::SpotDestroyed { index: 1 }], lot.events_since(before));
    }

    #[test]
    fn test_lowest_free_index_is_picked() {
        let (mut lot, _) = new_lot();
        let users: Vec<Identity> = (0..4).map(|i| Identity::new(format!("user-{i}"))).collect();
        for user in &users {
            lot.create_spot(&admin()).unwrap();
            lot.acquire_spot(user).unwrap();
        }
        assert_eq!(Ok(2), lot.release_spot(&users[2]));
        assert_eq!(Ok(1), lot.release_spot(&users[1]));

        let late = Identity::new("late");
        assert_eq!(Ok(1), lot.acquire_spot(&late));
        assert_eq!(Ok(2), lot.destroy_spot(&admin()));
        // user-3's spot was last and now fills slot 2.
        assert_eq!(Ok(2), lot.spot_index(&users[3]));
        assert_eq!(Some(users[3].clone()), lot.parking_spots()[2].owner);
        assert_eq!(ParkingState { free_spots: 0, occupied_spots: 3 }, lot.parking_state());
        assert_invariants(&lot);
    }

    #[test]
    fn test_empty_pool() {
        let (mut lot, _) = new_lot();
        assert_eq!(Err(ParkingError::EmptyPool(Operation::Destroy)), lot.destroy_spot(&admin()));
        assert_eq!(Err(ParkingError::EmptyPool(Operation::Acquire)), lot.acquire_spot(&Identity::new("a")));
    }

    #[test]
    fn test_release_without_spot() {
        let (mut lot, _) = new_lot();
        lot.create_spot(&admin()).unwrap();
        assert_eq!(Err(ParkingError::NotFound), lot.release_spot(&Identity::new("nobody")));
        assert_eq!(ParkingState { free_spots: 1, occupied_spots: 0 }, lot.parking_state());
    }

    #[test]
    fn test_second_acquire_is_refused() {
        let (mut lot, _) = new_lot();
        let a = Identity::new("a");
        lot.create_spot(&admin()).unwrap();
        lot.create_spot(&admin()).unwrap();
        lot.acquire_spot(&a).unwrap();
        assert_eq!(Err(ParkingError::AlreadyOccupant), lot.acquire_spot(&a));
        assert_eq!(ParkingState { free_spots: 1, occupied_spots: 1 }, lot.parking_state());
        assert_invariants(&lot);
    }

    #[test]
    fn test_unauthorized_callers_change_nothing() {
        let mut capabilities = MockCapabilityCheck::new();
        capabilities.expect_can_create().returning(|id| id.as_str() == "minter");
        capabilities.expect_can_destroy().returning(|_| false);
        let mut lot = ParkingLot::new(Arc::new(capabilities), Arc::new(ManualClock::new(1)));
        let user = Identity::new("user");

        assert_eq!(Err(ParkingError::Unauthorized(Capability::CanCreate)), lot.create_spot(&user));
        assert!(lot.parking_spots().is_empty());

        lot.create_spot(&Identity::new("minter")).unwrap();
        let events = lot.events_since(0).len();
        assert_eq!(Err(ParkingError::Unauthorized(Capability::CanDestroy)), lot.destroy_spot(&user));
        assert_eq!(ParkingState { free_spots: 1, occupied_spots: 0 }, lot.parking_state());
        assert_eq!(events, lot.events_since(0).len());
    }

    #[test]
    fn test_acquire_emits_occupant_signals() {
        let (mut lot, _) = new_lot();
        let a = Identity::new("a");
        lot.create_spot(&admin()).unwrap();
        lot.acquire_spot(&a).unwrap();
        lot.release_spot(&a).unwrap();
        assert_eq!(
            vec![
                ParkingEvent::SpotCreated { index: 0 },
                ParkingEvent::Inserted { occupant: a.clone(), index: 0 },
                ParkingEvent::SpotAcquired { occupant: a.clone(), index: 0, at: 1_000 },
                ParkingEvent::Erased { occupant: a.clone() },
                ParkingEvent::SpotReleased { occupant: a, index: 0, at: 1_000 },
            ],
            lot.events_since(0)
        );
    }

    #[test]
    fn test_random_operations_hold_invariants() {
        let (mut lot, clock) = new_lot();
        let users: Vec<Identity> = (0..8).map(|i| Identity::new(format!("user-{i}"))).collect();
        let mut rng = rand::thread_rng();

        for _ in 0..2_000 {
            clock.advance(rng.gen_range(0..3));
            let user = &users[rng.gen_range(0..users.len())];
            let before = lot.parking_state();
            let result = match rng.gen_range(0..4) {
                0 => lot.create_spot(&admin()),
                1 => lot.destroy_spot(&admin()),
                2 => lot.acquire_spot(user),
                _ => lot.release_spot(user),
            };
            if result.is_err() {
                assert_eq!(before, lot.parking_state());
            }
            assert_invariants(&lot);
        }
    }
}
