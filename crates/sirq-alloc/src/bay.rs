//! The fixed pool of charging bays.

use sirq_core::{BayId, SirqError, Tick, TruckId};

use crate::{AllocError, AllocResult};

/// Occupancy of one bay.  The occupant only exists inside `Occupied`, so a
/// free bay can never carry a stale occupant reference.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum BayState {
    #[default]
    Free,
    Occupied {
        /// Back-reference for lookup only; the bay does not own the truck.
        occupant:   TruckId,
        release_at: Tick,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Bay {
    pub id:    BayId,
    pub state: BayState,
}

impl Bay {
    #[inline]
    pub fn is_free(&self) -> bool {
        self.state == BayState::Free
    }

    #[inline]
    pub fn occupant(&self) -> Option<TruckId> {
        match self.state {
            BayState::Free => None,
            BayState::Occupied { occupant, .. } => Some(occupant),
        }
    }
}

/// All bays of one station, allocated once per run.
#[derive(Clone, Debug)]
pub struct BayPool {
    bays: Vec<Bay>,
}

impl BayPool {
    /// Create `count` free bays with ids `0..count`.
    pub fn new(count: u16) -> AllocResult<Self> {
        if count == 0 {
            return Err(SirqError::Config("bay pool needs at least one bay".to_owned()).into());
        }
        let bays = (0..count).map(|i| Bay { id: BayId(i), state: BayState::Free }).collect();
        Ok(Self { bays })
    }

    pub fn len(&self) -> usize {
        self.bays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bays.is_empty()
    }

    pub fn get(&self, bay: BayId) -> AllocResult<&Bay> {
        self.bays.get(bay.index()).ok_or(AllocError::UnknownBay(bay))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bay> {
        self.bays.iter()
    }

    /// Lowest-numbered free bay, if any.
    pub fn first_free(&self) -> Option<BayId> {
        self.bays.iter().find(|b| b.is_free()).map(|b| b.id)
    }

    pub fn free_count(&self) -> usize {
        self.bays.iter().filter(|b| b.is_free()).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.bays.len() - self.free_count()
    }

    /// Mark `bay` occupied by `truck` until `release_at`.
    pub fn occupy(&mut self, bay: BayId, truck: TruckId, release_at: Tick) -> AllocResult<()> {
        let slot = self.bays.get_mut(bay.index()).ok_or(AllocError::UnknownBay(bay))?;
        if let BayState::Occupied { occupant, .. } = slot.state {
            return Err(AllocError::BayOccupied { bay, occupant });
        }
        slot.state = BayState::Occupied { occupant: truck, release_at };
        Ok(())
    }

    /// Free `bay`, returning the truck that was charging there.
    pub fn release(&mut self, bay: BayId) -> AllocResult<TruckId> {
        let slot = self.bays.get_mut(bay.index()).ok_or(AllocError::UnknownBay(bay))?;
        match slot.state {
            BayState::Free => Err(AllocError::BayNotOccupied(bay)),
            BayState::Occupied { occupant, .. } => {
                slot.state = BayState::Free;
                Ok(occupant)
            }
        }
    }
}
