use crate::plane::Plane;
use crate::time::Time;

/// A single-plane parking slot. Slots live as long as the airport; only the
/// occupant comes and goes.
#[derive(Default)]
pub struct Bay {
    occupant: Option<Plane>,
    /// Claimed by a landing whose runway time has not elapsed yet. The slot
    /// must not be offered to another landing, but no plane is parked.
    reserved: bool,
    /// Park timestamp while occupied; the total occupation of the last
    /// occupant, frozen at unpark, while empty.
    stamp: Time,
    channel: usize,
}

impl Bay {
    pub fn new() -> Bay {
        Bay::default()
    }

    /// While occupied: time since the occupant parked. While empty: how long
    /// the last occupant stayed.
    pub fn occupation_time(&self, now: Time) -> Time {
        if self.occupant.is_some() {
            now - self.stamp
        } else {
            self.stamp
        }
    }

    pub fn is_free(&self) -> bool {
        self.occupant.is_none() && !self.reserved
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Claims the slot for a landing in progress.
    pub fn reserve(&mut self) {
        self.reserved = true;
    }

    /// The caller must know the slot is free; the airport's semaphore
    /// accounting guarantees it.
    pub fn park(&mut self, plane: Plane, channel: usize, now: Time) {
        self.occupant = Some(plane);
        self.reserved = false;
        self.stamp = now;
        self.channel = channel;
    }

    /// Removes the occupant, freezing `occupation_time` at the total time
    /// parked. Empty slots are left untouched.
    pub fn unpark(&mut self, now: Time) -> Option<Plane> {
        let plane = self.occupant.take()?;
        self.stamp = now - self.stamp;
        Some(plane)
    }

    pub fn occupant(&self) -> Option<&Plane> {
        self.occupant.as_ref()
    }

    pub fn channel(&self) -> usize {
        self.channel
    }
}
