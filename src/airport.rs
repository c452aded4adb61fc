use crate::bay::Bay;
use crate::plane::Plane;
use crate::sync::Semaphore;
use crate::time::Clock;
use colored::Colorize;
use rand::Rng;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;
use tabled::Tabled;

pub const DEFAULT_BAYS: usize = 10;

/// Runway and wait times. Tests run with zero runway times and short waits.
#[derive(Clone, Copy)]
pub struct Durations {
    /// Time a landing plane occupies the runway.
    pub landing: Duration,
    /// Time a departing plane occupies the runway.
    pub takeoff: Duration,
    /// Bound on waiting for a free or occupied bay before giving up.
    pub wait: Duration,
}

impl Default for Durations {
    fn default() -> Durations {
        Durations {
            landing: Duration::from_millis(2000),
            takeoff: Duration::from_millis(2000),
            wait: Duration::from_millis(5000),
        }
    }
}

/// Fixed-capacity airport: a pre-allocated table of bays behind one lock,
/// with two counting semaphores tracking free and occupied slots.
///
/// The lock covers only bay-table mutation and the snapshot read, never the
/// simulated runway times, so landings and take-offs in different bays
/// proceed concurrently.
pub struct Airport {
    name: String,
    bays: Mutex<Vec<Bay>>,
    capacity: usize,
    free: Semaphore,
    occupied: Semaphore,
    clock: Clock,
    durations: Durations,
}

#[derive(Tabled)]
pub struct BayReport {
    #[tabled(rename = "bay")]
    pub nr: usize,
    #[tabled(rename = "occupant")]
    pub occupant: String,
    #[tabled(rename = "parked for")]
    pub parked_for: String,
    #[tabled(rename = "channel")]
    pub channel: String,
}

/// One consistent observation of every bay, taken under the bay-table lock.
pub struct AirportState {
    pub name: String,
    pub bays: Vec<BayReport>,
}

impl Airport {
    pub fn new(name: &str, capacity: usize, durations: Durations) -> Airport {
        Airport {
            name: name.to_string(),
            bays: Mutex::new((0..capacity).map(|_| Bay::new()).collect()),
            capacity,
            free: Semaphore::new(capacity),
            occupied: Semaphore::new(0),
            clock: Clock::new(),
            durations,
        }
    }

    fn lock_bays(&self) -> MutexGuard<'_, Vec<Bay>> {
        self.bays.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.occupied.value() == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.free.value() == self.capacity
    }

    /// Free slots as accounted by the semaphore.
    pub fn free_slots(&self) -> usize {
        self.free.value()
    }

    /// Bays currently holding a plane.
    pub fn occupied_count(&self) -> usize {
        self.lock_bays().iter().filter(|b| b.is_occupied()).count()
    }

    /// Lands a new plane in a random free bay. When no slot frees up within
    /// the wait bound the attempt is dropped without side effects; that is
    /// backpressure, not an error. Returns whether a landing happened.
    pub fn land_plane(&self, rng: &mut impl Rng, channel: usize) -> bool {
        if !self.free.acquire_timeout(self.durations.wait) {
            return false;
        }
        let plane = Plane::new(rng);
        println!("Plane {} is landing ...", plane.name().cyan());

        let nr = {
            let mut bays = self.lock_bays();
            let nr = random_free_bay(rng, &bays);
            bays[nr].reserve();
            nr
        };

        thread::sleep(self.durations.landing);

        let name = plane.name().to_string();
        {
            let mut bays = self.lock_bays();
            bays[nr].park(plane, channel, self.clock.now());
        }
        println!("Plane {} parked in bay {}.", name.cyan(), nr);

        self.occupied.post();
        if self.is_full() {
            println!("{}", "The airport is full".yellow().bold());
        }
        true
    }

    /// Takes a random parked plane off. Same bounded wait and silent-drop
    /// policy as `land_plane`. Returns whether a take-off happened.
    pub fn takeoff_plane(&self, rng: &mut impl Rng) -> bool {
        if !self.occupied.acquire_timeout(self.durations.wait) {
            return false;
        }

        let (nr, plane, stayed) = {
            let mut bays = self.lock_bays();
            let now = self.clock.now();
            loop {
                let nr = rng.gen_range(0..bays.len());
                if let Some(plane) = bays[nr].unpark(now) {
                    break (nr, plane, bays[nr].occupation_time(now));
                }
            }
        };
        println!(
            "After staying at bay {} for {}, plane {} is taking off ...",
            nr,
            stayed,
            plane.name().cyan()
        );

        thread::sleep(self.durations.takeoff);
        println!("Plane {} has finished taking off.", plane.name().cyan());
        drop(plane);

        self.free.post();
        if self.is_empty() {
            println!("{}", "The airport is empty".green().bold());
        }
        true
    }

    /// Reports every bay at one consistent instant. Shares the bay-table
    /// lock with the mutating operations, so a bay is never read
    /// mid-transition.
    pub fn snapshot(&self) -> AirportState {
        let bays = self.lock_bays();
        let now = self.clock.now();
        let reports = bays
            .iter()
            .enumerate()
            .map(|(nr, bay)| match bay.occupant() {
                Some(plane) => BayReport {
                    nr,
                    occupant: plane.name().to_string(),
                    parked_for: bay.occupation_time(now).to_string(),
                    channel: bay.channel().to_string(),
                },
                None => BayReport {
                    nr,
                    occupant: "empty".to_string(),
                    parked_for: "-".to_string(),
                    channel: "-".to_string(),
                },
            })
            .collect();
        AirportState {
            name: self.name.clone(),
            bays: reports,
        }
    }
}

/// Rejection-samples a free slot. The semaphore accounting guarantees one
/// exists whenever this runs; for a ten-bay airport the expected number of
/// draws is small.
fn random_free_bay(rng: &mut impl Rng, bays: &[Bay]) -> usize {
    loop {
        let nr = rng.gen_range(0..bays.len());
        if bays[nr].is_free() {
            return nr;
        }
    }
}
