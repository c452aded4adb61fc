use crate::airport::Airport;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct SimConfig {
    /// Chance (percent) that a landing worker attempts a landing each tick.
    pub landing_prob: u8,
    /// Chance (percent) that a take-off worker attempts a take-off each tick.
    pub takeoff_prob: u8,
    pub landing_workers: usize,
    pub takeoff_workers: usize,
    pub tick: Duration,
}

impl Default for SimConfig {
    fn default() -> SimConfig {
        SimConfig {
            landing_prob: 50,
            takeoff_prob: 50,
            landing_workers: 15,
            takeoff_workers: 5,
            tick: Duration::from_millis(500),
        }
    }
}

/// Landing and take-off workers running against one shared airport.
///
/// Workers poll the shutdown flag at the top of every iteration; an operation
/// already past its bounded wait runs to completion, only the next iteration
/// is skipped. `join` returns once every worker has exited, so the airport
/// outlives all of them.
pub struct Simulation {
    shutdown: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl Simulation {
    pub fn start(airport: Arc<Airport>, config: SimConfig) -> Simulation {
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut workers = Vec::with_capacity(config.landing_workers + config.takeoff_workers);

        for channel in 0..config.landing_workers {
            let airport = airport.clone();
            let shutdown = shutdown.clone();
            let (prob, tick) = (config.landing_prob, config.tick);
            workers.push(thread::spawn(move || {
                let mut rng = rand::thread_rng();
                while !shutdown.load(Ordering::Relaxed) {
                    if rng.gen_ratio(prob as u32, 100) {
                        airport.land_plane(&mut rng, channel);
                    }
                    // Second poll point: an attempt may have spent the whole
                    // bounded wait, so don't add a tick on top of it.
                    if shutdown.load(Ordering::Relaxed) {
                        break;
                    }
                    thread::sleep(tick);
                }
            }));
        }

        for _ in 0..config.takeoff_workers {
            let airport = airport.clone();
            let shutdown = shutdown.clone();
            let (prob, tick) = (config.takeoff_prob, config.tick);
            workers.push(thread::spawn(move || {
                let mut rng = rand::thread_rng();
                while !shutdown.load(Ordering::Relaxed) {
                    if rng.gen_ratio(prob as u32, 100) {
                        airport.takeoff_plane(&mut rng);
                    }
                    if shutdown.load(Ordering::Relaxed) {
                        break;
                    }
                    thread::sleep(tick);
                }
            }));
        }

        Simulation { shutdown, workers }
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Waits for every worker to observe the shutdown flag and exit.
    pub fn join(self) {
        for worker in self.workers {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airport::Durations;

    fn fast_airport(capacity: usize) -> Arc<Airport> {
        Arc::new(Airport::new(
            "SIM",
            capacity,
            Durations {
                landing: Duration::ZERO,
                takeoff: Duration::ZERO,
                wait: Duration::from_millis(20),
            },
        ))
    }

    #[test]
    fn test_single_bay_fills_and_stays_full() {
        let airport = fast_airport(1);
        let sim = Simulation::start(
            airport.clone(),
            SimConfig {
                landing_prob: 90,
                takeoff_prob: 1,
                landing_workers: 2,
                takeoff_workers: 0,
                tick: Duration::from_millis(5),
            },
        );

        thread::sleep(Duration::from_millis(300));
        assert!(airport.is_full());
        assert_eq!(1, airport.occupied_count());
        assert_eq!(0, airport.free_slots());

        // Landing attempts against the full airport keep timing out.
        assert!(!airport.land_plane(&mut rand::thread_rng(), 9));
        assert_eq!(1, airport.occupied_count());

        sim.request_shutdown();
        sim.join();
    }

    #[test]
    fn test_shutdown_stops_all_workers() {
        let airport = fast_airport(3);
        let sim = Simulation::start(
            airport.clone(),
            SimConfig {
                landing_prob: 50,
                takeoff_prob: 50,
                landing_workers: 4,
                takeoff_workers: 2,
                tick: Duration::from_millis(5),
            },
        );

        thread::sleep(Duration::from_millis(100));
        sim.request_shutdown();
        // Returns only after every worker has exited its loop.
        sim.join();

        let occupied = airport.occupied_count();
        assert!(occupied <= airport.capacity());
        assert_eq!(airport.capacity(), occupied + airport.free_slots());
    }

    #[test]
    fn test_shutdown_during_takeoff_delay_completes_the_takeoff() {
        let airport = Arc::new(Airport::new(
            "SIM",
            1,
            Durations {
                landing: Duration::ZERO,
                takeoff: Duration::from_millis(100),
                wait: Duration::from_millis(50),
            },
        ));
        assert!(airport.land_plane(&mut rand::thread_rng(), 0));

        let started = std::time::Instant::now();
        let sim = Simulation::start(
            airport.clone(),
            SimConfig {
                landing_prob: 100,
                takeoff_prob: 100,
                landing_workers: 0,
                takeoff_workers: 1,
                tick: Duration::from_secs(5),
            },
        );

        // The bay empties the moment the take-off claims its plane; from
        // then on the worker is inside its 100ms runway sleep.
        while airport.occupied_count() == 1 {
            thread::sleep(Duration::from_millis(5));
        }
        sim.request_shutdown();
        sim.join();

        // The in-flight take-off ran to completion and posted its unit.
        assert!(airport.is_empty());
        assert_eq!(1, airport.free_slots());
        assert_eq!(0, airport.occupied_count());
        // The worker saw the flag right after the operation instead of
        // sleeping out a full tick first.
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_workers_idle_when_probability_never_fires() {
        let airport = fast_airport(2);
        let sim = Simulation::start(
            airport.clone(),
            SimConfig {
                landing_prob: 1,
                takeoff_prob: 1,
                landing_workers: 0,
                takeoff_workers: 0,
                tick: Duration::from_millis(5),
            },
        );
        thread::sleep(Duration::from_millis(50));
        assert!(airport.is_empty());
        sim.request_shutdown();
        sim.join();
    }
}
