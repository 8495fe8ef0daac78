//! Fixed timestep timing for running ticks at a steady rate.

use instant::{Duration, Instant};

// time snapping technique from Tyler Glaiel's blog post
// https://medium.com/@tglaiel/how-to-make-your-game-run-at-60fps-24c61210fe75
const NANOS_120FPS: u128 = 1_000_000_000 / 120;
const NANOS_60FPS: u128 = 1_000_000_000 / 60;
const NANOS_30FPS: u128 = 1_000_000_000 / 30;
const NANOS_20FPS: u128 = 1_000_000_000 / 20;
const NANOS_15FPS: u128 = 1_000_000_000 / 15;
const SNAP_THRESHOLD: u128 = 200_000;

const MAX_ACC_VALUE: u128 = 1_000_000_000 / 8;

fn should_snap(dt: u128, target: u128) -> bool {
    if dt < target {
        target - dt < SNAP_THRESHOLD
    } else {
        dt - target < SNAP_THRESHOLD
    }
}

/// Turns elapsed wall clock time into a number of fixed-length ticks to run.
///
/// Leftover time carries over to the next call. Elapsed times very close to common
/// frame durations are treated as exact, and the carried time is capped so that
/// a slow stretch doesn't cause an ever-growing backlog of ticks.
///
/// # Example
/// ```
/// # use sweepframe::{TickClock, World};
/// let mut world = World::default();
/// let mut clock = TickClock::new(60);
/// for _ in 0..clock.advance(1_000_000_000 / 60) {
///     world.tick().expect("tick failed");
/// }
/// ```
#[derive(Clone, Debug)]
pub struct TickClock {
    nanos_per_tick: u128,
    acc: u128,
    last_poll: Option<Instant>,
}

impl TickClock {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            nanos_per_tick: 1_000_000_000 / u128::from(ticks_per_second.max(1)),
            acc: 0,
            last_poll: None,
        }
    }

    /// Length of one tick in seconds.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.nanos_per_tick as f64 / 1.0e9
    }

    /// Add elapsed time in nanoseconds and return how many ticks are due.
    pub fn advance(&mut self, elapsed_nanos: u128) -> u32 {
        let mut dt = elapsed_nanos;
        // if vsynced, pretend frame timing is exact (see blog post mentioned above).
        // leftover time is kept, ticks may be longer than frames
        for target in [
            NANOS_120FPS,
            NANOS_60FPS,
            NANOS_30FPS,
            NANOS_20FPS,
            NANOS_15FPS,
        ] {
            if should_snap(dt, target) {
                dt = target;
                break;
            }
        }

        self.acc += dt;
        // limit acc to prevent spiral of death,
        // but always leave room for the next tick at low tick rates
        let max_acc = MAX_ACC_VALUE.max(2 * self.nanos_per_tick);
        if self.acc > max_acc {
            self.acc = max_acc;
        }

        let ticks = self.acc / self.nanos_per_tick;
        self.acc %= self.nanos_per_tick;
        ticks as u32
    }

    /// Measure time since the last poll and return how many ticks are due.
    /// The first poll only starts the clock.
    pub fn poll(&mut self) -> u32 {
        let now = Instant::now();
        let ticks = match self.last_poll {
            Some(last) => self.advance(now.duration_since(last).as_nanos()),
            None => 0,
        };
        self.last_poll = Some(now);
        ticks
    }

    /// Time left until the next tick is due, useful for sleeping between polls.
    pub fn until_next_tick(&self) -> Duration {
        Duration::from_nanos((self.nanos_per_tick - self.acc) as u64)
    }
}
