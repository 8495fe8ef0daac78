//! Sweep-and-prune collision detection for large sets of moving axis-aligned rectangles.
//!
//! The entry point is [`World`][world::World], which owns the bodies and advances them
//! one tick at a time. Bodies can also live in a [`hecs`][hecs] world and be synced in
//! and out with a [`HecsSyncManager`][hecs_sync::HecsSyncManager].

// profiling span that is a no-op unless the `tracy` feature is enabled
macro_rules! tracy_span {
    ($name:literal, $fn_name:literal) => {
        tracy_client::Client::running()
            .map(|client| client.span_alloc(Some($name), $fn_name, file!(), line!(), 0))
    };
}

pub mod math;
pub use math::{uv, Axis, Vec2};

pub mod body;
pub use body::{Body, InvalidBody, Rect};

pub mod body_set;
pub use body_set::{BodyKey, BodySet};

pub mod collision;
pub use collision::{
    bounds::Bounds,
    response::Separation,
    sweep::{ActiveSet, SweepError},
    SweepAndPrune,
};

pub mod world;
pub use world::{ContactEvent, TickError, TickStats, World, WorldParams};

pub mod hecs_sync;
pub use hecs_sync::{Colliding, HecsSyncManager, HecsSyncOptions, Velocity};

pub mod spawner;
pub use spawner::{SpawnParams, Spawner};

pub mod clock;
pub use clock::TickClock;

// Re-exported hecs to guarantee versions match
pub use hecs;
