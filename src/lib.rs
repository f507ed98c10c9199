//! Encircle - a circle-growing puzzle game about capturing cells
//!
//! Core modules:
//! - `sim`: Deterministic gameplay simulation (cells, terrain, circle growth)
//! - `levels`: Built-in level data and tutorial text
//! - `audio`: Sound event queue drained by the embedding host
//! - `medals`: Gold-medal record with JSON persistence

pub mod audio;
pub mod levels;
pub mod medals;
pub mod sim;

pub use audio::{AudioEvent, AudioQueue, Sound};
pub use levels::{CellSpec, LevelData};
pub use medals::MedalLedger;
pub use sim::{GameSession, Level, LevelEvent, LevelPhase};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Logical screen dimensions
    pub const WIDTH: f32 = 1280.0;
    pub const HEIGHT: f32 = 720.0;
    /// Top band reserved for score and tutorial text
    pub const GAME_Y_OFFSET: f32 = 96.0;

    /// Temp circle growth per second is GROWTH_FACTOR times the larger of
    /// GROWTH_REF_CELL_SIZE and the level's biggest cell footprint
    pub const GROWTH_FACTOR: f32 = 1.5;
    pub const GROWTH_REF_CELL_SIZE: f32 = 64.0;
    /// Circles released below this fraction of the cell size are discarded
    pub const MIN_VALID_RADIUS_RATIO: f32 = 0.4;

    /// Capture pop: stagger spread across a circle's cells, pop duration
    pub const CAPTURE_STAGGER: f32 = 0.35;
    pub const CAPTURE_DURATION: f32 = 0.25;
    /// Grace period after a qualifying settle before the level completes
    pub const COMPLETION_COUNTDOWN: f32 = 0.4;

    /// Cell fly-in/fly-out: spawn distance past the screen edge
    pub const OFFSCREEN_DISTANCE: f32 = WIDTH / 2.0 + 150.0;
    /// Fly speed ranges in pixels/second
    pub const LOAD_SPEED_MIN: f32 = 3300.0;
    pub const LOAD_SPEED_MAX: f32 = 3900.0;
    pub const UNLOAD_SPEED_MIN: f32 = 2400.0;
    pub const UNLOAD_SPEED_MAX: f32 = 3000.0;
    /// Per-component jitter added to the outward direction on load/unload
    pub const DIRECTION_JITTER: f32 = 0.1;
}
