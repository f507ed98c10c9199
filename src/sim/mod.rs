//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-driven only, with an explicit dt per update
//! - Seeded RNG only
//! - Stable iteration order (cells in canonical order, circles by placement)
//! - No rendering or platform dependencies

pub mod cell;
pub mod geometry;
pub mod level;
pub mod session;
pub mod terrain;

pub use cell::{AnimOutcome, Cell, CellAnim, CellId, CellKind, CellStats};
pub use geometry::{Circle, Rect};
pub use level::{Level, LevelEvent, LevelPhase, ValidatedCircle};
pub use session::GameSession;
pub use terrain::TerrainIndex;
