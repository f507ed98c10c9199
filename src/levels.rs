//! Built-in level data and tutorial text
//!
//! Levels are authored as character grids, one char per grid coordinate:
//! `n` normal, `b` blocker, `o` bonus, `d` doubler, `p` pacifier,
//! `t` thorn, `e` ember, `.` empty. Multi-unit cells are appended
//! explicitly since they cover several coordinates.

use serde::{Deserialize, Serialize};

use crate::sim::cell::CellKind;

/// Number of built-in levels
pub const LEVEL_COUNT: usize = 5;

/// Placement of one cell on the level grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSpec {
    pub x: i32,
    pub y: i32,
    /// Footprint edge in grid units
    pub size: i32,
    pub kind: CellKind,
}

impl CellSpec {
    pub fn new(x: i32, y: i32, kind: CellKind) -> Self {
        Self { x, y, size: 1, kind }
    }

    pub fn sized(x: i32, y: i32, size: i32, kind: CellKind) -> Self {
        Self { x, y, size, kind }
    }
}

/// A complete level description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    /// Zero-based level number
    pub number: usize,
    /// Grid unit edge in pixels
    pub cell_size: i32,
    /// Base circle budget
    pub max_circles: u32,
    /// Ascending point thresholds, 1 to 3; the first gates completion and
    /// the last is the gold medal
    pub required_points: Vec<f32>,
    pub cells: Vec<CellSpec>,
}

impl LevelData {
    /// Sanity check used by tests and by debug builds on load
    pub fn is_valid(&self) -> bool {
        !self.cells.is_empty()
            && (1..=3).contains(&self.required_points.len())
            && self.required_points.windows(2).all(|w| w[0] < w[1])
            && self.max_circles >= 1
            && self
                .cells
                .iter()
                .all(|c| c.x >= 0 && c.y >= 0 && c.size >= 1)
    }
}

pub(crate) fn parse_rows(rows: &[&str]) -> Vec<CellSpec> {
    let mut cells = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let kind = match ch {
                'n' => CellKind::Normal,
                'b' => CellKind::Blocker,
                'o' => CellKind::Bonus,
                'd' => CellKind::Doubler,
                'p' => CellKind::Pacifier,
                't' => CellKind::Thorn,
                'e' => CellKind::Ember,
                _ => continue,
            };
            cells.push(CellSpec::new(x as i32, y as i32, kind));
        }
    }
    cells
}

/// A plain square to learn growing and releasing on
fn open_field() -> LevelData {
    LevelData {
        number: 0,
        cell_size: 64,
        max_circles: 3,
        required_points: vec![100.0],
        cells: parse_rows(&["nnnn", "nnnn", "nnnn", "nnnn"]),
    }
}

/// A blocker wall splits the field; circles must fit each side
fn split_wall() -> LevelData {
    LevelData {
        number: 1,
        cell_size: 64,
        max_circles: 3,
        required_points: vec![120.0, 210.0],
        cells: parse_rows(&[
            "nnbnnn",
            "nnbnon",
            "nnbbnn",
            "onnbnn",
            "nnnbnn",
        ]),
    }
}

/// Two islands with a doubler each; the gap keeps one circle per island
fn twin_islands() -> LevelData {
    LevelData {
        number: 2,
        cell_size: 56,
        max_circles: 2,
        required_points: vec![150.0, 280.0, 420.0],
        cells: parse_rows(&[
            "nnn..nnn",
            "ndn..nnn",
            "nnn..ndn",
            "nnn..nnn",
        ]),
    }
}

/// A thorn cluster around its pacifier
fn thorn_garden() -> LevelData {
    LevelData {
        number: 3,
        cell_size: 64,
        max_circles: 4,
        required_points: vec![180.0, 280.0, 380.0],
        cells: parse_rows(&[
            "nnnnnnn",
            "ntttnnn",
            "ntpnnnn",
            "nttnnnn",
            "nnnnnnn",
        ]),
    }
}

/// Embers behind a wall plus a double-size doubler
fn ember_vault() -> LevelData {
    let mut cells = parse_rows(&[
        "nnnbnnnn",
        "neebn..n",
        "nepbn..n",
        "neebnnnn",
        "nnnbbnnn",
        "onnnnnno",
    ]);
    cells.push(CellSpec::sized(5, 1, 2, CellKind::Doubler));
    LevelData {
        number: 4,
        cell_size: 64,
        max_circles: 5,
        required_points: vec![250.0, 380.0, 500.0],
        cells,
    }
}

/// Built-in level lookup; None past the campaign's end
pub fn get_level(number: usize) -> Option<LevelData> {
    let data = match number {
        0 => open_field(),
        1 => split_wall(),
        2 => twin_islands(),
        3 => thorn_garden(),
        4 => ember_vault(),
        _ => return None,
    };
    Some(data)
}

/// Tutorial lines shown over the first levels
pub fn tutorials_for(number: usize) -> &'static [&'static str] {
    const TUTORIALS: [&[&str]; 3] = [
        &[
            "Press and hold on the grid to grow a circle",
            "Release to capture every cell the circle encloses",
        ],
        &[
            "Dark blocker cells stop a growing circle cold",
            "Click a placed circle to take it back",
        ],
        &["A pacifier tames every thorn connected to it"],
    ];
    TUTORIALS.get(number).copied().unwrap_or(&[])
}
