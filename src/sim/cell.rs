//! Cells: terrain units, their kinds, and per-cell animation state
//!
//! A cell occupies a square block of grid coordinates and never moves; the
//! fly-in, fly-out and capture pops are tracked in an explicit [`CellAnim`]
//! record while the authoritative rect stays put.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Index of a cell in its level's cell list
pub type CellId = usize;

/// The closed set of cell kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    /// Plain capturable cell
    Normal,
    /// Cannot be captured; a growing circle that grazes it validates at once
    Blocker,
    /// Grants an extra circle to the budget when it settles
    Bonus,
    /// Doubles the points of every cell captured by the same circle
    Doubler,
    /// Pacifies every connected pacifiable cell when it settles
    Pacifier,
    /// Hostile; destroys a circle that swallows it. Pacifies into Flower
    Thorn,
    /// Pacified thorn, worth extra points
    Flower,
    /// Hostile; pacifies into Moss
    Ember,
    /// Pacified ember
    Moss,
}

/// Static per-kind properties
#[derive(Debug, Clone, Copy)]
pub struct CellStats {
    /// Whether a circle may capture this cell
    pub selectable: bool,
    /// Factor applied to the points of the whole capturing circle
    pub multiplier: f32,
    /// Extra circles granted to the budget on settle
    pub bonus_circles: u32,
    /// Base point value
    pub points: f32,
}

impl CellKind {
    pub fn stats(&self) -> CellStats {
        match self {
            CellKind::Normal => CellStats {
                selectable: true,
                multiplier: 1.0,
                bonus_circles: 0,
                points: 10.0,
            },
            CellKind::Blocker => CellStats {
                selectable: false,
                multiplier: 1.0,
                bonus_circles: 0,
                points: 0.0,
            },
            CellKind::Bonus => CellStats {
                selectable: true,
                multiplier: 1.0,
                bonus_circles: 1,
                points: 10.0,
            },
            CellKind::Doubler => CellStats {
                selectable: true,
                multiplier: 2.0,
                bonus_circles: 0,
                points: 5.0,
            },
            CellKind::Pacifier => CellStats {
                selectable: true,
                multiplier: 1.0,
                bonus_circles: 0,
                points: 10.0,
            },
            CellKind::Thorn => CellStats {
                selectable: false,
                multiplier: 1.0,
                bonus_circles: 0,
                points: 0.0,
            },
            CellKind::Flower => CellStats {
                selectable: true,
                multiplier: 1.0,
                bonus_circles: 0,
                points: 20.0,
            },
            CellKind::Ember => CellStats {
                selectable: false,
                multiplier: 1.0,
                bonus_circles: 0,
                points: 0.0,
            },
            CellKind::Moss => CellStats {
                selectable: true,
                multiplier: 1.0,
                bonus_circles: 0,
                points: 15.0,
            },
        }
    }

    /// The kind this cell turns into when a pacifier wave reaches it
    pub fn pacified(&self) -> Option<CellKind> {
        match self {
            CellKind::Thorn => Some(CellKind::Flower),
            CellKind::Ember => Some(CellKind::Moss),
            _ => None,
        }
    }

    /// Inverse of [`CellKind::pacified`]: the hostile kind to revert to
    pub fn unpacified(&self) -> Option<CellKind> {
        match self {
            CellKind::Flower => Some(CellKind::Thorn),
            CellKind::Moss => Some(CellKind::Ember),
            _ => None,
        }
    }
}

/// Per-cell animation; the authoritative rect never moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellAnim {
    /// Flying in from off-screen toward the rect
    Entering { pos: Vec2, vel: Vec2 },
    /// Flying out from the rect toward off-screen
    Exiting { pos: Vec2, vel: Vec2 },
    /// Capture pop after validation; progress runs 0..1 once delay expires
    Capturing { delay: f32, progress: f32 },
}

/// Outcome of advancing a cell's animation by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimOutcome {
    Idle,
    /// An entering cell reached its rect this tick
    Arrived,
    /// A capture pop finished this tick
    Settled,
}

/// A terrain unit covering a size x size block of grid coordinates
#[derive(Debug, Clone)]
pub struct Cell {
    /// Grid coordinates of the top-left covered coordinate
    pub x: i32,
    pub y: i32,
    /// Footprint edge in grid units, at least 1
    pub size: i32,
    pub kind: CellKind,
    /// Pixel rect in level-local space
    pub rect: Rect,
    /// Pixel footprint edge
    pub real_size: f32,
    /// Insertion sequence, tie-break for the canonical ordering
    pub seq: usize,
    /// Unit vector away from the terrain centroid, the fly direction
    pub outward: Vec2,
    pub selected: bool,
    pub temp_selected: bool,
    /// Points credited for this cell by its validated circle
    pub points: f32,
    pub anim: Option<CellAnim>,
    /// Cells this pacifier switched, kept for reversal on removal
    pub affected: Vec<CellId>,
}

impl Cell {
    pub fn new(x: i32, y: i32, size: i32, kind: CellKind, cell_size: i32, seq: usize) -> Self {
        let real_size = (size * cell_size) as f32;
        Self {
            x,
            y,
            size,
            kind,
            rect: Rect::new(
                (x * cell_size) as f32,
                (y * cell_size) as f32,
                real_size,
                real_size,
            ),
            real_size,
            seq,
            outward: Vec2::ZERO,
            selected: false,
            temp_selected: false,
            points: 0.0,
            anim: None,
            affected: Vec::new(),
        }
    }

    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.rect.contains_point(p)
    }

    /// Base point value of the current kind
    #[inline]
    pub fn base_points(&self) -> f32 {
        self.kind.stats().points
    }

    /// Mark as provisionally captured by the growing circle
    pub fn temp_select(&mut self) {
        self.temp_selected = true;
    }

    /// Commit the capture and queue the pop, staggered across the circle
    pub fn select(&mut self, total: usize, index: usize) {
        self.temp_selected = false;
        self.selected = true;
        let delay = if total > 1 {
            CAPTURE_STAGGER * index as f32 / total as f32
        } else {
            0.0
        };
        self.anim = Some(CellAnim::Capturing {
            delay,
            progress: 0.0,
        });
    }

    /// Clear every capture mark and side record on this cell
    pub fn unselect(&mut self) {
        self.selected = false;
        self.temp_selected = false;
        self.points = 0.0;
        self.anim = None;
        self.affected.clear();
    }

    pub fn change_kind(&mut self, kind: CellKind) {
        self.kind = kind;
    }

    /// Advance the running animation, reporting arrival or settle
    pub fn advance_anim(&mut self, dt: f32) -> AnimOutcome {
        match self.anim {
            Some(CellAnim::Entering { mut pos, vel }) => {
                pos += vel * dt;
                // Arrived once the remaining displacement opposes the
                // velocity; a zero velocity never arrives
                if vel != Vec2::ZERO && (self.rect.pos - pos).dot(vel) <= 0.0 {
                    self.anim = None;
                    AnimOutcome::Arrived
                } else {
                    self.anim = Some(CellAnim::Entering { pos, vel });
                    AnimOutcome::Idle
                }
            }
            Some(CellAnim::Exiting { mut pos, vel }) => {
                pos += vel * dt;
                self.anim = Some(CellAnim::Exiting { pos, vel });
                AnimOutcome::Idle
            }
            Some(CellAnim::Capturing {
                mut delay,
                mut progress,
            }) => {
                if delay > 0.0 {
                    delay -= dt;
                    self.anim = Some(CellAnim::Capturing { delay, progress });
                    AnimOutcome::Idle
                } else {
                    progress += dt / CAPTURE_DURATION;
                    if progress >= 1.0 {
                        self.anim = None;
                        AnimOutcome::Settled
                    } else {
                        self.anim = Some(CellAnim::Capturing { delay, progress });
                        AnimOutcome::Idle
                    }
                }
            }
            None => AnimOutcome::Idle,
        }
    }

    /// Rect to draw this tick; follows the animation while one is running
    pub fn display_rect(&self) -> Rect {
        match self.anim {
            Some(CellAnim::Entering { pos, .. }) | Some(CellAnim::Exiting { pos, .. }) => Rect {
                pos,
                size: self.rect.size,
            },
            _ => self.rect,
        }
    }

    /// Capture pop progress in 0..1 once the stagger delay has expired
    pub fn capture_progress(&self) -> Option<f32> {
        match self.anim {
            Some(CellAnim::Capturing { delay, progress }) if delay <= 0.0 => Some(progress),
            _ => None,
        }
    }

    /// True when the display rect lies entirely outside the screen
    pub fn is_offscreen(&self, offset: Vec2) -> bool {
        let rect = self.display_rect();
        let p = rect.pos + offset;
        p.x + rect.size.x < 0.0 || p.x > WIDTH || p.y + rect.size.y < 0.0 || p.y > HEIGHT
    }

    /// Canonical ordering: row-major origin coordinate, insertion tie-break
    #[inline]
    pub fn sort_key(&self) -> (i32, i32, usize) {
        (self.y, self.x, self.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_selectability() {
        assert!(CellKind::Normal.stats().selectable);
        assert!(!CellKind::Blocker.stats().selectable);
        assert!(!CellKind::Thorn.stats().selectable);
        assert!(!CellKind::Ember.stats().selectable);
        assert!(CellKind::Flower.stats().selectable);
        assert!(CellKind::Moss.stats().selectable);
        assert_eq!(CellKind::Doubler.stats().multiplier, 2.0);
        assert_eq!(CellKind::Bonus.stats().bonus_circles, 1);
    }

    #[test]
    fn test_pacify_map_is_bidirectional() {
        let kinds = [
            CellKind::Normal,
            CellKind::Blocker,
            CellKind::Bonus,
            CellKind::Doubler,
            CellKind::Pacifier,
            CellKind::Thorn,
            CellKind::Flower,
            CellKind::Ember,
            CellKind::Moss,
        ];
        for kind in kinds {
            if let Some(pacified) = kind.pacified() {
                assert_eq!(pacified.unpacified(), Some(kind));
            }
            if let Some(hostile) = kind.unpacified() {
                assert_eq!(hostile.pacified(), Some(kind));
            }
        }
    }

    #[test]
    fn test_select_staggers_delay_across_circle() {
        let mut first = Cell::new(0, 0, 1, CellKind::Normal, 64, 0);
        let mut last = Cell::new(1, 0, 1, CellKind::Normal, 64, 1);
        first.select(4, 0);
        last.select(4, 3);
        let Some(CellAnim::Capturing { delay: d0, .. }) = first.anim else {
            panic!("expected capture anim");
        };
        let Some(CellAnim::Capturing { delay: d3, .. }) = last.anim else {
            panic!("expected capture anim");
        };
        assert_eq!(d0, 0.0);
        assert!((d3 - CAPTURE_STAGGER * 0.75).abs() < 0.001);
    }

    #[test]
    fn test_unselect_clears_capture_state() {
        let mut cell = Cell::new(0, 0, 1, CellKind::Pacifier, 64, 0);
        cell.select(1, 0);
        cell.points = 10.0;
        cell.affected = vec![3, 4];
        cell.unselect();
        assert!(!cell.selected);
        assert!(!cell.temp_selected);
        assert_eq!(cell.points, 0.0);
        assert!(cell.anim.is_none());
        assert!(cell.affected.is_empty());
    }

    #[test]
    fn test_capture_pop_settles_after_delay_and_duration() {
        let mut cell = Cell::new(0, 0, 1, CellKind::Normal, 64, 0);
        cell.select(2, 1);
        let dt = 1.0 / 120.0;
        let mut ticks = 0;
        while cell.advance_anim(dt) != AnimOutcome::Settled {
            ticks += 1;
            assert!(ticks < 1000, "pop never settled");
        }
        let elapsed = ticks as f32 * dt;
        let expected = CAPTURE_STAGGER / 2.0 + CAPTURE_DURATION;
        assert!((elapsed - expected).abs() < 0.05);
    }

    #[test]
    fn test_entering_cell_arrives_and_snaps() {
        let mut cell = Cell::new(2, 3, 1, CellKind::Normal, 64, 0);
        let dir = Vec2::new(1.0, 0.0);
        cell.anim = Some(CellAnim::Entering {
            pos: cell.rect.pos + dir * 500.0,
            vel: -dir * 1000.0,
        });
        let dt = 1.0 / 120.0;
        let mut arrived = false;
        for _ in 0..200 {
            if cell.advance_anim(dt) == AnimOutcome::Arrived {
                arrived = true;
                break;
            }
        }
        assert!(arrived);
        assert!(cell.anim.is_none());
        assert_eq!(cell.display_rect(), cell.rect);
    }

    #[test]
    fn test_frozen_entering_cell_never_arrives() {
        let mut cell = Cell::new(0, 0, 1, CellKind::Normal, 64, 0);
        cell.anim = Some(CellAnim::Entering {
            pos: cell.rect.pos + Vec2::new(300.0, 0.0),
            vel: Vec2::ZERO,
        });
        let dt = 1.0 / 120.0;
        for _ in 0..10_000 {
            assert_eq!(cell.advance_anim(dt), AnimOutcome::Idle);
        }
        assert!(matches!(cell.anim, Some(CellAnim::Entering { .. })));
    }
}
