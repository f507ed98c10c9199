//! Terrain index: grid lookup, level metrics, flood fill
//!
//! Built once per level from the cell list and never mutated afterward.
//! Every grid coordinate covered by a cell maps back to that cell's id, so
//! multi-unit cells appear under each coordinate they cover.

use std::collections::HashSet;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::cell::{Cell, CellId};
use super::geometry::Rect;

/// Grid-coordinate lookup of cell ids plus level pixel metrics
#[derive(Debug, Clone)]
pub struct TerrainIndex {
    width: i32,
    height: i32,
    grid: Vec<Option<CellId>>,
    /// Pixel bounding box of every cell rect
    pub bounds: Rect,
    /// Largest pixel footprint among the cells
    pub max_cell_size: f32,
}

impl TerrainIndex {
    /// Index the cells and assign each its outward fly direction
    pub fn build(cells: &mut [Cell], rng: &mut Pcg32) -> Self {
        let mut width = 0;
        let mut height = 0;
        for cell in cells.iter() {
            width = width.max(cell.x + cell.size);
            height = height.max(cell.y + cell.size);
        }

        let mut grid = vec![None; (width * height) as usize];
        for (id, cell) in cells.iter().enumerate() {
            for dy in 0..cell.size {
                for dx in 0..cell.size {
                    grid[((cell.y + dy) * width + cell.x + dx) as usize] = Some(id);
                }
            }
        }

        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        let mut max_cell_size = 0.0f32;
        for cell in cells.iter() {
            min = min.min(cell.rect.pos);
            max = max.max(cell.rect.pos + cell.rect.size);
            max_cell_size = max_cell_size.max(cell.real_size);
        }

        // Fly directions point away from the centroid of cell centers; a
        // cell sitting exactly on the centroid gets a random direction
        let centroid =
            cells.iter().map(|c| c.rect.center()).sum::<Vec2>() / cells.len().max(1) as f32;
        for cell in cells.iter_mut() {
            let out = cell.rect.center() - centroid;
            cell.outward = if out.length_squared() > f32::EPSILON {
                out.normalize()
            } else {
                let angle = rng.random_range(0.0..TAU);
                Vec2::new(angle.cos(), angle.sin())
            };
        }

        Self {
            width,
            height,
            grid,
            bounds: Rect {
                pos: min,
                size: max - min,
            },
            max_cell_size,
        }
    }

    #[inline]
    pub fn grid_width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn grid_height(&self) -> i32 {
        self.height
    }

    /// Checked grid lookup; out-of-range coordinates return None
    pub fn cell_at(&self, x: i32, y: i32) -> Option<CellId> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.grid[(y * self.width + x) as usize]
    }

    /// Iterative 4-connected flood fill from a grid coordinate
    ///
    /// Propagation halts at grid edges and empty coordinates. Each reached
    /// cell appears exactly once, in visit order, even when its footprint
    /// covers several coordinates.
    pub fn flood_fill(&self, x0: i32, y0: i32) -> Vec<CellId> {
        let mut cells = Vec::new();
        let mut seen_cells = HashSet::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(x0, y0)];

        while let Some((x, y)) = stack.pop() {
            if !visited.insert((x, y)) {
                continue;
            }
            let Some(id) = self.cell_at(x, y) else {
                continue;
            };
            if seen_cells.insert(id) {
                cells.push(id);
            }
            for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                if self.cell_at(nx, ny).is_some() && !visited.contains(&(nx, ny)) {
                    stack.push((nx, ny));
                }
            }
        }

        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::cell::CellKind;
    use rand::SeedableRng;

    fn make_cells(coords: &[(i32, i32)]) -> Vec<Cell> {
        coords
            .iter()
            .enumerate()
            .map(|(seq, &(x, y))| Cell::new(x, y, 1, CellKind::Normal, 64, seq))
            .collect()
    }

    fn build(cells: &mut Vec<Cell>) -> TerrainIndex {
        let mut rng = Pcg32::seed_from_u64(7);
        TerrainIndex::build(cells, &mut rng)
    }

    #[test]
    fn test_cell_at_bounds_checked() {
        let mut cells = make_cells(&[(0, 0), (1, 0)]);
        let terrain = build(&mut cells);
        assert_eq!(terrain.cell_at(0, 0), Some(0));
        assert_eq!(terrain.cell_at(1, 0), Some(1));
        assert_eq!(terrain.cell_at(-1, 0), None);
        assert_eq!(terrain.cell_at(0, -3), None);
        assert_eq!(terrain.cell_at(2, 0), None);
        assert_eq!(terrain.cell_at(0, 1), None);
    }

    #[test]
    fn test_flood_fill_visits_each_cell_once() {
        let mut cells = make_cells(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
        let terrain = build(&mut cells);
        let mut reached = terrain.flood_fill(0, 0);
        assert_eq!(reached.len(), 5);
        reached.sort_unstable();
        reached.dedup();
        assert_eq!(reached.len(), 5);
    }

    #[test]
    fn test_flood_fill_halts_at_gaps() {
        // Two groups split by an empty column
        let mut cells = make_cells(&[(0, 0), (1, 0), (3, 0), (4, 0)]);
        let terrain = build(&mut cells);
        let left = terrain.flood_fill(0, 0);
        assert_eq!(left.len(), 2);
        assert!(left.contains(&0) && left.contains(&1));
        let right = terrain.flood_fill(3, 0);
        assert_eq!(right.len(), 2);
        assert!(right.contains(&2) && right.contains(&3));
    }

    #[test]
    fn test_flood_fill_isolated_cell() {
        let mut cells = make_cells(&[(5, 5)]);
        let terrain = build(&mut cells);
        assert_eq!(terrain.flood_fill(5, 5), vec![0]);
        assert!(terrain.flood_fill(0, 0).is_empty());
    }

    #[test]
    fn test_multi_unit_cell_reported_once() {
        let mut cells = vec![
            Cell::new(0, 0, 2, CellKind::Normal, 64, 0),
            Cell::new(2, 0, 1, CellKind::Normal, 64, 1),
        ];
        let terrain = build(&mut cells);
        // The big cell covers four coordinates but is one cell
        assert_eq!(terrain.cell_at(0, 0), Some(0));
        assert_eq!(terrain.cell_at(1, 1), Some(0));
        let reached = terrain.flood_fill(0, 0);
        assert_eq!(reached.len(), 2);
    }

    #[test]
    fn test_metrics_and_outward_directions() {
        let mut cells = make_cells(&[(0, 0), (1, 0), (0, 1), (1, 1)]);
        let terrain = build(&mut cells);
        assert_eq!(terrain.bounds.pos, Vec2::ZERO);
        assert_eq!(terrain.bounds.size, Vec2::new(128.0, 128.0));
        assert_eq!(terrain.max_cell_size, 64.0);
        for cell in &cells {
            assert!((cell.outward.length() - 1.0).abs() < 0.001);
        }
        // Opposite corners fly opposite ways
        assert!(cells[0].outward.dot(cells[3].outward) < 0.0);
    }

    #[test]
    fn test_centroid_cell_gets_random_unit_direction() {
        let mut cells = make_cells(&[(0, 0)]);
        let terrain = build(&mut cells);
        assert_eq!(terrain.grid_width(), 1);
        assert_eq!(terrain.grid_height(), 1);
        assert!((cells[0].outward.length() - 1.0).abs() < 0.001);
    }
}
