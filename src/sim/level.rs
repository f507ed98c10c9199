//! Level simulation: circle growth, capture, removal, lifecycle
//!
//! A level moves through Loading -> Playing -> Unloading -> Ended. While
//! playing, a press starts a temp circle that grows until released or
//! forced to stop; release validates it into a placed circle whose cells
//! pop one by one. Points are credited when a cell's pop settles, never at
//! validation, and taking a circle back reverses exactly what its cells
//! have settled so far.

use std::mem;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::cell::{AnimOutcome, Cell, CellAnim, CellId, CellKind};
use super::geometry::Circle;
use super::terrain::TerrainIndex;
use crate::audio::{AudioQueue, Sound};
use crate::consts::*;
use crate::levels::{self, LevelData};

/// Lifecycle phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPhase {
    /// Cells flying in from off-screen
    Loading,
    /// Normal play
    Playing,
    /// Cells flying out
    Unloading,
    /// Every cell has left the screen; terminal
    Ended,
}

/// Lifecycle transitions surfaced to the session, each fired once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    /// All cells settled into place; play begins
    Loaded,
    /// All cells left the screen; the level is done
    Unloaded,
}

/// A placed circle and the cells it captured
#[derive(Debug, Clone)]
pub struct ValidatedCircle {
    pub circle: Circle,
    /// Captured cells in canonical order; drives the capture stagger
    pub cells: Vec<CellId>,
    /// Total points this circle contributes once all its cells settle
    pub points: f32,
}

/// A running level
#[derive(Debug)]
pub struct Level {
    pub number: usize,
    pub cell_size: i32,
    pub cells: Vec<Cell>,
    pub circles: Vec<ValidatedCircle>,
    pub temp_circle: Option<Circle>,
    pub points: f32,
    pub required_points: Vec<f32>,
    pub max_circles: u32,
    pub bonus_circles: u32,
    pub used_circles: u32,
    pub phase: LevelPhase,
    /// Screen offset centering the level in the play area
    pub offset: Vec2,
    pub hovered_cell: Option<CellId>,
    pub audio: AudioQueue,

    terrain: TerrainIndex,
    /// Temp circle radius gain per second
    radius_speed: f32,
    temp_selected: Vec<CellId>,
    temp_multiplier: f32,
    /// Cheap rejection bound for hover tests, grown on validation
    circumscribed: Circle,
    /// Captured cells whose pop has not settled yet
    cells_in_animation: u32,
    countdown: f32,
    rng: Pcg32,
}

impl Level {
    pub fn new(data: &LevelData, seed: u64) -> Self {
        debug_assert!(data.is_valid());
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut cells: Vec<Cell> = data
            .cells
            .iter()
            .enumerate()
            .map(|(seq, spec)| Cell::new(spec.x, spec.y, spec.size, spec.kind, data.cell_size, seq))
            .collect();
        // Canonical order up front so CellId order matches it
        cells.sort_by_key(|c| c.sort_key());
        let terrain = TerrainIndex::build(&mut cells, &mut rng);

        let bounds = terrain.bounds;
        let offset = Vec2::new(
            (WIDTH - bounds.size.x) / 2.0 - bounds.pos.x,
            GAME_Y_OFFSET + (HEIGHT - GAME_Y_OFFSET - bounds.size.y) / 2.0 - bounds.pos.y,
        );
        let radius_speed = GROWTH_FACTOR * terrain.max_cell_size.max(GROWTH_REF_CELL_SIZE);
        let circumscribed = Circle::new(bounds.pos + bounds.size / 2.0, 0.0);

        Self {
            number: data.number,
            cell_size: data.cell_size,
            cells,
            circles: Vec::new(),
            temp_circle: None,
            points: 0.0,
            required_points: data.required_points.clone(),
            max_circles: data.max_circles,
            bonus_circles: 0,
            used_circles: 0,
            phase: LevelPhase::Playing,
            offset,
            hovered_cell: None,
            audio: AudioQueue::new(),
            terrain,
            radius_speed,
            temp_selected: Vec::new(),
            temp_multiplier: 1.0,
            circumscribed,
            cells_in_animation: 0,
            countdown: COMPLETION_COUNTDOWN,
            rng,
        }
    }

    /// Circles still available to place
    pub fn circles_left(&self) -> u32 {
        (self.max_circles + self.bonus_circles).saturating_sub(self.used_circles)
    }

    /// Tutorial lines for this level
    pub fn tutorials(&self) -> &'static [&'static str] {
        levels::tutorials_for(self.number)
    }

    // --- INPUT ---

    /// Handle a press at screen coordinates
    pub fn click(&mut self, x: f32, y: f32) {
        if self.phase != LevelPhase::Playing || self.temp_circle.is_some() {
            return;
        }
        let p = Vec2::new(x, y) - self.offset;

        // A click on a placed circle takes it back
        if let Some(index) = self.circles.iter().position(|v| v.circle.contains_point(p)) {
            self.remove_circle(index);
            return;
        }

        if self.circles_left() == 0 {
            self.audio.play(Sound::NoCirclesLeft, 0.7);
            return;
        }

        if self.cell_id_at_point(p).is_none() {
            self.audio.play(Sound::NoCirclesLeft, 0.2);
            return;
        }

        self.temp_circle = Some(Circle::new(p, 0.0));
        self.temp_multiplier = 1.0;
        self.audio.play(Sound::GrowingCircle, 0.4);
    }

    /// Handle the release ending a growth gesture
    pub fn release(&mut self) {
        if self.phase != LevelPhase::Playing {
            return;
        }
        self.validate_temp_circle(Sound::ValidateClick);
    }

    /// Track the pointer: hovered cell and per-circle hover flags
    pub fn mouse_moved(&mut self, x: f32, y: f32) {
        let p = Vec2::new(x, y) - self.offset;
        self.hovered_cell = self.cell_id_at_point(p);

        // Outside the circumscribed bound no circle can be hovered
        if !self.circumscribed.contains_point(p) {
            for v in &mut self.circles {
                v.circle.hovered = false;
            }
            return;
        }
        for v in &mut self.circles {
            v.circle.hovered = v.circle.contains_point(p);
        }
    }

    fn cell_id_at_point(&self, p: Vec2) -> Option<CellId> {
        let gx = (p.x / self.cell_size as f32).floor() as i32;
        let gy = (p.y / self.cell_size as f32).floor() as i32;
        self.terrain.cell_at(gx, gy)
    }

    // --- CIRCLES ---

    fn validate_temp_circle(&mut self, sound: Sound) {
        let Some(circle) = self.temp_circle.take() else {
            return;
        };
        // An accidental tap makes a tiny circle; throw it away silently
        if circle.radius < MIN_VALID_RADIUS_RATIO * self.cell_size as f32 {
            self.temp_circle = Some(circle);
            self.destroy_temp_circle(None);
            return;
        }

        let mut captured = mem::take(&mut self.temp_selected);
        captured.sort_by_key(|&id| self.cells[id].sort_key());

        self.cells_in_animation += captured.len() as u32;
        let total = captured.len();
        let mut base_points = 0.0;
        for (index, &id) in captured.iter().enumerate() {
            let cell = &mut self.cells[id];
            cell.select(total, index);
            cell.points = cell.base_points() * self.temp_multiplier;
            base_points += cell.base_points();
        }
        let points = base_points * self.temp_multiplier;

        // Grow the hover rejection bound to cover the new circle
        let reach = self.circumscribed.center.distance(circle.center) + circle.radius;
        if reach > self.circumscribed.radius {
            self.circumscribed.radius = reach;
        }

        log::debug!(
            "validated circle r={:.1} capturing {} cells for {:.0} points",
            circle.radius,
            total,
            points
        );
        self.circles.push(ValidatedCircle {
            circle,
            cells: captured,
            points,
        });
        self.used_circles += 1;
        self.temp_multiplier = 1.0;
        self.audio.stop(Sound::GrowingCircle);
        self.audio.play(sound, 1.0);
    }

    fn destroy_temp_circle(&mut self, sound: Option<Sound>) {
        if self.temp_circle.take().is_none() {
            return;
        }
        for id in self.temp_selected.drain(..) {
            self.cells[id].temp_selected = false;
        }
        self.temp_multiplier = 1.0;
        self.audio.stop(Sound::GrowingCircle);
        if let Some(sound) = sound {
            self.audio.play(sound, 1.0);
        }
    }

    /// Take back a placed circle, reversing every side effect it caused
    pub fn remove_circle(&mut self, index: usize) {
        let removed = self.circles.remove(index);
        let mut still_animating = 0u32;

        for &id in &removed.cells {
            // A cell whose pop never settled was never credited: skip the
            // debit but keep the pending counter balanced
            if self.cells[id].anim.is_some() {
                still_animating += 1;
            } else {
                let (cell_points, cell_bonus, kind) = {
                    let cell = &self.cells[id];
                    (cell.points, cell.kind.stats().bonus_circles, cell.kind)
                };
                self.points -= cell_points;
                self.bonus_circles -= cell_bonus;
                if kind == CellKind::Pacifier {
                    let affected = mem::take(&mut self.cells[id].affected);
                    for aid in affected {
                        if let Some(hostile) = self.cells[aid].kind.unpacified() {
                            self.cells[aid].change_kind(hostile);
                        }
                    }
                }
            }
            self.cells[id].unselect();
        }

        self.used_circles -= 1;
        self.cells_in_animation -= still_animating;
        log::debug!(
            "removed circle {index}, {} points left on the board",
            self.points
        );
        self.audio.play(Sound::RemoveCircle, 0.5);
    }

    // --- GROWTH ---

    fn update_growth(&mut self, dt: f32) {
        let Some(circle) = self.temp_circle.as_mut() else {
            return;
        };
        circle.radius += self.radius_speed * dt;
        let snapshot = circle.clone();

        for id in 0..self.cells.len() {
            if self.temp_circle.is_none() {
                return;
            }
            let cell = &self.cells[id];
            if cell.selected || cell.temp_selected {
                continue;
            }
            if snapshot.contains_rect(&cell.rect) {
                self.capture_cell(id);
            } else if cell.kind == CellKind::Blocker && snapshot.touches_rect(&cell.rect) {
                // Grazing a blocker forces validation instead of destroying
                self.validate_temp_circle(Sound::ValidateBlocker);
            }
        }

        // Touching an already placed circle also forces validation
        if let Some(temp) = &self.temp_circle {
            if self.circles.iter().any(|v| temp.touches_circle(&v.circle)) {
                self.validate_temp_circle(Sound::ValidateClick);
            }
        }
    }

    fn capture_cell(&mut self, id: CellId) {
        let stats = self.cells[id].kind.stats();
        if stats.selectable {
            self.cells[id].temp_select();
            self.temp_selected.push(id);
            self.temp_multiplier *= stats.multiplier;
        } else {
            self.destroy_temp_circle(Some(Sound::DestroyCircle));
        }
    }

    // --- SETTLING ---

    fn on_cell_settled(&mut self, id: CellId) {
        let (cell_points, bonus, kind, x, y) = {
            let cell = &self.cells[id];
            (cell.points, cell.kind.stats().bonus_circles, cell.kind, cell.x, cell.y)
        };

        self.points += cell_points;
        self.bonus_circles += bonus;
        self.cells_in_animation = self.cells_in_animation.saturating_sub(1);
        self.audio.play(Sound::CellSelect, 1.0);
        if bonus > 0 {
            self.audio.play(Sound::BonusCircle, 1.0);
        }

        if kind == CellKind::Pacifier {
            let region = self.terrain.flood_fill(x, y);
            let mut affected = Vec::new();
            for rid in region {
                if let Some(pacified) = self.cells[rid].kind.pacified() {
                    self.cells[rid].change_kind(pacified);
                    affected.push(rid);
                }
            }
            log::debug!("pacifier at ({x},{y}) tamed {} cells", affected.len());
            self.cells[id].affected = affected;
        }

        // Reaching the completion threshold arms a short grace period so
        // pops still in flight can land first
        if let Some(&first) = self.required_points.first() {
            if self.points >= first {
                self.countdown = COMPLETION_COUNTDOWN;
            }
        }
    }

    /// True once the score holds the first threshold with nothing in
    /// flight and the grace countdown expired
    fn is_finished(&self) -> bool {
        self.phase == LevelPhase::Playing
            && self.cells_in_animation == 0
            && self.countdown <= 0.0
            && self
                .required_points
                .first()
                .is_some_and(|&first| self.points >= first)
    }

    // --- MEDALS ---

    /// Medal tiers earned at the current score, highest tier first
    pub fn medals(&self) -> Vec<u32> {
        let r = &self.required_points;
        match r.len() {
            0 => Vec::new(),
            1 => vec![1],
            2 => vec![2, if self.points >= r[1] { 1 } else { 0 }],
            _ => vec![
                3,
                if self.points >= r[1] { 2 } else { 0 },
                if self.points >= r[2] { 1 } else { 0 },
            ],
        }
    }

    /// Whether the score reached the last threshold
    pub fn got_gold_medal(&self) -> bool {
        self.required_points
            .last()
            .is_some_and(|&gold| self.points >= gold)
    }

    // --- LIFECYCLE ---

    /// Begin the fly-in: every cell starts off-screen on its outward line
    pub fn start_loading(&mut self) {
        for i in 0..self.cells.len() {
            let jitter = Vec2::new(
                self.rng.random_range(0.0..DIRECTION_JITTER),
                self.rng.random_range(0.0..DIRECTION_JITTER),
            );
            let speed = self.rng.random_range(LOAD_SPEED_MIN..LOAD_SPEED_MAX);
            let cell = &mut self.cells[i];
            let dir = (cell.outward + jitter).normalize();
            cell.anim = Some(CellAnim::Entering {
                pos: cell.rect.pos + dir * OFFSCREEN_DISTANCE,
                vel: -dir * speed,
            });
        }
        self.phase = LevelPhase::Loading;
        log::info!("level {} loading ({} cells)", self.number + 1, self.cells.len());
        self.audio.play(Sound::StartLevel, 1.0);
    }

    fn start_unloading(&mut self) {
        self.destroy_temp_circle(None);
        for i in 0..self.cells.len() {
            let jitter = Vec2::new(
                self.rng.random_range(0.0..DIRECTION_JITTER),
                self.rng.random_range(0.0..DIRECTION_JITTER),
            );
            let speed = self.rng.random_range(UNLOAD_SPEED_MIN..UNLOAD_SPEED_MAX);
            let cell = &mut self.cells[i];
            let dir = (cell.outward + jitter).normalize();
            cell.anim = Some(CellAnim::Exiting {
                pos: cell.rect.pos,
                vel: dir * speed,
            });
        }
        self.phase = LevelPhase::Unloading;
        log::info!(
            "level {} complete with {:.0} points",
            self.number + 1,
            self.points
        );
        self.audio.play(Sound::EndLevel, 1.0);
    }

    /// Advance the level by one tick
    pub fn update(&mut self, dt: f32) -> Option<LevelEvent> {
        match self.phase {
            LevelPhase::Loading => self.update_loading(dt),
            LevelPhase::Playing => {
                self.update_playing(dt);
                None
            }
            LevelPhase::Unloading => self.update_unloading(dt),
            LevelPhase::Ended => None,
        }
    }

    fn update_loading(&mut self, dt: f32) -> Option<LevelEvent> {
        for cell in &mut self.cells {
            if matches!(cell.anim, Some(CellAnim::Entering { .. })) {
                cell.advance_anim(dt);
            }
        }
        let settled = self
            .cells
            .iter()
            .all(|c| !matches!(c.anim, Some(CellAnim::Entering { .. })));
        if settled {
            self.phase = LevelPhase::Playing;
            log::info!("level {} loaded", self.number + 1);
            return Some(LevelEvent::Loaded);
        }
        None
    }

    fn update_playing(&mut self, dt: f32) {
        // Pops first so their settles land before the completion check
        let mut settled = Vec::new();
        for id in 0..self.cells.len() {
            if matches!(self.cells[id].anim, Some(CellAnim::Capturing { .. }))
                && self.cells[id].advance_anim(dt) == AnimOutcome::Settled
            {
                settled.push(id);
            }
        }
        for id in settled {
            self.on_cell_settled(id);
        }

        if self.is_finished() {
            self.start_unloading();
            return;
        }

        self.update_growth(dt);
        self.countdown -= dt;
    }

    fn update_unloading(&mut self, dt: f32) -> Option<LevelEvent> {
        for cell in &mut self.cells {
            if matches!(cell.anim, Some(CellAnim::Exiting { .. })) {
                cell.advance_anim(dt);
            }
        }
        let offset = self.offset;
        if self.cells.iter().all(|c| c.is_offscreen(offset)) {
            self.phase = LevelPhase::Ended;
            log::info!("level {} unloaded", self.number + 1);
            return Some(LevelEvent::Unloaded);
        }
        None
    }
}
