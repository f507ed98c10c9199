//! Session driving: level progression and the cross-level medal record
//!
//! The session owns the running level, feeds it ticks, absorbs its
//! lifecycle events and keeps the gold-medal record current. Hosts save
//! and load the record themselves.

use super::level::{Level, LevelEvent};
use crate::levels::{self, LEVEL_COUNT};
use crate::medals::MedalLedger;

#[derive(Debug)]
pub struct GameSession {
    number: usize,
    level: Option<Level>,
    loading: bool,
    level_ended: bool,
    medals: MedalLedger,
    seed: u64,
}

impl GameSession {
    pub fn new(seed: u64) -> Self {
        Self {
            number: 0,
            level: None,
            loading: false,
            level_ended: false,
            medals: MedalLedger::new(),
            seed,
        }
    }

    /// Resume a session around a previously loaded medal record
    pub fn with_medals(seed: u64, medals: MedalLedger) -> Self {
        Self {
            medals,
            ..Self::new(seed)
        }
    }

    /// Start the given level with its fly-in
    pub fn load_level(&mut self, number: usize) {
        let Some(data) = levels::get_level(number) else {
            log::warn!("no such level: {number}");
            return;
        };
        self.number = number;
        // Per-level seed so replaying a level reproduces its flight paths
        let mut level = Level::new(&data, self.seed.wrapping_add(number as u64));
        level.start_loading();
        self.level = Some(level);
        self.loading = true;
        self.level_ended = false;
    }

    pub fn load_next_level(&mut self) {
        if self.number + 1 < LEVEL_COUNT {
            self.load_level(self.number + 1);
        } else {
            log::info!("already on the last level");
        }
    }

    pub fn load_previous_level(&mut self) {
        if self.number > 0 {
            self.load_level(self.number - 1);
        }
    }

    /// Restart the current level from scratch
    pub fn reload_current_level(&mut self) {
        self.load_level(self.number);
    }

    /// Advance the running level and absorb its lifecycle events
    pub fn update(&mut self, dt: f32) {
        let Some(level) = self.level.as_mut() else {
            return;
        };
        match level.update(dt) {
            Some(LevelEvent::Loaded) => {
                self.loading = false;
            }
            Some(LevelEvent::Unloaded) => {
                self.level_ended = true;
                self.medals.record(self.number, level.got_gold_medal());
            }
            None => {}
        }
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.level.as_mut()
    }

    pub fn level_number(&self) -> usize {
        self.number
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once the current level has flown out
    pub fn level_ended(&self) -> bool {
        self.level_ended
    }

    pub fn on_last_level(&self) -> bool {
        self.number + 1 >= LEVEL_COUNT
    }

    pub fn campaign_complete(&self) -> bool {
        self.level_ended && self.on_last_level()
    }

    pub fn medals(&self) -> &MedalLedger {
        &self.medals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use glam::Vec2;

    #[test]
    fn test_session_runs_first_level_to_gold() {
        let mut session = GameSession::new(11);
        session.load_level(0);
        assert!(session.is_loading());
        assert!(!session.level_ended());

        let mut guard = 0;
        while session.is_loading() {
            session.update(SIM_DT);
            guard += 1;
            assert!(guard < 10_000, "level never finished loading");
        }

        // One huge circle over the whole 4x4 grid scores 160 of 100
        {
            let level = session.level_mut().unwrap();
            let p = level.offset + Vec2::new(128.0, 128.0);
            level.click(p.x, p.y);
        }
        let mut guard = 0;
        loop {
            session.update(SIM_DT);
            if session
                .level()
                .and_then(|l| l.temp_circle.as_ref())
                .is_some_and(|c| c.radius >= 185.0)
            {
                break;
            }
            guard += 1;
            assert!(guard < 10_000, "circle never grew large enough");
        }
        session.level_mut().unwrap().release();

        let mut guard = 0;
        while !session.level_ended() {
            session.update(SIM_DT);
            guard += 1;
            assert!(guard < 20_000, "level never ended");
        }
        assert!((session.level().unwrap().points - 160.0).abs() < 0.001);
        assert!(session.medals().is_gold(0));
        assert!(!session.on_last_level());
        assert!(!session.campaign_complete());
    }

    #[test]
    fn test_level_navigation_saturates() {
        let mut session = GameSession::new(3);
        session.load_level(0);
        session.load_previous_level();
        assert_eq!(session.level_number(), 0);

        session.load_next_level();
        assert_eq!(session.level_number(), 1);
        assert!(session.is_loading());

        // Jumping past the campaign is refused
        session.load_level(LEVEL_COUNT + 5);
        assert_eq!(session.level_number(), 1);

        session.load_level(LEVEL_COUNT - 1);
        assert!(session.on_last_level());
        session.load_next_level();
        assert_eq!(session.level_number(), LEVEL_COUNT - 1);
    }

    #[test]
    fn test_reload_starts_the_level_over() {
        let mut session = GameSession::new(5);
        session.load_level(2);
        let mut guard = 0;
        while session.is_loading() {
            session.update(SIM_DT);
            guard += 1;
            assert!(guard < 10_000);
        }
        session.level_mut().unwrap().points = 75.0;

        session.reload_current_level();
        assert!(session.is_loading());
        assert_eq!(session.level_number(), 2);
        assert_eq!(session.level().unwrap().points, 0.0);
    }

    #[test]
    fn test_with_medals_keeps_earlier_golds() {
        let mut ledger = MedalLedger::new();
        ledger.record(1, true);
        let session = GameSession::with_medals(9, ledger);
        assert!(session.medals().is_gold(1));
        assert!(!session.medals().is_gold(0));
        assert!(session.level().is_none());
    }
}
