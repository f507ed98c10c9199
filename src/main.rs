//! Encircle entry point
//!
//! Headless demo: drives a scripted session through the first level,
//! prints the outcome, and keeps the medal record on disk between runs.
//! The real game embeds the library behind a renderer and feeds it
//! pointer input instead.

use std::path::Path;

use glam::Vec2;

use encircle::consts::*;
use encircle::medals::{MedalLedger, MEDALS_FILE};
use encircle::sim::GameSession;

fn main() {
    env_logger::init();
    log::info!("Encircle (headless) starting...");

    let ledger = MedalLedger::load(Path::new(MEDALS_FILE));
    let mut session = GameSession::with_medals(0xC0FFEE, ledger);
    session.load_level(0);

    // Let the fly-in finish
    let mut ticks = 0u32;
    while session.is_loading() && ticks < 12_000 {
        session.update(SIM_DT);
        ticks += 1;
    }

    for line in session.level().map(|l| l.tutorials()).unwrap_or(&[]) {
        log::info!("tutorial: {line}");
    }

    // Press in the middle of the grid and grow one circle over everything
    if let Some(level) = session.level_mut() {
        let p = level.offset + Vec2::new(128.0, 128.0);
        level.click(p.x, p.y);
    }
    for _ in 0..240 {
        session.update(SIM_DT);
    }
    if let Some(level) = session.level_mut() {
        level.release();
    }

    let mut ticks = 0u32;
    while !session.level_ended() && ticks < 12_000 {
        session.update(SIM_DT);
        ticks += 1;
    }

    let Some(level) = session.level_mut() else {
        log::error!("no level ran");
        return;
    };
    let audio_events = level.audio.drain();
    log::info!("{} audio events emitted", audio_events.len());
    println!(
        "level {} finished: {:.0} points of {:?}, medals {:?}",
        level.number + 1,
        level.points,
        level.required_points,
        level.medals(),
    );
    let number = level.number;
    println!(
        "gold medal: {}",
        if session.medals().is_gold(number) {
            "yes"
        } else {
            "not yet"
        }
    );

    if let Err(err) = session.medals().save(Path::new(MEDALS_FILE)) {
        log::warn!("could not save the medal record: {err}");
    }
}
