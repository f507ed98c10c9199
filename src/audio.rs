//! Sound events emitted by the simulation
//!
//! The core never touches an audio device. It queues named events with
//! volumes and the embedding host drains the queue into its mixer once per
//! frame. Looping sounds get an explicit stop event.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// A captured cell settles into place
    CellSelect,
    /// A validated circle is taken back
    RemoveCircle,
    /// Growth stopped by grazing a blocker
    ValidateBlocker,
    /// A circle is validated
    ValidateClick,
    /// Loops while a temp circle is growing
    GrowingCircle,
    /// Click rejected, budget exhausted or outside the terrain
    NoCirclesLeft,
    /// A growing circle is destroyed
    DestroyCircle,
    /// Level fly-in starts
    StartLevel,
    /// Level fly-out starts
    EndLevel,
    /// A settled cell granted an extra circle
    BonusCircle,
}

/// A queued audio command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    Play { sound: Sound, volume: f32 },
    Stop { sound: Sound },
}

/// Fire-and-forget event queue between the sim and the host mixer
#[derive(Debug, Default)]
pub struct AudioQueue {
    events: Vec<AudioEvent>,
}

impl AudioQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Queue a sound at the given volume, clamped to 0..1
    pub fn play(&mut self, sound: Sound, volume: f32) {
        self.events.push(AudioEvent::Play {
            sound,
            volume: volume.clamp(0.0, 1.0),
        });
    }

    /// Queue a stop for a looping sound
    pub fn stop(&mut self, sound: Sound) {
        self.events.push(AudioEvent::Stop { sound });
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<AudioEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_drain_in_order() {
        let mut queue = AudioQueue::new();
        queue.play(Sound::GrowingCircle, 0.4);
        queue.stop(Sound::GrowingCircle);
        queue.play(Sound::ValidateClick, 1.0);

        let events = queue.drain();
        assert_eq!(
            events,
            vec![
                AudioEvent::Play {
                    sound: Sound::GrowingCircle,
                    volume: 0.4,
                },
                AudioEvent::Stop {
                    sound: Sound::GrowingCircle,
                },
                AudioEvent::Play {
                    sound: Sound::ValidateClick,
                    volume: 1.0,
                },
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_volume_clamped() {
        let mut queue = AudioQueue::new();
        queue.play(Sound::CellSelect, 1.7);
        queue.play(Sound::CellSelect, -0.3);
        let events = queue.drain();
        assert_eq!(
            events[0],
            AudioEvent::Play {
                sound: Sound::CellSelect,
                volume: 1.0,
            }
        );
        assert_eq!(
            events[1],
            AudioEvent::Play {
                sound: Sound::CellSelect,
                volume: 0.0,
            }
        );
    }
}
