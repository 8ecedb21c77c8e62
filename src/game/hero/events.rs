// Hero notifications for external listeners

use glam::IVec2;

use crate::core::Direction8;
use crate::engine::map::Layer;

/// Opaque handle to a scripted callback. The hero never interprets it and
/// only hands it back once the sequence that received it concludes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackRef(pub u32);

/// Something listeners (rendering, audio, scripts) may want to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroEvent {
    /// The hero moved
    PositionChanged { xy: IVec2, layer: Layer },

    /// The hero went to another layer
    LayerChanged { layer: Layer },

    /// The movement direction or speed changed
    MovementChanged {
        direction: Option<Direction8>,
        speed: i32,
    },

    /// The behavior state was replaced
    StateChanged {
        from: &'static str,
        to: &'static str,
    },

    /// A sound should be played
    SoundRequested(&'static str),

    /// Life dropped to zero and the game-over sequence should start
    GameOverStarted,

    /// A sequence started with a callback concluded
    CallbackInvoked(CallbackRef),

    /// A treasure was given to the hero
    TreasureObtained { item: String, variant: u32 },

    /// A carried item was thrown
    ItemThrown { item: String, direction: Direction8 },

    /// An equipment item was used
    ItemUsed { item: String },
}

/// Queue of hero events, drained by the owner after each update
#[derive(Debug, Default)]
pub struct HeroEventQueue {
    events: Vec<HeroEvent>,
}

impl HeroEventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: HeroEvent) {
        self.events.push(event);
    }

    /// Peek at the pending events
    pub fn events(&self) -> &[HeroEvent] {
        &self.events
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<HeroEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_keeps_order() {
        let mut queue = HeroEventQueue::new();
        queue.push(HeroEvent::SoundRequested("hero_hurt"));
        queue.push(HeroEvent::GameOverStarted);
        assert_eq!(queue.len(), 2);

        let events = queue.drain();
        assert_eq!(
            events,
            vec![HeroEvent::SoundRequested("hero_hurt"), HeroEvent::GameOverStarted]
        );
        assert!(queue.is_empty());
    }
}
