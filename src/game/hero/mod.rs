// Hero system
//
// This module contains everything about the player's character:
// - `Hero`: the entity, its per-tick pipeline and state transitions
// - `HeroCore`: the data states act on
// - `HeroState` and the catalogue of behavior states
// - ground effects (holes, ice, water, prickles, floor descent)
// - sprites, equipment, stats and the events sent to listeners

mod character;
mod context;
mod equipment;
mod events;
mod ground_effects;
mod sprites;
mod state;
pub mod states;
mod stats;

pub use character::Hero;
pub use context::{HeroCore, BAD_GROUND_DAMAGE};
pub use equipment::{Equipment, EquipmentItem, HeroError, ITEM_SLOTS};
pub use events::{CallbackRef, HeroEvent, HeroEventQueue};
pub use sprites::{AnimationClip, HeroSprites};
pub use state::HeroState;
pub use stats::{HeroStats, BASE_STATS};
