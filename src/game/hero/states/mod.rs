// Hero behavior states
//
// One file per state. States driven by the player's arrows share the
// `PlayerWalk` helper.

mod back_to_solid_ground;
mod carrying;
mod conveyor_belt;
mod falling;
mod forced_walking;
mod free;
mod freezed;
mod grabbing;
mod hurt;
mod jumping;
mod lifting;
mod player_walk;
mod plunging;
mod running;
mod stairs;
mod swimming;
mod sword_swinging;
mod treasure;
mod using_item;
mod victory;

pub use back_to_solid_ground::BackToSolidGroundState;
pub use carrying::CarryingState;
pub use conveyor_belt::ConveyorBeltState;
pub use falling::FallingState;
pub use forced_walking::ForcedWalkingState;
pub use free::FreeState;
pub use freezed::FreezedState;
pub use grabbing::GrabbingState;
pub use hurt::HurtState;
pub use jumping::JumpingState;
pub use lifting::LiftingState;
pub use plunging::PlungingState;
pub use running::RunningState;
pub use stairs::StairsState;
pub use swimming::SwimmingState;
pub use sword_swinging::SwordSwingingState;
pub use treasure::TreasureState;
pub use using_item::{usable_item, UsingItemState};
pub use victory::VictoryState;
