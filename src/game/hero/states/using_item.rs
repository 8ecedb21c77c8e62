// Using an equipment item

use crate::engine::map::Playfield;

use super::super::context::HeroCore;
use super::super::equipment::HeroError;
use super::super::events::HeroEvent;
use super::super::state::HeroState;

/// Name of the item on `slot` if it can be used
pub fn usable_item(hero: &HeroCore, slot: usize) -> Result<String, HeroError> {
    let item = hero
        .equipment
        .item_assigned(slot)
        .ok_or(HeroError::NoItemAssigned(slot))?;
    if item.variant == 0 {
        return Err(HeroError::ItemNotOwned(item.name.clone()));
    }
    if !item.assignable {
        return Err(HeroError::CannotStartItem(item.name.clone()));
    }
    Ok(item.name.clone())
}

pub struct UsingItemState {
    item: String,
    end_date: u32,
}

impl UsingItemState {
    pub fn new(item: String) -> Self {
        Self { item, end_date: 0 }
    }

    pub fn item(&self) -> &str {
        &self.item
    }
}

impl HeroState for UsingItemState {
    fn name(&self) -> &'static str {
        "using item"
    }

    fn start(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield, _previous: Option<&dyn HeroState>) {
        let now = hero.now();
        hero.clear_movement();
        self.end_date = now + hero.stats.item_use_duration;
        hero.sprites.play_from_start("using_item", now);
        hero.push_event(HeroEvent::ItemUsed {
            item: self.item.clone(),
        });
    }

    fn update(&mut self, hero: &mut HeroCore, _map: &mut dyn Playfield) {
        if hero.now() >= self.end_date {
            self.end_date = u32::MAX;
            hero.start_free();
        }
    }

    fn set_suspended(&mut self, hero: &mut HeroCore, suspended: bool) {
        if !suspended {
            self.end_date = self.end_date.saturating_add(hero.suspended_duration());
        }
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn is_using_item(&self) -> bool {
        true
    }
}
