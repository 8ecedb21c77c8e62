// Hero equipment: life, abilities and items

use std::collections::HashMap;

/// Number of item slots bound to the item commands
pub const ITEM_SLOTS: usize = 2;

/// Errors of command-driven hero transitions
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeroError {
    #[error("State '{state}' refuses to start '{requested}'")]
    CommandRefused {
        state: &'static str,
        requested: &'static str,
    },

    #[error("Item '{0}' cannot be used now")]
    CannotStartItem(String),

    #[error("The hero does not own item '{0}'")]
    ItemNotOwned(String),

    #[error("No item assigned to slot {0}")]
    NoItemAssigned(usize),

    #[error("Item '{0}' cannot be assigned to a command")]
    NotAssignable(String),
}

/// An item the hero owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentItem {
    pub name: String,
    /// 0 means possessed in name only (not obtained yet)
    pub variant: u32,
    /// Whether the item can be put on an item command
    pub assignable: bool,
}

impl EquipmentItem {
    pub fn new(name: &str, variant: u32, assignable: bool) -> Self {
        Self {
            name: name.to_string(),
            variant,
            assignable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Equipment {
    life: i32,
    max_life: i32,
    abilities: HashMap<String, u32>,
    items: HashMap<String, EquipmentItem>,
    slots: [Option<String>; ITEM_SLOTS],
}

impl Equipment {
    pub fn new(max_life: i32) -> Self {
        Self {
            life: max_life,
            max_life,
            abilities: HashMap::new(),
            items: HashMap::new(),
            slots: Default::default(),
        }
    }

    pub fn life(&self) -> i32 {
        self.life
    }

    pub fn max_life(&self) -> i32 {
        self.max_life
    }

    pub fn remove_life(&mut self, amount: i32) {
        self.life = (self.life - amount).max(0);
    }

    pub fn add_life(&mut self, amount: i32) {
        self.life = (self.life + amount).min(self.max_life);
    }

    pub fn restore_all_life(&mut self) {
        self.life = self.max_life;
    }

    /// Level of an ability ("swim", "run", "grab", "sword", "lift"), 0 if absent
    pub fn ability(&self, name: &str) -> u32 {
        self.abilities.get(name).copied().unwrap_or(0)
    }

    pub fn has_ability(&self, name: &str) -> bool {
        self.ability(name) > 0
    }

    pub fn set_ability(&mut self, name: &str, level: u32) {
        if level == 0 {
            self.abilities.remove(name);
        } else {
            self.abilities.insert(name.to_string(), level);
        }
    }

    /// Give an item, or upgrade it if the new variant is higher
    pub fn add_item(&mut self, item: EquipmentItem) {
        match self.items.get_mut(&item.name) {
            Some(owned) => owned.variant = owned.variant.max(item.variant),
            None => {
                self.items.insert(item.name.clone(), item);
            }
        }
    }

    pub fn item(&self, name: &str) -> Option<&EquipmentItem> {
        self.items.get(name)
    }

    /// Put an owned, assignable item on an item slot
    pub fn assign(&mut self, slot: usize, name: &str) -> Result<(), HeroError> {
        let item = self
            .items
            .get(name)
            .filter(|item| item.variant > 0)
            .ok_or_else(|| HeroError::ItemNotOwned(name.to_string()))?;
        if !item.assignable {
            return Err(HeroError::NotAssignable(name.to_string()));
        }
        let target = self
            .slots
            .get_mut(slot)
            .ok_or(HeroError::NoItemAssigned(slot))?;
        *target = Some(name.to_string());
        Ok(())
    }

    /// Item currently on a slot
    pub fn item_assigned(&self, slot: usize) -> Option<&EquipmentItem> {
        self.slots
            .get(slot)
            .and_then(Option::as_deref)
            .and_then(|name| self.items.get(name))
    }
}

impl Default for Equipment {
    fn default() -> Self {
        Self::new(super::stats::BASE_STATS.max_life)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_life_bounds() {
        let mut equipment = Equipment::new(12);
        equipment.remove_life(5);
        assert_eq!(equipment.life(), 7);
        equipment.remove_life(20);
        assert_eq!(equipment.life(), 0);
        equipment.add_life(50);
        assert_eq!(equipment.life(), 12);
    }

    #[test]
    fn test_abilities() {
        let mut equipment = Equipment::default();
        assert!(!equipment.has_ability("swim"));
        equipment.set_ability("swim", 1);
        assert!(equipment.has_ability("swim"));
        equipment.set_ability("swim", 0);
        assert!(!equipment.has_ability("swim"));
    }

    #[test]
    fn test_assign_items() {
        let mut equipment = Equipment::default();
        assert_eq!(
            equipment.assign(0, "bow"),
            Err(HeroError::ItemNotOwned("bow".to_string()))
        );

        equipment.add_item(EquipmentItem::new("bow", 1, true));
        equipment.add_item(EquipmentItem::new("map", 1, false));
        assert_eq!(equipment.assign(0, "bow"), Ok(()));
        assert_eq!(equipment.item_assigned(0).map(|i| i.name.as_str()), Some("bow"));
        assert_eq!(
            equipment.assign(1, "map"),
            Err(HeroError::NotAssignable("map".to_string()))
        );
        assert_eq!(equipment.assign(5, "bow"), Err(HeroError::NoItemAssigned(5)));
        assert!(equipment.item_assigned(1).is_none());
    }

    #[test]
    fn test_add_item_upgrades() {
        let mut equipment = Equipment::default();
        equipment.add_item(EquipmentItem::new("sword", 1, false));
        equipment.add_item(EquipmentItem::new("sword", 2, false));
        equipment.add_item(EquipmentItem::new("sword", 1, false));
        assert_eq!(equipment.item("sword").map(|i| i.variant), Some(2));
    }
}
