// Effects of the ground below the hero
//
// Two mechanisms:
// - a one-shot reaction when the category of the ground below changes
//   (`notify_ground_below_changed`)
// - a periodic pipeline gated by `next_ground_date` that pulls the hero into
//   holes, makes it slide on ice and plays footstep sounds on grass and
//   shallow water

use glam::IVec2;
use log::info;

use crate::core::distance;
use crate::engine::map::{Ground, Playfield};

use super::character::Hero;

/// Distance to the last solid ground beyond which a hole swallows the hero
const HOLE_PULL_LIMIT: f64 = 8.0;

/// Period of the hole pull
const HOLE_PULL_DELAY: u32 = 60;

/// Period of the ice slide
const ICE_SLIDE_DELAY: u32 = 20;

/// Duration of a committed ice slide direction
const ICE_COMMIT_DELAY: u32 = 300;

/// Time at rest before the ice slide can start again
const ICE_REST_DELAY: u32 = 1000;

impl Hero {
    /// Re-evaluate everything that depends on the hero's position: facing
    /// point, ground below, solid ground memory and floor descent
    pub(super) fn check_position(&mut self, map: &mut dyn Playfield) {
        self.core.update_facing_point();

        if self.state.are_collisions_ignored() || self.core.suspended {
            return;
        }

        self.update_ground_below(map);

        let ground = self.core.ground_below;
        let xy = self.core.xy();
        if ground.is_solid()
            && self.state.can_come_from_bad_ground()
            && self.core.last_solid_ground.map(|(last, _)| last) != Some(xy)
        {
            self.core.last_solid_ground = Some((xy, self.core.layer));
        }

        // Nothing below on this layer: go down to the layer below
        if ground == Ground::Empty && self.state.is_touching_ground() {
            let Some(below) = self.core.layer.below() else {
                return;
            };
            let b = self.core.bounding_box;
            let layer = self.core.layer;
            let corners = [
                (b.x, b.y),
                (b.right() - 1, b.y),
                (b.x, b.bottom() - 1),
                (b.right() - 1, b.bottom() - 1),
            ];
            if corners
                .iter()
                .all(|&(x, y)| map.ground(layer, x, y) == Ground::Empty)
            {
                self.core.set_layer(below, map);
                self.state.notify_layer_changed(&mut self.core, map);
                info!("Hero goes down to layer {:?}", below);

                if self.state.is_free() && map.ground(below, b.x, b.y).is_landing_ground() {
                    self.core.play_sound("hero_lands");
                }
                self.update_ground_below(map);
            }
        }
    }

    fn update_ground_below(&mut self, map: &mut dyn Playfield) {
        let point = self.core.ground_point();
        let ground = map.ground(self.core.layer, point.x, point.y);
        if ground != self.core.ground_below {
            self.core.ground_below = ground;
            self.notify_ground_below_changed(map);
        }
    }

    fn notify_ground_below_changed(&mut self, map: &mut dyn Playfield) {
        match self.core.ground_below {
            Ground::Traversable => {
                self.core.sprites.destroy_ground();
                let speed = self.core.normal_walking_speed;
                self.core.set_walking_speed(speed);
            }
            Ground::DeepWater => {
                if !self.state.can_avoid_deep_water() {
                    self.start_deep_water();
                }
            }
            Ground::Hole => {
                if !self.state.can_avoid_hole() {
                    self.start_hole();
                }
            }
            Ground::Ice => {
                if !self.state.can_avoid_ice() {
                    self.start_ice();
                }
            }
            Ground::Lava => {
                if !self.state.can_avoid_lava() {
                    self.core.start_plunging();
                }
            }
            Ground::Prickle => {
                if !self.state.can_avoid_prickle() {
                    self.core.start_prickle(500);
                }
            }
            Ground::ShallowWater => self.core.start_shallow_water(),
            Ground::Grass => self.core.start_grass(),
            Ground::Ladder => {
                let speed = self.core.normal_walking_speed * 3 / 5;
                self.core.set_walking_speed(speed);
            }
            // Stuck in a wall: a map design error, left to the quest
            _ => {}
        }

        self.state.notify_ground_changed(&mut self.core, map);
    }

    fn start_deep_water(&mut self) {
        if !self.state.is_touching_ground() {
            self.core.start_plunging();
        } else if self.core.equipment.has_ability("swim") {
            self.core.set_state(Box::new(super::states::SwimmingState::new()));
        } else {
            let direction = self
                .state
                .wanted_movement_direction8(&self.core)
                .unwrap_or_else(|| self.core.animation_direction().to_direction8());
            self.core.start_jumping(direction, 32, false, true, 13);
        }
    }

    fn start_hole(&mut self) {
        if !self.state.can_control_movement() {
            // No control (running, hurt...): fall right away
            self.core.start_falling();
            return;
        }

        self.core.next_ground_date = self.core.now;
        let xy = self.core.xy();
        match self.core.last_solid_ground {
            Some((last, _)) if last != xy => {
                // Attracted from where the hero came from
                let delta = xy - last;
                self.core.ground_dxy = IVec2::new(delta.x.signum(), delta.y.signum());
                let speed = self.core.normal_walking_speed / 3;
                self.core.set_walking_speed(speed);
            }
            // Put directly on the hole
            _ => self.core.start_falling(),
        }
    }

    fn start_ice(&mut self) {
        let now = self.core.now;
        self.core.next_ground_date = now;
        self.core.next_ice_date = now;

        let wanted = self.state.wanted_movement_direction8(&self.core);
        self.core.ice_direction8 = wanted;
        self.core.ground_dxy = wanted.map(|d| d.to_xy_move()).unwrap_or(IVec2::ZERO);
    }

    fn is_ground_visible(&self) -> bool {
        self.core.sprites.ground().is_some() && self.state.is_touching_ground()
    }

    /// Periodic ground effects, only when `next_ground_date` is reached
    pub(super) fn update_ground_effects(&mut self, map: &mut dyn Playfield) {
        let now = self.core.now;
        if now < self.core.next_ground_date {
            return;
        }

        if self.is_ground_visible() && self.core.movement.is_some() {
            let speed = self.core.movement.as_ref().map_or(1, |m| m.speed().max(1));
            self.core.next_ground_date = now + 150_i32.max(20000 / speed) as u32;
            if self.core.sprites.is_walking() && self.state.is_touching_ground() {
                let sound = match self.core.ground_below {
                    Ground::ShallowWater => "walk_on_water",
                    _ => "walk_on_grass",
                };
                self.core.play_sound(sound);
            }
            return;
        }

        match self.core.ground_below {
            Ground::Hole if !self.state.can_avoid_hole() => {
                self.core.next_ground_date = now + HOLE_PULL_DELAY;
                let xy = self.core.xy();
                let far = self
                    .core
                    .last_solid_ground
                    .map_or(true, |(last, _)| distance(xy, last) >= HOLE_PULL_LIMIT);
                if far {
                    let speed = self.core.normal_walking_speed;
                    self.core.set_walking_speed(speed);
                    self.core.start_falling();
                } else {
                    self.apply_additional_ground_movement(map);
                }
            }
            Ground::Ice => {
                if !self.state.can_avoid_ice() {
                    self.apply_additional_ground_movement(map);
                }
                self.core.next_ground_date = now + ICE_SLIDE_DELAY;

                if now >= self.core.next_ice_date {
                    self.update_ice();
                    self.core.ice_direction8 = self.state.wanted_movement_direction8(&self.core);
                }
            }
            _ => {}
        }
    }

    /// Recompute the ice slide from the wanted direction and the last
    /// committed one
    pub(super) fn update_ice(&mut self) {
        let now = self.core.now;
        let wanted = self.state.wanted_movement_direction8(&self.core);
        let ice = self.core.ice_direction8;

        match (wanted, ice) {
            (None, None) => {
                self.core.ground_dxy = IVec2::ZERO;
                self.core.next_ice_date = now + ICE_REST_DELAY;
            }
            (None, Some(ice)) => {
                self.core.ground_dxy = ice.to_xy_move();
                self.core.next_ice_date = now + ICE_COMMIT_DELAY;
            }
            (Some(wanted), None) => {
                // Moving from rest: the ice resists
                self.core.ground_dxy = wanted.opposite().to_xy_move();
            }
            (Some(wanted), Some(ice)) => {
                let direction = if ice != wanted { ice } else { wanted };
                self.core.ground_dxy = direction.to_xy_move();
                self.core.next_ice_date = now + ICE_COMMIT_DELAY;
            }
        }
    }

    /// Move the hero by the displacement the ground imposes, sliding along
    /// obstacles. Stuck on a hole means falling.
    fn apply_additional_ground_movement(&mut self, map: &mut dyn Playfield) {
        let dxy = self.core.ground_dxy;
        if dxy == IVec2::ZERO {
            return;
        }

        let candidates = [dxy, IVec2::new(dxy.x, 0), IVec2::new(0, dxy.y)];
        let step = candidates
            .into_iter()
            .filter(|d| *d != IVec2::ZERO)
            .find(|&d| !self.test_collision(map, d));

        match step {
            Some(step) => {
                self.core.bounding_box = self.core.bounding_box.translated(step);
                self.core.position_changed_pending = true;
                self.flush(map);
            }
            None if self.core.ground_below == Ground::Hole => {
                let speed = self.core.normal_walking_speed;
                self.core.set_walking_speed(speed);
                self.core.start_falling();
            }
            None => {}
        }
    }
}
