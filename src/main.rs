use std::time::Duration;

use anyhow::{Context, Result};
use glam::IVec2;
use log::info;
use winit::keyboard::KeyCode;

use rusted_quest::core::Direction8;
use rusted_quest::engine::game_loop::GameLoop;
use rusted_quest::engine::input::InputManager;
use rusted_quest::engine::map::{CollisionGroups, Layer, TileMap};
use rusted_quest::game::hero::HeroEvent;
use rusted_quest::game::stream::Stream;
use rusted_quest::game::world::World;

/// Length of a simulated frame
const FRAME: Duration = Duration::from_micros(16_667);

/// Demo length in game milliseconds
const DEMO_DURATION: u32 = 7000;

const MAP: &[&str] = &[
    "##############################",
    "#............................#",
    "#............................#",
    "#.......IIIIIIIIII...........#",
    "#.......IIIIIIIIII...........#",
    "#.......IIIIIIIIII...........#",
    "#.......IIIIIIIIII...........#",
    "#..................OOOOOOOO..#",
    "#..................OOOOOOOO..#",
    "#..................OOOOOOOO..#",
    "#............................#",
    "#.....\"\"\"\"\"\".................#",
    "#.....\"\"\"\"\"\".................#",
    "##############################",
];

/// Key presses and releases: (game time in ms, key, pressed)
const SCRIPT: &[(u32, KeyCode, bool)] = &[
    (100, KeyCode::ArrowRight, true),
    (1000, KeyCode::ArrowRight, false),
    (2000, KeyCode::ArrowRight, true),
    (2900, KeyCode::ArrowRight, false),
    (3000, KeyCode::ArrowDown, true),
    (3300, KeyCode::ArrowDown, false),
    (4000, KeyCode::KeyD, true),
    (4050, KeyCode::KeyD, false),
    (4500, KeyCode::KeyD, true),
    (4550, KeyCode::KeyD, false),
];

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Quest demo...");

    let map = TileMap::from_rows(&[MAP]).context("Failed to build the demo map")?;
    let mut world = World::new(map, IVec2::new(24, 45), Layer::Low, 0);

    // An NPC standing on a stream pushing down
    let npc = world.spawn_entity(IVec2::new(48, 85), Layer::Low, CollisionGroups::Npc);
    let stream_id = world.new_id();
    world.add_stream(Stream::new(stream_id, 40, 72, Layer::Low, Direction8::new(6)));

    let mut input = InputManager::new();
    let mut game_loop = GameLoop::new();
    let mut script = SCRIPT.iter().peekable();

    while game_loop.now_ms() < DEMO_DURATION {
        let updates = game_loop.advance(FRAME);
        for _ in 0..updates {
            let now = game_loop.step();

            while let Some(&&(date, key, pressed)) = script.peek() {
                if date > now {
                    break;
                }
                script.next();
                if let Some(event) = input.process_key(key, pressed, false) {
                    world.notify_command(event, now);
                }
            }

            world.update(now);
            for event in world.drain_hero_events() {
                log_event(now, &event);
            }
        }
        input.update();
    }

    let hero = world.hero();
    info!(
        "Demo over after {} updates: hero at {:?} in state '{}' with {} life",
        game_loop.update_count(),
        hero.xy(),
        hero.state_name(),
        hero.equipment().life()
    );
    if let Some(entity) = world.entity(npc) {
        info!("NPC carried by the stream to {:?}", entity.bounding_box.xy());
    }

    Ok(())
}

fn log_event(now: u32, event: &HeroEvent) {
    match event {
        // Too chatty for the demo
        HeroEvent::PositionChanged { .. } => {}
        _ => info!("[{:>5} ms] {:?}", now, event),
    }
}
