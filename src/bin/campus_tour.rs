//! Campus Tour Demo
//!
//! Run with: `cargo run --bin campus_tour [scene.json]`
//!
//! A headless scripted tour through a scene file. Without an argument the
//! bundled demo campus is used. Set `RUST_LOG=debug` to see hover changes
//! and label placement.
//!
//! Script:
//! - TopDown -> Aerial -> Walk
//! - enter the library through its main door
//! - take the stairs up and back down
//! - leave through the main door

use std::error::Error;
use std::path::Path;

use glam::Vec2;

use campus_tour_engine::navigation::NavigationEvent;
use campus_tour_engine::world::{FloorDirection, SceneConfig};
use campus_tour_engine::{
    CampusNavigator, Collaborators, Mode, NavigationInput, SceneGeometry, SceneHost, TimedFade,
};

const DEMO_SCENE: &str = include_str!("../../assets/scenes/demo_campus.json");

const TICK: f32 = 1.0 / 60.0;

/// Longest a single transition is allowed to take before the demo gives up.
const TRANSITION_TIMEOUT: f32 = 10.0;

/// Host-side services the navigator borrows each call.
struct Host {
    scene: SceneHost,
    fade: TimedFade,
}

impl Host {
    fn services(&mut self) -> Collaborators<'_> {
        Collaborators::new(&mut self.scene, &mut self.fade)
    }
}

fn load_config() -> Result<SceneConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("[Demo] loading {path}");
            Ok(SceneConfig::load(Path::new(&path))?)
        }
        None => {
            log::info!("[Demo] using bundled demo campus");
            Ok(SceneConfig::from_json_str(DEMO_SCENE)?)
        }
    }
}

fn log_events(navigator: &mut CampusNavigator) {
    for event in navigator.drain_events() {
        match event {
            NavigationEvent::LabelPlaced(placement) => {
                log::debug!("[Demo] {placement:?}");
            }
            NavigationEvent::DoorHoverChanged(door) => {
                let name = door
                    .and_then(|id| navigator.scene().door(id))
                    .map(|d| d.name.as_str());
                log::info!("[Demo] hovered door: {name:?}");
            }
            other => log::info!("[Demo] {other:?}"),
        }
    }
}

/// Tick with the same input for `seconds`.
fn run_for(navigator: &mut CampusNavigator, host: &mut Host, seconds: f32, input: NavigationInput) {
    let ticks = (seconds / TICK).ceil() as u32;
    for _ in 0..ticks {
        navigator.tick(TICK, &input, &mut host.services());
        log_events(navigator);
    }
}

/// Tick until the in-flight transition has finished.
fn settle(navigator: &mut CampusNavigator, host: &mut Host) -> Result<(), Box<dyn Error>> {
    let mut elapsed = 0.0;
    while navigator.is_transitioning() {
        if elapsed > TRANSITION_TIMEOUT {
            return Err("transition did not finish".into());
        }
        navigator.tick(TICK, &NavigationInput::default(), &mut host.services());
        log_events(navigator);
        elapsed += TICK;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("===========================================");
    println!("   Campus Tour - Scripted Navigation Demo");
    println!("===========================================");

    let config = load_config()?;
    let mut host = Host {
        scene: SceneHost::new(SceneGeometry::from_colliders(config.colliders.clone())),
        fade: TimedFade::new(),
    };
    let mut navigator = CampusNavigator::from_config(&config, &mut host.scene);
    for issue in navigator.scene().diagnostics() {
        println!("  scene issue: {issue}");
    }

    // Let the label scan run and the top-down glide settle
    run_for(&mut navigator, &mut host, 1.0, NavigationInput::default());

    navigator.switch_mode(Mode::Aerial, &mut host.services())?;
    // Fly toward the library and stop short of its main door
    run_for(
        &mut navigator,
        &mut host,
        0.6,
        NavigationInput::with_sticks(Vec2::new(0.0, 1.0), Vec2::ZERO),
    );

    navigator.switch_mode(Mode::Walk, &mut host.services())?;
    run_for(&mut navigator, &mut host, 0.5, NavigationInput::default());

    // Use the door under the crosshair if there is one, otherwise go by name
    let entered = navigator.confirm_door_action(&mut host.services());
    if let Err(err) = entered {
        log::info!("[Demo] no door in view ({err}), entering by name");
        let door = navigator
            .scene()
            .find_door("Library Main")
            .ok_or("scene has no \"Library Main\" door")?;
        navigator.enter_door(door, &mut host.services())?;
    }
    settle(&mut navigator, &mut host)?;
    println!(
        "  inside: room {:?}, floor {:?}, mode {}",
        navigator.current_room(),
        navigator.current_floor_name(),
        navigator.current_mode()
    );

    if let Some(stair) = navigator.scene().find_stair("Hall Stair G") {
        navigator.change_floor(stair, FloorDirection::Up, &mut host.services())?;
        settle(&mut navigator, &mut host)?;
        println!("  upstairs: floor {:?}", navigator.current_floor_name());
    }
    if let Some(stair) = navigator.scene().find_stair("Hall Stair 1") {
        navigator.change_floor(stair, FloorDirection::Down, &mut host.services())?;
        settle(&mut navigator, &mut host)?;
        println!("  downstairs: floor {:?}", navigator.current_floor_name());
    }

    if let Some(door) = navigator.interior_state().current_entry_door {
        navigator.exit_door(door, &mut host.services())?;
        settle(&mut navigator, &mut host)?;
    }

    let viewpoint = navigator.viewpoint().map(|v| v.position);
    println!(
        "  back outside: mode {}, interior {}, position {viewpoint:?}",
        navigator.current_mode(),
        navigator.is_interior()
    );
    Ok(())
}
