//! Scene Configuration
//!
//! Static scene data (rooms, doors, stairs, colliders) is described by a
//! [`SceneConfig`] loaded from JSON once at startup, and resolved into a
//! [`NavigationScene`] whose cross references are typed ids.
//!
//! Name matching happens only here: exact first, then case-insensitive.
//! Problems found while resolving are configuration errors. They are logged,
//! kept in [`NavigationScene::diagnostics`], and degrade to a safe default
//! (an affordance that is never offered, a door that only shows its label)
//! instead of failing the load.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::viewpoint::Pose;
use crate::config::NavigatorConfig;
use crate::error::SceneConfigError;
use crate::physics::{Aabb, Collider, EntityId, Volume};
use crate::world::boundary::BoundaryService;
use crate::world::entities::{
    Door, DoorId, FloorDirection, Room, RoomId, Stair, StairId, StairType,
};

// ============================================================================
// FILE FORMAT
// ============================================================================

/// Room as written in a scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub name: String,
    pub floor_name: String,
    pub volumes: Vec<Volume>,
    #[serde(default)]
    pub entry_pose: Option<Pose>,
    #[serde(default = "default_lighting")]
    pub lighting_factor: f32,
    #[serde(default)]
    pub interior_entities: Vec<EntityId>,
}

fn default_lighting() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

/// Door as written in a scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoorConfig {
    pub name: String,
    pub geometry: EntityId,
    #[serde(default = "default_true")]
    pub allow_entering: bool,
    #[serde(default)]
    pub entry_pose: Option<Pose>,
    #[serde(default)]
    pub exit_pose: Option<Pose>,
    #[serde(default)]
    pub floor_name: Option<String>,
    /// Name of the room the door leads into
    #[serde(default)]
    pub room: Option<String>,
    /// Name of the room the door is located in; absent for exterior doors
    #[serde(default)]
    pub parent_room: Option<String>,
    #[serde(default)]
    pub label_anchor: Option<Vec3>,
}

/// Stair landing as written in a scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StairConfig {
    pub name: String,
    pub geometry: EntityId,
    pub floor_name: String,
    #[serde(default)]
    pub stair_type: StairType,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub up_stair_name: Option<String>,
    #[serde(default)]
    pub down_stair_name: Option<String>,
    #[serde(default)]
    pub up_pose: Option<Pose>,
    #[serde(default)]
    pub down_pose: Option<Pose>,
    #[serde(default)]
    pub label_anchor: Option<Vec3>,
}

/// A complete scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Region the viewpoint may roam while outside
    pub exterior_bounds: Aabb,
    /// Pose the viewpoint starts at; the start mode's first-entry pose otherwise
    #[serde(default)]
    pub start_pose: Option<Pose>,
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
    #[serde(default)]
    pub doors: Vec<DoorConfig>,
    #[serde(default)]
    pub stairs: Vec<StairConfig>,
    #[serde(default)]
    pub colliders: Vec<Collider>,
    #[serde(default)]
    pub navigator: NavigatorConfig,
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SceneConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SceneConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn to_json_pretty(&self) -> Result<String, SceneConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// A configuration problem found while resolving a scene.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigIssue {
    /// Two entities of the same kind share a name; the later one is skipped
    DuplicateName { kind: &'static str, name: String },
    /// A door or stair names a room that does not exist
    UnknownRoom { entity: String, room: String },
    /// An enterable door without a destination room
    NoDestination { door: String },
    /// An enterable door with no entry pose and no room entry pose
    MissingEntryPose { door: String },
    /// A named stair link that matches no stair
    UnresolvedStairLink {
        stair: String,
        target: String,
        direction: FloorDirection,
    },
    /// A link the stair type forbids (down from a ground floor, up from the top)
    StairTypeConflict {
        stair: String,
        direction: FloorDirection,
    },
    /// A resolved link without the arrival pose it needs
    MissingStairPose {
        stair: String,
        direction: FloorDirection,
    },
    /// A room without any usable boundary volume
    EmptyBoundary { room: String },
    /// A degenerate volume that was dropped
    InvalidVolume { room: String, index: usize },
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigIssue::DuplicateName { kind, name } => {
                write!(f, "duplicate {kind} name '{name}', later definition skipped")
            }
            ConfigIssue::UnknownRoom { entity, room } => {
                write!(f, "'{entity}' refers to unknown room '{room}'")
            }
            ConfigIssue::NoDestination { door } => {
                write!(f, "door '{door}' allows entering but leads nowhere")
            }
            ConfigIssue::MissingEntryPose { door } => {
                write!(f, "door '{door}' has no entry pose and its room has none either")
            }
            ConfigIssue::UnresolvedStairLink {
                stair,
                target,
                direction,
            } => write!(f, "stair '{stair}' links {direction} to unknown stair '{target}'"),
            ConfigIssue::StairTypeConflict { stair, direction } => {
                write!(f, "stair '{stair}' is configured to go {direction}, which its type forbids")
            }
            ConfigIssue::MissingStairPose { stair, direction } => {
                write!(f, "stair '{stair}' links {direction} but has no {direction} pose")
            }
            ConfigIssue::EmptyBoundary { room } => {
                write!(f, "room '{room}' has no boundary volume")
            }
            ConfigIssue::InvalidVolume { room, index } => {
                write!(f, "room '{room}' volume {index} is degenerate and was dropped")
            }
        }
    }
}

fn report(issues: &mut Vec<ConfigIssue>, issue: ConfigIssue) {
    match issue {
        ConfigIssue::DuplicateName { .. } | ConfigIssue::InvalidVolume { .. } => {
            log::warn!("[Scene] {issue}")
        }
        _ => log::error!("[Scene] {issue}"),
    }
    issues.push(issue);
}

/// Resolve a name against a name table: exact match first, then case-insensitive.
fn resolve_name(table: &HashMap<String, u32>, wanted: &str) -> Option<u32> {
    if let Some(&id) = table.get(wanted) {
        return Some(id);
    }
    let wanted = wanted.trim().to_lowercase();
    table
        .iter()
        .filter(|(name, _)| name.trim().to_lowercase() == wanted)
        .map(|(_, &id)| id)
        .min()
}

// ============================================================================
// RESOLVED SCENE
// ============================================================================

/// The scene with every reference resolved. Immutable after load.
#[derive(Clone, Debug)]
pub struct NavigationScene {
    exterior_bounds: Aabb,
    start_pose: Option<Pose>,
    rooms: Vec<Room>,
    doors: Vec<Door>,
    stairs: Vec<Stair>,
    room_names: HashMap<String, u32>,
    door_names: HashMap<String, u32>,
    stair_names: HashMap<String, u32>,
    diagnostics: Vec<ConfigIssue>,
}

impl NavigationScene {
    /// Resolve a scene file. Never fails; problems end up in [`Self::diagnostics`].
    pub fn from_config(config: &SceneConfig) -> Self {
        let mut issues = Vec::new();
        let collider_centers: HashMap<EntityId, Vec3> = config
            .colliders
            .iter()
            .map(|c| (c.entity, c.bounds.center()))
            .collect();

        // --- Rooms ---
        let mut rooms = Vec::new();
        let mut room_names = HashMap::new();
        for rc in &config.rooms {
            if room_names.contains_key(&rc.name) {
                report(
                    &mut issues,
                    ConfigIssue::DuplicateName {
                        kind: "room",
                        name: rc.name.clone(),
                    },
                );
                continue;
            }
            let mut volumes = Vec::new();
            for (index, volume) in rc.volumes.iter().enumerate() {
                if volume.is_valid() {
                    volumes.push(volume.clone());
                } else {
                    report(
                        &mut issues,
                        ConfigIssue::InvalidVolume {
                            room: rc.name.clone(),
                            index,
                        },
                    );
                }
            }
            if volumes.is_empty() {
                report(&mut issues, ConfigIssue::EmptyBoundary { room: rc.name.clone() });
            }
            let id = RoomId(rooms.len() as u32);
            room_names.insert(rc.name.clone(), id.0);
            rooms.push(Room {
                id,
                name: rc.name.clone(),
                volumes,
                floor_name: rc.floor_name.clone(),
                entry_pose: rc.entry_pose,
                doors: Vec::new(),
                stairs: Vec::new(),
                lighting_factor: rc.lighting_factor,
                interior_entities: rc.interior_entities.clone(),
            });
        }

        let lookup_room = |issues: &mut Vec<ConfigIssue>, entity: &str, name: &Option<String>| {
            let name = name.as_ref()?;
            let id = resolve_name(&room_names, name).map(RoomId);
            if id.is_none() {
                report(
                    issues,
                    ConfigIssue::UnknownRoom {
                        entity: entity.to_string(),
                        room: name.clone(),
                    },
                );
            }
            id
        };

        // --- Doors ---
        let mut doors: Vec<Door> = Vec::new();
        let mut door_names = HashMap::new();
        for dc in &config.doors {
            if door_names.contains_key(&dc.name) {
                report(
                    &mut issues,
                    ConfigIssue::DuplicateName {
                        kind: "door",
                        name: dc.name.clone(),
                    },
                );
                continue;
            }
            let room = lookup_room(&mut issues, &dc.name, &dc.room);
            let parent_room = lookup_room(&mut issues, &dc.name, &dc.parent_room);

            let mut allow_entering = dc.allow_entering;
            let mut entry_pose = dc.entry_pose;
            if allow_entering {
                match room {
                    None => {
                        if dc.room.is_none() {
                            report(&mut issues, ConfigIssue::NoDestination { door: dc.name.clone() });
                        }
                        allow_entering = false;
                    }
                    Some(room) => {
                        entry_pose = entry_pose.or(rooms[room.index()].entry_pose);
                        if entry_pose.is_none() {
                            report(
                                &mut issues,
                                ConfigIssue::MissingEntryPose { door: dc.name.clone() },
                            );
                            allow_entering = false;
                        }
                    }
                }
            }

            let label_anchor = dc
                .label_anchor
                .or_else(|| collider_centers.get(&dc.geometry).copied())
                .or(entry_pose.map(|p| p.position))
                .unwrap_or(Vec3::ZERO);

            let id = DoorId(doors.len() as u32);
            door_names.insert(dc.name.clone(), id.0);
            if let Some(parent) = parent_room {
                rooms[parent.index()].doors.push(id);
            }
            doors.push(Door {
                id,
                name: dc.name.clone(),
                geometry: dc.geometry,
                allow_entering,
                entry_pose,
                exit_pose: dc.exit_pose,
                floor_name: dc.floor_name.clone(),
                room,
                parent_room,
                label_anchor,
            });
        }

        // --- Stairs (links resolved in a second pass) ---
        let mut stairs: Vec<Stair> = Vec::new();
        let mut stair_names = HashMap::new();
        let mut kept_configs = Vec::new();
        for sc in &config.stairs {
            if stair_names.contains_key(&sc.name) {
                report(
                    &mut issues,
                    ConfigIssue::DuplicateName {
                        kind: "stair",
                        name: sc.name.clone(),
                    },
                );
                continue;
            }
            let room = lookup_room(&mut issues, &sc.name, &sc.room);
            let id = StairId(stairs.len() as u32);
            stair_names.insert(sc.name.clone(), id.0);
            if let Some(room) = room {
                rooms[room.index()].stairs.push(id);
            }
            let label_anchor = sc
                .label_anchor
                .or_else(|| collider_centers.get(&sc.geometry).copied())
                .unwrap_or(Vec3::ZERO);
            stairs.push(Stair {
                id,
                name: sc.name.clone(),
                geometry: sc.geometry,
                floor_name: sc.floor_name.clone(),
                stair_type: sc.stair_type,
                room,
                up_stair: None,
                down_stair: None,
                up_pose: sc.up_pose,
                down_pose: sc.down_pose,
                label_anchor,
            });
            kept_configs.push(sc);
        }

        for (stair, sc) in stairs.iter_mut().zip(kept_configs) {
            for direction in [FloorDirection::Up, FloorDirection::Down] {
                let (name, permitted, pose) = match direction {
                    FloorDirection::Up => {
                        (&sc.up_stair_name, sc.stair_type.permits_up(), sc.up_pose)
                    }
                    FloorDirection::Down => {
                        (&sc.down_stair_name, sc.stair_type.permits_down(), sc.down_pose)
                    }
                };
                let Some(name) = name else {
                    continue;
                };
                if !permitted {
                    report(
                        &mut issues,
                        ConfigIssue::StairTypeConflict {
                            stair: sc.name.clone(),
                            direction,
                        },
                    );
                    continue;
                }
                let Some(target) = resolve_name(&stair_names, name).map(StairId) else {
                    report(
                        &mut issues,
                        ConfigIssue::UnresolvedStairLink {
                            stair: sc.name.clone(),
                            target: name.clone(),
                            direction,
                        },
                    );
                    continue;
                };
                if pose.is_none() {
                    report(
                        &mut issues,
                        ConfigIssue::MissingStairPose {
                            stair: sc.name.clone(),
                            direction,
                        },
                    );
                    continue;
                }
                match direction {
                    FloorDirection::Up => stair.up_stair = Some(target),
                    FloorDirection::Down => stair.down_stair = Some(target),
                }
            }
        }

        log::info!(
            "[Scene] loaded {} rooms, {} doors, {} stairs ({} issues)",
            rooms.len(),
            doors.len(),
            stairs.len(),
            issues.len()
        );

        Self {
            exterior_bounds: config.exterior_bounds,
            start_pose: config.start_pose,
            rooms,
            doors,
            stairs,
            room_names,
            door_names,
            stair_names,
            diagnostics: issues,
        }
    }

    /// Build the boundary service for this scene.
    pub fn boundary_service(&self, padding: f32) -> BoundaryService {
        let mut service = BoundaryService::new(self.exterior_bounds, padding);
        for room in &self.rooms {
            service.insert_room(room.id, room.volumes.clone());
        }
        service
    }

    pub fn exterior_bounds(&self) -> Aabb {
        self.exterior_bounds
    }

    pub fn start_pose(&self) -> Option<Pose> {
        self.start_pose
    }

    pub fn door(&self, id: DoorId) -> Option<&Door> {
        self.doors.get(id.index())
    }

    pub fn stair(&self, id: StairId) -> Option<&Stair> {
        self.stairs.get(id.index())
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn stairs(&self) -> &[Stair] {
        &self.stairs
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Load-time lookup of a door by name (exact, then case-insensitive).
    pub fn find_door(&self, name: &str) -> Option<DoorId> {
        resolve_name(&self.door_names, name).map(DoorId)
    }

    /// Load-time lookup of a stair by name (exact, then case-insensitive).
    pub fn find_stair(&self, name: &str) -> Option<StairId> {
        resolve_name(&self.stair_names, name).map(StairId)
    }

    /// Load-time lookup of a room by name (exact, then case-insensitive).
    pub fn find_room(&self, name: &str) -> Option<RoomId> {
        resolve_name(&self.room_names, name).map(RoomId)
    }

    /// Configuration problems found while resolving.
    pub fn diagnostics(&self) -> &[ConfigIssue] {
        &self.diagnostics
    }
}
