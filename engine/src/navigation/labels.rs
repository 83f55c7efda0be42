//! Label Height Scan
//!
//! Door and stair labels float above whatever surface lies below their
//! anchor. Finding that surface takes one downward ray per label, so the
//! scan is spread over several ticks with a [`BatchQueue`].

use std::collections::HashMap;

use glam::Vec3;

use crate::batch::BatchQueue;
use crate::config::LabelConfig;
use crate::navigation::events::{LabelPlacement, LabelTarget};
use crate::physics::SceneQuery;
use crate::world::scene::NavigationScene;

#[derive(Debug, Clone)]
pub struct LabelHeightScan {
    config: LabelConfig,
    queue: BatchQueue<(LabelTarget, Vec3)>,
    placements: HashMap<LabelTarget, f32>,
}

impl LabelHeightScan {
    pub fn new(config: LabelConfig) -> Self {
        let queue = BatchQueue::new(config.items_per_tick);
        Self {
            config,
            queue,
            placements: HashMap::new(),
        }
    }

    /// Queue every door and stair label of the scene.
    pub fn schedule(&mut self, scene: &NavigationScene) {
        self.queue.clear();
        self.queue.extend(
            scene
                .doors()
                .iter()
                .map(|door| (LabelTarget::Door(door.id), door.label_anchor)),
        );
        self.queue.extend(
            scene
                .stairs()
                .iter()
                .map(|stair| (LabelTarget::Stair(stair.id), stair.label_anchor)),
        );
        log::debug!("[Labels] {} anchors queued", self.queue.pending_count());
    }

    /// Scan this tick's share of anchors.
    pub fn step(&mut self, query: &dyn SceneQuery) -> Vec<LabelPlacement> {
        let batch = self.queue.next_batch();
        let mut placed = Vec::with_capacity(batch.len());
        for (target, anchor) in batch {
            let origin = anchor + Vec3::Y * self.config.scan_height;
            let hit = query.raycast(origin, Vec3::NEG_Y, self.config.scan_height * 2.0);
            let (surface, grounded) = match hit {
                Some(hit) => (hit.point.y, true),
                None => (anchor.y, false),
            };
            let placement = LabelPlacement {
                target,
                height: surface + self.config.label_offset,
                grounded,
            };
            self.placements.insert(target, placement.height);
            placed.push(placement);
        }
        placed
    }

    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn progress(&self) -> f32 {
        self.queue.progress()
    }

    pub fn height(&self, target: LabelTarget) -> Option<f32> {
        self.placements.get(&target).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Aabb, Collider, EntityId, SceneGeometry};
    use crate::world::scene::{DoorConfig, SceneConfig};

    fn scene_with_doors(count: u32) -> NavigationScene {
        let config = SceneConfig {
            exterior_bounds: Aabb::new(Vec3::splat(-100.0), Vec3::splat(100.0)),
            start_pose: None,
            rooms: vec![],
            doors: (0..count)
                .map(|i| DoorConfig {
                    name: format!("Door {i}"),
                    geometry: EntityId(i),
                    allow_entering: false,
                    entry_pose: None,
                    exit_pose: None,
                    floor_name: None,
                    room: None,
                    parent_room: None,
                    label_anchor: Some(Vec3::new(i as f32 * 10.0, 1.0, 0.0)),
                })
                .collect(),
            stairs: vec![],
            colliders: vec![],
            navigator: Default::default(),
        };
        NavigationScene::from_config(&config)
    }

    #[test]
    fn test_label_sits_above_roof() {
        let geometry = SceneGeometry::from_colliders([Collider::new(
            EntityId(50),
            Aabb::new(Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 8.0, 5.0)),
        )]);
        let mut scan = LabelHeightScan::new(LabelConfig::default());
        scan.schedule(&scene_with_doors(1));
        let placed = scan.step(&geometry);
        assert_eq!(placed.len(), 1);
        assert!(placed[0].grounded);
        assert!((placed[0].height - 10.5).abs() < 1e-4);
        assert!(scan.is_done());
    }

    #[test]
    fn test_scan_respects_budget() {
        let geometry = SceneGeometry::new();
        let mut scan = LabelHeightScan::new(LabelConfig {
            items_per_tick: 2,
            ..LabelConfig::default()
        });
        scan.schedule(&scene_with_doors(5));
        assert_eq!(scan.step(&geometry).len(), 2);
        assert_eq!(scan.step(&geometry).len(), 2);
        let last = scan.step(&geometry);
        assert_eq!(last.len(), 1);
        assert!(!last[0].grounded);
        assert!((last[0].height - 3.5).abs() < 1e-4);
        assert_eq!(scan.height(LabelTarget::Door(crate::world::DoorId(4))), Some(last[0].height));
        assert!(scan.is_done());
    }
}
