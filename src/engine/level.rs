// Level descriptor: the single source for both visible geometry and colliders.
//
// Walls and pillars are authored once. The renderer derives its block list from
// them via `blocks()`, and the collision world derives its inflated colliders
// from the same records, so visible walls and invisible blockers cannot drift.

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("world bounds are empty (min {min:?}, max {max:?})")]
    EmptyBounds { min: Vec2, max: Vec2 },
    #[error("wall {index} has min corner {min:?} not below max corner {max:?}")]
    InvertedWall { index: usize, min: Vec2, max: Vec2 },
    #[error("pillar {index} has non-positive radius {radius}")]
    BadPillarRadius { index: usize, radius: f32 },
    #[error("zone `{id}` has non-positive activation radius {radius}")]
    BadZoneRadius { id: String, radius: f32 },
    #[error("zone id `{0}` appears more than once")]
    DuplicateZone(String),
    #[error("spawn point {0:?} is blocked by level geometry")]
    BlockedSpawn(Vec2),
}

// ============================================================================
// AUTHORED GEOMETRY
// ============================================================================

/// Axis-aligned wall on the ground plane, extruded upward by `height`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Wall {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
}

impl Wall {
    pub fn new(min: Vec2, max: Vec2, height: f32) -> Self {
        Self { min, max, height }
    }
}

/// Round column on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Pillar {
    pub center: Vec2,
    pub radius: f32,
    pub height: f32,
}

/// Axis-aligned rectangle on the XZ plane. `Vec2::y` is world Z.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        !(self.min.x < self.max.x && self.min.y < self.max.y)
    }
}

// ============================================================================
// ZONES
// ============================================================================

/// Content shown in the panel when a zone is opened.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoneContent {
    pub title: String,
    pub subtitle: String,
    pub body: String,
}

/// Interactive area around a world position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Zone {
    pub id: String,
    pub label: String,
    pub subtitle: String,
    pub position: Vec2,
    pub radius: f32,
    /// Marker colour, linear RGB.
    pub color: [f32; 3],
    pub content: ZoneContent,
}

// ============================================================================
// DESCRIPTOR
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LevelDescriptor {
    pub bounds: Rect,
    #[serde(default)]
    pub walls: Vec<Wall>,
    #[serde(default)]
    pub pillars: Vec<Pillar>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    /// Overrides `EngineConfig::spawn_position` when present.
    #[serde(default)]
    pub spawn: Option<Vec2>,
    /// Seed for decorative effect placement.
    #[serde(default)]
    pub decoration_seed: u64,
}

/// One renderable box derived from the descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub center: Vec3,
    pub size: Vec3,
    pub color: [f32; 3],
}

const WALL_COLOR: [f32; 3] = [0.32, 0.30, 0.36];
const PILLAR_COLOR: [f32; 3] = [0.45, 0.40, 0.34];
const FLOOR_COLOR: [f32; 3] = [0.10, 0.10, 0.13];

impl LevelDescriptor {
    pub fn from_ron(text: &str) -> Result<Self, LevelError> {
        let level: Self = ron::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    /// Structural checks that do not depend on the character radius.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.bounds.is_empty() {
            return Err(LevelError::EmptyBounds {
                min: self.bounds.min,
                max: self.bounds.max,
            });
        }
        for (index, wall) in self.walls.iter().enumerate() {
            if !(wall.min.x < wall.max.x && wall.min.y < wall.max.y) {
                return Err(LevelError::InvertedWall {
                    index,
                    min: wall.min,
                    max: wall.max,
                });
            }
        }
        for (index, pillar) in self.pillars.iter().enumerate() {
            if !(pillar.radius > 0.0) {
                return Err(LevelError::BadPillarRadius {
                    index,
                    radius: pillar.radius,
                });
            }
        }
        let mut seen = HashSet::new();
        for zone in &self.zones {
            if !(zone.radius > 0.0) {
                return Err(LevelError::BadZoneRadius {
                    id: zone.id.clone(),
                    radius: zone.radius,
                });
            }
            if !seen.insert(zone.id.as_str()) {
                return Err(LevelError::DuplicateZone(zone.id.clone()));
            }
        }
        Ok(())
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Render blocks for the floor, walls and pillars. Pillars are drawn as
    /// square columns circumscribing the collision circle's diameter.
    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(1 + self.walls.len() + self.pillars.len());

        let floor_size = self.bounds.max - self.bounds.min;
        let floor_center = (self.bounds.min + self.bounds.max) * 0.5;
        blocks.push(Block {
            center: Vec3::new(floor_center.x, -0.05, floor_center.y),
            size: Vec3::new(floor_size.x, 0.1, floor_size.y),
            color: FLOOR_COLOR,
        });

        for wall in &self.walls {
            let size = wall.max - wall.min;
            let center = (wall.min + wall.max) * 0.5;
            blocks.push(Block {
                center: Vec3::new(center.x, wall.height * 0.5, center.y),
                size: Vec3::new(size.x, wall.height, size.y),
                color: WALL_COLOR,
            });
        }

        for pillar in &self.pillars {
            let d = pillar.radius * 2.0;
            blocks.push(Block {
                center: Vec3::new(pillar.center.x, pillar.height * 0.5, pillar.center.y),
                size: Vec3::new(d, pillar.height, d),
                color: PILLAR_COLOR,
            });
        }

        blocks
    }

    /// The built-in hall: an entrance corridor opening into a pillared
    /// chamber with three exhibits and a throne at the far end.
    pub fn showcase() -> Self {
        const H: f32 = 3.0;
        let wall = |x0: f32, z0: f32, x1: f32, z1: f32| Wall::new(Vec2::new(x0, z0), Vec2::new(x1, z1), H);
        let pillar = |x: f32, z: f32| Pillar {
            center: Vec2::new(x, z),
            radius: 0.6,
            height: 4.0,
        };
        let zone = |id: &str, label: &str, subtitle: &str, x: f32, z: f32, color: [f32; 3], body: &str| Zone {
            id: id.to_string(),
            label: label.to_string(),
            subtitle: subtitle.to_string(),
            position: Vec2::new(x, z),
            radius: 2.2,
            color,
            content: ZoneContent {
                title: label.to_string(),
                subtitle: subtitle.to_string(),
                body: body.to_string(),
            },
        };

        Self {
            bounds: Rect::new(Vec2::new(-16.0, -20.0), Vec2::new(16.0, 18.0)),
            walls: vec![
                // Entrance corridor (x in [-3, 3], z in [6, 18]).
                wall(-4.0, 6.0, -3.0, 18.0),
                wall(3.0, 6.0, 4.0, 18.0),
                // Chamber front wall with the corridor opening.
                wall(-15.0, 5.0, -3.0, 6.0),
                wall(3.0, 5.0, 15.0, 6.0),
                // Chamber side and back walls.
                wall(-16.0, -20.0, -15.0, 6.0),
                wall(15.0, -20.0, 16.0, 6.0),
                wall(-16.0, -20.0, 16.0, -19.0),
                // Low dais rail in front of the throne.
                Wall::new(Vec2::new(-5.0, -14.5), Vec2::new(-1.5, -14.0), 1.0),
                Wall::new(Vec2::new(1.5, -14.5), Vec2::new(5.0, -14.0), 1.0),
            ],
            pillars: vec![
                pillar(-8.0, 0.0),
                pillar(8.0, 0.0),
                pillar(-8.0, -9.0),
                pillar(8.0, -9.0),
            ],
            zones: vec![
                zone(
                    "work",
                    "Selected Work",
                    "Case studies",
                    -11.0,
                    -4.0,
                    [0.95, 0.55, 0.20],
                    "A tour through shipped products, from first sketch to launch.",
                ),
                zone(
                    "studio",
                    "The Studio",
                    "Who we are",
                    11.0,
                    -4.0,
                    [0.25, 0.70, 0.95],
                    "A small team of designers and engineers building odd, careful things.",
                ),
                zone(
                    "contact",
                    "Say Hello",
                    "Get in touch",
                    0.0,
                    -7.0,
                    [0.40, 0.90, 0.45],
                    "Write to us about a project, a question, or nothing in particular.",
                ),
                zone(
                    "throne",
                    "The Throne",
                    "Founder's note",
                    0.0,
                    -16.5,
                    [0.85, 0.25, 0.85],
                    "Every hall needs a seat at the end of it. This one is ours.",
                ),
            ],
            spawn: Some(Vec2::new(0.0, 14.0)),
            decoration_seed: 0x6a11_e2e1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn showcase_is_valid() {
        let level = LevelDescriptor::showcase();
        assert!(level.validate().is_ok());
        assert!(level.zone("throne").is_some());
    }

    #[test]
    fn blocks_cover_floor_walls_and_pillars() {
        let level = LevelDescriptor::showcase();
        let blocks = level.blocks();
        assert_eq!(blocks.len(), 1 + level.walls.len() + level.pillars.len());
        // Wall block footprint matches its collider footprint exactly.
        let wall = level.walls[0];
        let block = blocks[1];
        assert_eq!(block.size.x, wall.max.x - wall.min.x);
        assert_eq!(block.size.z, wall.max.y - wall.min.y);
    }

    #[test]
    fn duplicate_zone_ids_are_rejected() {
        let mut level = LevelDescriptor::showcase();
        let copy = level.zones[0].clone();
        level.zones.push(copy);
        assert!(matches!(level.validate(), Err(LevelError::DuplicateZone(_))));
    }

    #[test]
    fn inverted_wall_is_rejected() {
        let mut level = LevelDescriptor::showcase();
        level.walls.push(Wall::new(Vec2::new(1.0, 1.0), Vec2::new(0.0, 2.0), 1.0));
        assert!(matches!(level.validate(), Err(LevelError::InvertedWall { .. })));
    }

    #[test]
    fn parses_minimal_ron() {
        let text = r#"(
            bounds: (min: (-5.0, -5.0), max: (5.0, 5.0)),
            walls: [(min: (1.0, -1.0), max: (2.0, 1.0), height: 2.0)],
            zones: [(
                id: "a",
                label: "A",
                subtitle: "first",
                position: (0.0, -3.0),
                radius: 1.5,
                color: (1.0, 0.0, 0.0),
                content: (title: "A", subtitle: "first", body: "hello"),
            )],
        )"#;
        let level = LevelDescriptor::from_ron(text).unwrap();
        assert_eq!(level.walls.len(), 1);
        assert_eq!(level.zones[0].content.body, "hello");
        assert!(level.pillars.is_empty());
        assert_eq!(level.spawn, None);
    }
}
