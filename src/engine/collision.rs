// Point-vs-inflated-collider movement resolution.
//
// Every collider is grown by the character radius when the world is built,
// so the character is tested as a dimensionless point. A blocked move is
// retried along each axis alone before giving up, which produces wall sliding
// without any shape-vs-shape math.
//
// Cost is O(colliders) per tick. Levels carry a few dozen colliders at most,
// so there is no spatial index.

use glam::Vec2;
use log::debug;

use super::level::{LevelDescriptor, Rect};

// ============================================================================
// COLLIDERS
// ============================================================================

/// A static blocker, already inflated by the character radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// Blocks points inside or on the boundary.
    Aabb { min: Vec2, max: Vec2 },
    /// Blocks points strictly closer than `radius` to `center`.
    Circle { center: Vec2, radius: f32 },
}

impl Collider {
    #[inline]
    pub fn blocks(&self, p: Vec2) -> bool {
        match *self {
            Collider::Aabb { min, max } => {
                p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
            }
            Collider::Circle { center, radius } => p.distance_squared(center) < radius * radius,
        }
    }
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Which branch of the slide-on-block fallback produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Free,
    SlideX,
    SlideZ,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub position: Vec2,
    pub speed: f32,
    pub outcome: MoveOutcome,
}

/// The level's colliders plus the walkable world rectangle.
pub struct CollisionWorld {
    colliders: Vec<Collider>,
    /// World bounds shrunk by the character radius. Points outside are blocked.
    walkable: Rect,
    scrape_damping: f32,
}

impl CollisionWorld {
    pub fn new(colliders: Vec<Collider>, walkable: Rect, scrape_damping: f32) -> Self {
        Self {
            colliders,
            walkable,
            scrape_damping,
        }
    }

    /// Derive the inflated collider set from the same wall and pillar records
    /// the renderer draws.
    pub fn from_level(level: &LevelDescriptor, radius: f32, scrape_damping: f32) -> Self {
        let grow = Vec2::splat(radius);
        let mut colliders = Vec::with_capacity(level.walls.len() + level.pillars.len());

        colliders.extend(level.walls.iter().map(|w| Collider::Aabb {
            min: w.min - grow,
            max: w.max + grow,
        }));
        colliders.extend(level.pillars.iter().map(|p| Collider::Circle {
            center: p.center,
            radius: p.radius + radius,
        }));

        let walkable = Rect::new(level.bounds.min + grow, level.bounds.max - grow);
        debug!(
            "collision world: {} colliders, walkable {:?}..{:?}",
            colliders.len(),
            walkable.min,
            walkable.max
        );

        Self::new(colliders, walkable, scrape_damping)
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn walkable(&self) -> Rect {
        self.walkable
    }

    /// True if the point is outside the world or inside any collider.
    pub fn is_blocked(&self, p: Vec2) -> bool {
        let w = &self.walkable;
        if p.x < w.min.x || p.x > w.max.x || p.y < w.min.y || p.y > w.max.y {
            return true;
        }
        self.colliders.iter().any(|c| c.blocks(p))
    }

    /// Resolve a move from `current` toward `candidate`.
    ///
    /// Tries the full move, then X alone, then Z alone. A single-axis slide
    /// scales speed by the scrape damping; a fully blocked move zeroes it.
    /// A straight push into a wall commits the unchanged axis as a slide, so
    /// the character holds position and loses half its speed.
    pub fn resolve(&self, current: Vec2, candidate: Vec2, speed: f32) -> Resolution {
        if !self.is_blocked(candidate) {
            return Resolution {
                position: candidate,
                speed,
                outcome: MoveOutcome::Free,
            };
        }

        let x_only = Vec2::new(candidate.x, current.y);
        if !self.is_blocked(x_only) {
            return Resolution {
                position: x_only,
                speed: speed * self.scrape_damping,
                outcome: MoveOutcome::SlideX,
            };
        }

        let z_only = Vec2::new(current.x, candidate.y);
        if !self.is_blocked(z_only) {
            return Resolution {
                position: z_only,
                speed: speed * self.scrape_damping,
                outcome: MoveOutcome::SlideZ,
            };
        }

        Resolution {
            position: current,
            speed: 0.0,
            outcome: MoveOutcome::Blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::level::{Pillar, Wall};

    fn arena() -> CollisionWorld {
        CollisionWorld::new(
            vec![
                Collider::Aabb {
                    min: Vec2::new(10.0, -5.0),
                    max: Vec2::new(12.0, 5.0),
                },
                Collider::Circle {
                    center: Vec2::new(-5.0, 0.0),
                    radius: 1.0,
                },
            ],
            Rect::new(Vec2::splat(-20.0), Vec2::splat(20.0)),
            0.5,
        )
    }

    #[test]
    fn free_move_is_committed_unchanged() {
        let world = arena();
        let r = world.resolve(Vec2::ZERO, Vec2::new(0.1, 0.1), 0.14);
        assert_eq!(r.outcome, MoveOutcome::Free);
        assert_eq!(r.position, Vec2::new(0.1, 0.1));
        assert_eq!(r.speed, 0.14);
    }

    #[test]
    fn diagonal_into_wall_slides_along_z() {
        let world = arena();
        let current = Vec2::new(9.95, 0.0);
        let candidate = Vec2::new(10.05, -0.1);
        let r = world.resolve(current, candidate, 0.2);
        assert_eq!(r.outcome, MoveOutcome::SlideZ);
        assert_eq!(r.position.x, current.x);
        assert_eq!(r.position.y, candidate.y);
        assert_eq!(r.speed, 0.1);
    }

    #[test]
    fn diagonal_along_top_edge_slides_along_x() {
        let world = arena();
        let current = Vec2::new(11.0, 5.05);
        let candidate = Vec2::new(11.1, 4.95);
        let r = world.resolve(current, candidate, 0.2);
        assert_eq!(r.outcome, MoveOutcome::SlideX);
        assert_eq!(r.position, Vec2::new(candidate.x, current.y));
    }

    #[test]
    fn straight_push_into_wall_scrapes_in_place() {
        let world = arena();
        let r = world.resolve(Vec2::new(9.95, 0.0), Vec2::new(10.05, 0.0), 0.1);
        assert_eq!(r.outcome, MoveOutcome::SlideZ);
        assert_eq!(r.position, Vec2::new(9.95, 0.0));
        assert_eq!(r.speed, 0.05);
    }

    #[test]
    fn wedged_in_a_corner_is_blocked() {
        let world = CollisionWorld::new(
            vec![
                Collider::Aabb {
                    min: Vec2::new(10.0, -5.0),
                    max: Vec2::new(12.0, 5.0),
                },
                Collider::Aabb {
                    min: Vec2::new(0.0, 5.0),
                    max: Vec2::new(12.0, 7.0),
                },
            ],
            Rect::new(Vec2::splat(-20.0), Vec2::splat(20.0)),
            0.5,
        );
        let current = Vec2::new(9.95, 4.95);
        let r = world.resolve(current, Vec2::new(10.05, 5.05), 0.1);
        assert_eq!(r.outcome, MoveOutcome::Blocked);
        assert_eq!(r.position, current);
        assert_eq!(r.speed, 0.0);
    }

    #[test]
    fn circle_blocks_strictly_inside_radius() {
        let c = Collider::Circle {
            center: Vec2::ZERO,
            radius: 1.0,
        };
        assert!(c.blocks(Vec2::new(0.5, 0.5)));
        assert!(!c.blocks(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn leaving_world_bounds_is_blocked() {
        let world = arena();
        assert!(world.is_blocked(Vec2::new(20.5, 0.0)));
        assert!(!world.is_blocked(Vec2::new(20.0, 0.0)));
    }

    #[test]
    fn from_level_inflates_by_radius() {
        let mut level = LevelDescriptor::showcase();
        level.walls = vec![Wall::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), 2.0)];
        level.pillars = vec![Pillar {
            center: Vec2::new(5.0, 5.0),
            radius: 0.5,
            height: 2.0,
        }];
        let world = CollisionWorld::from_level(&level, 0.25, 0.5);
        assert_eq!(
            world.colliders()[0],
            Collider::Aabb {
                min: Vec2::splat(-0.25),
                max: Vec2::splat(1.25)
            }
        );
        assert_eq!(
            world.colliders()[1],
            Collider::Circle {
                center: Vec2::new(5.0, 5.0),
                radius: 0.75
            }
        );
        assert_eq!(world.walkable().min, level.bounds.min + Vec2::splat(0.25));
    }
}
