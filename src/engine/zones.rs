// Proximity detection for interactive zones.
//
// The nearest zone whose activation radius contains the character is the
// active one. Changes are edge-triggered: `update` only reports a transition
// when the active zone differs from the previous tick.

use glam::Vec2;

use super::level::Zone;

/// A change of the active zone, by index into the level's zone list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneTransition {
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

impl ZoneTransition {
    pub fn entered(&self) -> Option<usize> {
        self.current
    }

    pub fn exited(&self) -> Option<usize> {
        self.previous
    }
}

/// Index of the nearest zone containing `position`, if any.
///
/// Containment is strict (`distance < radius`). On an exact distance tie the
/// earlier zone in list order wins.
pub fn nearest_zone(zones: &[Zone], position: Vec2) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, zone) in zones.iter().enumerate() {
        let d = position.distance(zone.position);
        if d >= zone.radius {
            continue;
        }
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((index, d)),
        }
    }
    best.map(|(index, _)| index)
}

#[derive(Debug, Default)]
pub struct ZoneDetector {
    active: Option<usize>,
}

impl ZoneDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Recompute the active zone. Returns `Some` only when it changed.
    pub fn update(&mut self, zones: &[Zone], position: Vec2) -> Option<ZoneTransition> {
        let current = nearest_zone(zones, position);
        if current == self.active {
            return None;
        }
        let transition = ZoneTransition {
            previous: self.active,
            current,
        };
        self.active = current;
        Some(transition)
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}
