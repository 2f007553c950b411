// Frame loop: the engine controller that owns all exploration state.
//
// Per tick, in order:
//   1. count down a pending panel close
//   2. consume confirm/cancel edges (Explore <-> Modal)
//   3. Explore only: movement -> collision -> camera -> zone detection
//   4. cosmetic effects (always)
//   5. telemetry (always)
//
// The host calls `tick` from its per-frame redraw callback and reschedules the
// next frame itself; nothing here blocks or loops.

use glam::{Vec2, Vec3};
use log::{debug, info};
use thiserror::Error;
use winit::event::WindowEvent;

use super::camera::{CameraPose, FollowCamera};
use super::collision::CollisionWorld;
use super::config::{ConfigError, EngineConfig};
use super::events::{EngineEvent, EngineObserver, Notifier, Telemetry, ZoneSummary};
use super::input::{Action, InputState};
use super::interaction::{EngineState, InteractionMachine};
use super::level::{LevelDescriptor, LevelError, Zone, ZoneContent};
use super::movement::{self, Character};
use super::systems::{EffectField, EffectInstance};
use super::zones::ZoneDetector;

/// Resolved character pose for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterPose {
    /// World position; `y` carries the walk bob.
    pub position: Vec3,
    pub heading: f32,
}

/// Everything the rendering surface applies for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub character: CharacterPose,
    pub camera: CameraPose,
    pub telemetry: Telemetry,
}

/// Reasons an engine refuses to construct.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Level(#[from] LevelError),
}

pub struct Engine {
    config: EngineConfig,
    level: LevelDescriptor,
    collision: CollisionWorld,

    character: Character,
    input: InputState,
    interaction: InteractionMachine,
    camera: FollowCamera,
    zones: ZoneDetector,
    effects: EffectField,
    notifier: Notifier,

    running: bool,
    elapsed: f32,
    /// Last (zone, prompt) pair sent to observers.
    published_zone: (Option<usize>, bool),
}

impl Engine {
    /// Load the level and place the character at its spawn point.
    pub fn new(config: EngineConfig, level: LevelDescriptor) -> Result<Self, EngineError> {
        config.validate()?;
        level.validate()?;

        let collision =
            CollisionWorld::from_level(&level, config.character_radius, config.scrape_damping);
        let spawn = level.spawn.unwrap_or(config.spawn_position);
        if collision.is_blocked(spawn) {
            return Err(LevelError::BlockedSpawn(spawn).into());
        }

        info!(
            "level loaded: {} walls, {} pillars, {} zones",
            level.walls.len(),
            level.pillars.len(),
            level.zones.len()
        );

        Ok(Self {
            character: Character::spawn(spawn, config.spawn_heading),
            input: InputState::new(),
            interaction: InteractionMachine::new(config.close_delay),
            camera: FollowCamera::new(&config),
            zones: ZoneDetector::new(),
            effects: EffectField::new(),
            notifier: Notifier::default(),
            running: false,
            elapsed: 0.0,
            published_zone: (None, false),
            config,
            level,
            collision,
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.elapsed = 0.0;
        self.camera.snap_to(&self.character);
        self.effects.spawn_decorations(&self.level);
        info!(
            "engine started at ({:.2}, {:.2})",
            self.character.position.x, self.character.position.y
        );
    }

    /// Cancel pending work, release input and drop every observer.
    /// Ticks after this return `None`.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.interaction.cancel_pending();
        self.input.release_all();
        self.notifier.clear();
        self.effects.clear();
        info!("engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn subscribe(&mut self, observer: Box<dyn EngineObserver>) {
        self.notifier.subscribe(observer);
    }

    // ------------------------------------------------------------------
    // Input and UI signals
    // ------------------------------------------------------------------

    /// Keyboard path. Returns true if the event mapped to an action.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.running && self.input.process_event(event)
    }

    /// Touch buttons and any other action source.
    pub fn set_action(&mut self, action: Action, pressed: bool) {
        if self.running {
            self.input.set(action, pressed);
        }
    }

    /// External confirm signal from the UI layer.
    pub fn confirm(&mut self) -> bool {
        self.running && self.try_open()
    }

    /// External close signal (backdrop click, close button).
    pub fn close(&mut self) -> bool {
        self.running && self.try_close()
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance one display frame. `dt` is the elapsed time in seconds since
    /// the previous tick. Returns `None` once the engine has been stopped.
    pub fn tick(&mut self, dt: f32) -> Option<FrameOutput> {
        if !self.running {
            return None;
        }
        let dt = dt.max(0.0);
        self.elapsed += dt;

        if let Some(zone) = self.interaction.advance(dt) {
            debug!("exploring resumed at zone `{}`", self.level.zones[zone].id);
            self.publish_zone();
        }

        let confirm = self.input.take_confirm();
        let cancel = self.input.take_cancel();
        if self.interaction.is_exploring() {
            if confirm {
                self.try_open();
            }
        } else if cancel {
            self.try_close();
        }

        if self.interaction.is_exploring() {
            self.step_explore();
        }

        self.effects.advance(self.elapsed);

        let telemetry = self.telemetry();
        self.notifier
            .emit(EngineEvent::TelemetryUpdated(telemetry.clone()));

        Some(FrameOutput {
            character: self.character_pose(),
            camera: self.camera.pose(),
            telemetry,
        })
    }

    fn step_explore(&mut self) {
        let modal = self.interaction.state().is_modal();
        let intent = self.input.movement(modal);

        let start = self.character.position;
        let candidate = movement::integrate(&mut self.character, intent, &self.config);
        let resolved = self.collision.resolve(start, candidate, self.character.speed);
        self.character.position = resolved.position;
        self.character.speed = resolved.speed;
        movement::advance_phase(&mut self.character, start.distance(resolved.position), &self.config);

        self.camera.update(&self.character);

        if let Some(transition) = self.zones.update(&self.level.zones, self.character.position) {
            if let Some(left) = transition.exited() {
                debug!("left zone `{}`", self.level.zones[left].id);
            }
            if let Some(entered) = transition.entered() {
                debug!("entered zone `{}`", self.level.zones[entered].id);
            }
            self.interaction.set_near(transition.current);
            self.publish_zone();
        }
    }

    fn try_open(&mut self) -> bool {
        let Some(index) = self.interaction.open() else {
            return false;
        };
        self.character.speed = 0.0;

        let zone = &self.level.zones[index];
        info!("panel opened: `{}`", zone.id);
        self.notifier.emit(EngineEvent::ModalOpened {
            zone_id: zone.id.clone(),
            content: zone.content.clone(),
        });
        self.publish_zone();
        true
    }

    fn try_close(&mut self) -> bool {
        let Some(index) = self.interaction.request_close() else {
            return false;
        };
        let zone_id = self.level.zones[index].id.clone();
        info!("panel closing: `{}`", zone_id);
        self.notifier.emit(EngineEvent::ModalClosed { zone_id });
        true
    }

    /// Emit `ZoneChanged` if the active zone or prompt visibility changed.
    fn publish_zone(&mut self) {
        let active = self.zones.active();
        let show_prompt = active.is_some() && self.interaction.is_exploring();
        if self.published_zone == (active, show_prompt) {
            return;
        }
        self.published_zone = (active, show_prompt);

        let zone = active.map(|i| {
            let z = &self.level.zones[i];
            ZoneSummary {
                id: z.id.clone(),
                label: z.label.clone(),
                subtitle: z.subtitle.clone(),
            }
        });
        self.notifier.emit(EngineEvent::ZoneChanged { zone, show_prompt });
    }

    // ------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            x: self.character.position.x,
            z: self.character.position.y,
            heading: self.character.heading,
            speed: self.character.speed,
            zone_label: self.active_zone().map(|z| z.label.clone()),
            modal_open: self.interaction.state().is_modal(),
        }
    }

    pub fn character_pose(&self) -> CharacterPose {
        let p = self.character.position;
        CharacterPose {
            position: Vec3::new(p.x, self.character.bob(self.config.bob_height), p.y),
            heading: self.character.heading,
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn position(&self) -> Vec2 {
        self.character.position
    }

    pub fn state(&self) -> EngineState {
        self.interaction.state()
    }

    pub fn active_zone(&self) -> Option<&Zone> {
        self.zones.active().map(|i| &self.level.zones[i])
    }

    /// Content of the open panel, if any.
    pub fn modal_content(&self) -> Option<&ZoneContent> {
        match self.interaction.state() {
            EngineState::Modal { zone } => Some(&self.level.zones[zone].content),
            EngineState::Explore { .. } => None,
        }
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn level(&self) -> &LevelDescriptor {
        &self.level
    }

    pub fn collision(&self) -> &CollisionWorld {
        &self.collision
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn effect_instances(&mut self) -> Vec<EffectInstance> {
        self.effects.instances()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{Receiver, channel};

    const DT: f32 = 1.0 / 60.0;

    fn engine() -> (Engine, Receiver<EngineEvent>) {
        let mut engine = Engine::new(EngineConfig::default(), LevelDescriptor::showcase()).unwrap();
        let (tx, rx) = channel();
        engine.subscribe(Box::new(tx));
        engine.start();
        (engine, rx)
    }

    fn drain(rx: &Receiver<EngineEvent>) -> Vec<EngineEvent> {
        rx.try_iter()
            .filter(|e| !matches!(e, EngineEvent::TelemetryUpdated(_)))
            .collect()
    }

    #[test]
    fn tick_before_start_and_after_stop_is_none() {
        let mut engine = Engine::new(EngineConfig::default(), LevelDescriptor::showcase()).unwrap();
        assert!(engine.tick(DT).is_none());
        engine.start();
        assert!(engine.tick(DT).is_some());
        engine.stop();
        assert!(engine.tick(DT).is_none());
    }

    #[test]
    fn spawn_inside_a_wall_is_rejected() {
        let mut level = LevelDescriptor::showcase();
        level.spawn = Some(Vec2::new(-3.5, 10.0));
        assert!(matches!(
            Engine::new(EngineConfig::default(), level),
            Err(EngineError::Level(LevelError::BlockedSpawn(_)))
        ));
    }

    #[test]
    fn out_of_range_tuning_is_rejected() {
        let config = EngineConfig {
            camera_smoothing: 3.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::new(config, LevelDescriptor::showcase()),
            Err(EngineError::Config(ConfigError::Invalid {
                field: "camera_smoothing",
                ..
            }))
        ));

        let config = EngineConfig {
            friction: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::new(config, LevelDescriptor::showcase()),
            Err(EngineError::Config(ConfigError::Invalid { field: "friction", .. }))
        ));
    }

    #[test]
    fn stop_deregisters_observers() {
        let mut level = LevelDescriptor::showcase();
        level.spawn = Some(level.zone("contact").unwrap().position);
        let mut engine = Engine::new(EngineConfig::default(), level).unwrap();
        let (tx, rx) = channel();
        engine.subscribe(Box::new(tx));
        engine.start();
        engine.tick(DT);
        assert!(rx.try_iter().count() > 0);

        engine.stop();
        engine.start();
        engine.tick(DT);
        assert!(engine.confirm());
        engine.tick(DT);
        assert!(engine.close());
        engine.tick(1.0);
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn telemetry_is_published_every_tick() {
        let (mut engine, rx) = engine();
        for _ in 0..5 {
            engine.tick(DT);
        }
        let count = rx
            .try_iter()
            .filter(|e| matches!(e, EngineEvent::TelemetryUpdated(_)))
            .count();
        assert_eq!(count, 5);
    }

    #[test]
    fn forward_moves_toward_negative_z() {
        let (mut engine, _rx) = engine();
        let start = engine.position();
        engine.set_action(Action::Forward, true);
        for _ in 0..30 {
            engine.tick(DT);
        }
        assert!(engine.position().y < start.y);
        assert_eq!(engine.position().x, start.x);
    }

    #[test]
    fn stop_cancels_a_pending_close() {
        let mut level = LevelDescriptor::showcase();
        level.spawn = Some(level.zone("studio").unwrap().position);
        let mut engine = Engine::new(EngineConfig::default(), level).unwrap();
        engine.start();
        engine.tick(DT);
        assert!(engine.confirm());
        assert!(engine.close());
        engine.stop();
        assert!(engine.state().is_modal());
        assert!(engine.tick(1.0).is_none());
        assert!(engine.state().is_modal());
    }

    #[test]
    fn opening_hides_the_prompt_and_resume_restores_it() {
        let mut level = LevelDescriptor::showcase();
        level.spawn = Some(level.zone("work").unwrap().position);
        let mut engine = Engine::new(EngineConfig::default(), level).unwrap();
        let (tx, rx) = channel();
        engine.subscribe(Box::new(tx));
        engine.start();

        engine.tick(DT);
        engine.set_action(Action::Confirm, true);
        engine.tick(DT);
        engine.set_action(Action::Confirm, false);
        engine.set_action(Action::Cancel, true);
        engine.tick(DT);
        engine.tick(0.5);

        let events = drain(&rx);
        let prompts: Vec<bool> = events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::ZoneChanged { show_prompt, .. } => Some(*show_prompt),
                _ => None,
            })
            .collect();
        assert_eq!(prompts, vec![true, false, true]);
        assert!(events.iter().any(|e| matches!(e, EngineEvent::ModalOpened { zone_id, .. } if zone_id == "work")));
        assert!(events.iter().any(|e| matches!(e, EngineEvent::ModalClosed { zone_id } if zone_id == "work")));
        assert!(!engine.state().is_modal());
    }
}
