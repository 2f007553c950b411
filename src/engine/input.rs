// Input state tracking for keyboard and touch controls
// Abstracts winit events into a fixed set of named actions read once per tick

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// The six actions the exploration engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Confirm,
    Cancel,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Forward,
        Action::Backward,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Confirm,
        Action::Cancel,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Keyboard binding. Unbound keys return `None`.
    pub fn from_key(key: KeyCode) -> Option<Action> {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Action::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Action::Backward),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(Action::TurnLeft),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(Action::TurnRight),
            KeyCode::KeyE | KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space => {
                Some(Action::Confirm)
            }
            KeyCode::Escape | KeyCode::Backspace => Some(Action::Cancel),
            _ => None,
        }
    }

    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Action::Forward | Action::Backward | Action::TurnLeft | Action::TurnRight
        )
    }
}

/// Held movement actions for one tick, already gated by the interaction state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl MovementIntent {
    pub const IDLE: MovementIntent = MovementIntent {
        forward: false,
        backward: false,
        turn_left: false,
        turn_right: false,
    };
}

/// Per-action flags. Always fully populated: every action has a slot.
///
/// Setting a flag that is already set has no effect, so key repeat and
/// duplicate touch events are harmless. Confirm and cancel also latch their
/// rising edge so one press triggers exactly one transition.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    held: [bool; 6],
    confirm_edge: bool,
    cancel_edge: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a winit WindowEvent into the input state.
    /// Returns true if the event was mapped to an action.
    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return false;
                };
                let Some(action) = Action::from_key(key) else {
                    return false;
                };
                self.set(action, event.state == ElementState::Pressed);
                true
            }
            WindowEvent::Focused(false) => {
                self.release_all();
                false
            }
            _ => false,
        }
    }

    /// Single entry point for every input source (keys and touch buttons).
    pub fn set(&mut self, action: Action, pressed: bool) {
        let slot = &mut self.held[action.index()];
        let rising = pressed && !*slot;
        *slot = pressed;

        if rising {
            match action {
                Action::Confirm => self.confirm_edge = true,
                Action::Cancel => self.cancel_edge = true,
                _ => {}
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held[action.index()]
    }

    /// Consume a pending confirm press.
    pub fn take_confirm(&mut self) -> bool {
        std::mem::take(&mut self.confirm_edge)
    }

    /// Consume a pending cancel press.
    pub fn take_cancel(&mut self) -> bool {
        std::mem::take(&mut self.cancel_edge)
    }

    /// Movement actions as seen by the integrator. While a panel is open
    /// every movement flag reads as released, whatever is physically held.
    pub fn movement(&self, modal_open: bool) -> MovementIntent {
        if modal_open {
            return MovementIntent::IDLE;
        }
        MovementIntent {
            forward: self.is_held(Action::Forward),
            backward: self.is_held(Action::Backward),
            turn_left: self.is_held(Action::TurnLeft),
            turn_right: self.is_held(Action::TurnRight),
        }
    }

    /// Clear every flag and pending edge (focus loss, teardown).
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

/// Events that only ever clear held state. The host forwards these to the
/// engine even when the overlay consumed them, so no flag stays stuck.
pub fn releases_input(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::KeyboardInput { event, .. } => event.state == ElementState::Released,
        WindowEvent::Focused(focused) => !focused,
        _ => false,
    }
}
