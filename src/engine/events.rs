// Push-style notifications from the engine to the presentation layer.
//
// The engine never looks up UI elements. Observers subscribe and receive typed
// events; with no observers every notification is a no-op.

use std::sync::mpsc::Sender;

use super::level::ZoneContent;

/// What the UI needs to label the active zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSummary {
    pub id: String,
    pub label: String,
    pub subtitle: String,
}

/// Live read-only telemetry, published every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub x: f32,
    pub z: f32,
    pub heading: f32,
    pub speed: f32,
    pub zone_label: Option<String>,
    pub modal_open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The active zone or the interact prompt visibility changed.
    ZoneChanged {
        zone: Option<ZoneSummary>,
        show_prompt: bool,
    },
    ModalOpened {
        zone_id: String,
        content: ZoneContent,
    },
    ModalClosed {
        zone_id: String,
    },
    TelemetryUpdated(Telemetry),
}

pub trait EngineObserver {
    fn notify(&mut self, event: &EngineEvent);
}

/// A dropped receiver means the UI went away; events are discarded.
impl EngineObserver for Sender<EngineEvent> {
    fn notify(&mut self, event: &EngineEvent) {
        let _ = self.send(event.clone());
    }
}

#[derive(Default)]
pub struct Notifier {
    observers: Vec<Box<dyn EngineObserver>>,
}

impl Notifier {
    pub fn subscribe(&mut self, observer: Box<dyn EngineObserver>) {
        self.observers.push(observer);
    }

    pub fn emit(&mut self, event: EngineEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    fn closed(id: &str) -> EngineEvent {
        EngineEvent::ModalClosed {
            zone_id: id.to_string(),
        }
    }

    #[test]
    fn emitting_without_observers_is_a_no_op() {
        let mut notifier = Notifier::default();
        notifier.emit(closed("a"));
        assert!(notifier.is_empty());
    }

    #[test]
    fn channel_observer_receives_events() {
        let (tx, rx) = channel();
        let mut notifier = Notifier::default();
        notifier.subscribe(Box::new(tx));
        notifier.emit(closed("a"));
        assert_eq!(rx.try_recv().unwrap(), closed("a"));
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (tx, rx) = channel();
        drop(rx);
        let mut notifier = Notifier::default();
        notifier.subscribe(Box::new(tx));
        notifier.emit(closed("a"));
        assert_eq!(notifier.len(), 1);
    }
}
