use super::Event;

/// Receiver of [`Event`]s.
///
/// Implemented for closures `Fn(Event)` and, with the `events` feature, for
/// `crossbeam::channel::Sender<Event>`. Sending never fails from the publisher's
/// point of view: a disconnected receiver just drops the event.
pub trait EventSink {
    fn send(&self, event: Event);
}

impl<F> EventSink for F
where
    F: Fn(Event),
{
    fn send(&self, event: Event) {
        self(event);
    }
}

#[cfg(feature = "events")]
impl EventSink for crossbeam::channel::Sender<Event> {
    fn send(&self, event: Event) {
        if crossbeam::channel::Sender::send(self, event).is_err() {
            log::debug!("event receiver disconnected, dropping event");
        }
    }
}
