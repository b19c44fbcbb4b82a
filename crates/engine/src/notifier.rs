//! Deferred change notifications.
//!
//! A commit never calls listeners inline. It queues a [`ValueChanged`] on an
//! unbounded channel and the host drains the receiver on its own event-loop
//! turn, so a listener that writes the same model cannot re-enter the picker
//! mid-update.

use tokio::sync::mpsc;

use pickerkit_domain::TemporalValue;

use crate::picker::PickerKind;

/// A committed value, as seen by change listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueChanged {
    pub source: PickerKind,
    pub value: TemporalValue,
}

#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: Option<mpsc::UnboundedSender<ValueChanged>>,
}

impl ChangeNotifier {
    /// A notifier and the receiver the host listens on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ValueChanged>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier with no listener; notifications are dropped.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn notify(&self, source: PickerKind, value: TemporalValue) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(ValueChanged { source, value }).is_err() {
            tracing::debug!(source = %source, "Change listener gone; notification dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickerkit_domain::Zone;

    fn value() -> TemporalValue {
        TemporalValue::from_parts(2024, 0, 10, 0, 0, 0, Zone::utc())
    }

    #[test]
    fn notification_is_queued_not_delivered_inline() {
        let (notifier, mut rx) = ChangeNotifier::channel();
        notifier.notify(PickerKind::Date, value());
        let event = rx.try_recv().unwrap();
        assert_eq!(event.source, PickerKind::Date);
        assert_eq!(event.value, value());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn listener_receives_on_a_later_turn() {
        let (notifier, mut rx) = ChangeNotifier::channel();
        let listener = tokio::spawn(async move { rx.recv().await });
        notifier.notify(PickerKind::Time, value());
        let event = listener.await.unwrap().unwrap();
        assert_eq!(event.source, PickerKind::Time);
    }

    #[test]
    fn dropped_receiver_is_harmless() {
        let (notifier, rx) = ChangeNotifier::channel();
        drop(rx);
        notifier.notify(PickerKind::Date, value());
        ChangeNotifier::disabled().notify(PickerKind::Date, value());
    }
}
