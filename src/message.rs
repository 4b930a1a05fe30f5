//! The incoming publish event handed to the output engine.

use rumqttc::{Publish, QoS};

/// A message as delivered by the MQTT runtime.
///
/// The engine only borrows it for the duration of one formatting pass.
///
/// # Example
///
/// ```rust
/// use subsink::message::Message;
///
/// let msg = Message {
///     topic: "sensors/kitchen",
///     payload: b"{\"temp\":21}",
///     qos: 1,
///     retain: false,
///     mid: 42,
/// };
/// assert_eq!(msg.payload.len(), 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message<'a> {
    pub topic: &'a str,
    pub payload: &'a [u8],
    pub qos: u8,
    pub retain: bool,
    /// Packet identifier, only meaningful when `qos > 0`.
    pub mid: u16,
}

impl<'a> From<&'a Publish> for Message<'a> {
    fn from(publish: &'a Publish) -> Self {
        Self {
            topic: &publish.topic,
            payload: &publish.payload,
            qos: qos_level(publish.qos),
            retain: publish.retain,
            mid: publish.pkid,
        }
    }
}

pub fn qos_level(qos: QoS) -> u8 {
    match qos {
        QoS::AtMostOnce => 0,
        QoS::AtLeastOnce => 1,
        QoS::ExactlyOnce => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_publish_borrows_fields() {
        let mut publish = Publish::new("a/b", QoS::ExactlyOnce, "hello");
        publish.retain = true;
        publish.pkid = 7;

        let msg = Message::from(&publish);
        assert_eq!(msg.topic, "a/b");
        assert_eq!(msg.payload, b"hello");
        assert_eq!(msg.qos, 2);
        assert!(msg.retain);
        assert_eq!(msg.mid, 7);
    }
}
