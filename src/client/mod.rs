//! The `client` module connects to the broker and feeds every incoming
//! publish to an `OutputSink`, one message at a time.
//!
//! Connection handling and subscription state belong to `rumqttc`; this
//! module only wires its event loop to the output engine.

pub mod mqtt;

pub use mqtt::{Session, mqtt_options, qos_from_level};

#[cfg(test)]
mod tests;
