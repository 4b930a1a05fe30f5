//! # SubSink
//!
//! `subsink` is an MQTT subscriber that writes every received message to
//! standard output or to a file whose path is computed from the message.
//!
//! ## Core Modules
//!
//! - `template`: path masks (`/logs/@topic/@date`) and the `%`/`@`/`\` format language.
//! - `output`: the output sink and on-demand directory creation.
//! - `message`: the publish event handed to the output engine.
//! - `config`: settings loading and the per-run `TemplateConfig`.
//! - `client`: the `rumqttc` event loop feeding the sink.
//! - `utils`: error types and logging setup.

pub mod client;
pub mod config;
pub mod message;
pub mod output;
pub mod template;
pub mod utils;
