mod settings;

use crate::config::settings::{PartialBrokerSettings, PartialOutputSettings, PartialSettings};
use config::{Config, ConfigError, Environment, File};
use uuid::Uuid;

pub use settings::{BrokerSettings, LoggingSettings, MAX_PACKET_SIZE, OutputSettings, Settings};

/// Prefix of environment variables read by `load_config`,
/// e.g. `SUBSINK_OUTPUT__PATH_MASK`.
pub const ENV_PREFIX: &str = "SUBSINK";

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the broker, output and logging configurations
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("broker.topics")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        broker: merge_broker(partial.broker.as_ref(), default.broker),
        output: merge_output(partial.output.as_ref(), default.output),
        logging: LoggingSettings {
            level: partial
                .logging
                .and_then(|l| l.level)
                .unwrap_or(default.logging.level),
        },
    })
}

fn merge_broker(partial: Option<&PartialBrokerSettings>, default: BrokerSettings) -> BrokerSettings {
    BrokerSettings {
        host: partial
            .and_then(|b| b.host.clone())
            .unwrap_or(default.host),
        port: partial.and_then(|b| b.port).unwrap_or(default.port),
        client_id: partial
            .and_then(|b| b.client_id.clone())
            .or(default.client_id),
        id_prefix: partial
            .and_then(|b| b.id_prefix.clone())
            .or(default.id_prefix),
        topics: partial
            .and_then(|b| b.topics.clone())
            .unwrap_or(default.topics),
        qos: partial.and_then(|b| b.qos).unwrap_or(default.qos),
        keep_alive_secs: partial
            .and_then(|b| b.keep_alive_secs)
            .unwrap_or(default.keep_alive_secs),
        clean_session: partial
            .and_then(|b| b.clean_session)
            .unwrap_or(default.clean_session),
        max_packet_size: partial
            .and_then(|b| b.max_packet_size)
            .unwrap_or(default.max_packet_size),
    }
}

fn merge_output(partial: Option<&PartialOutputSettings>, default: OutputSettings) -> OutputSettings {
    OutputSettings {
        path_mask: partial
            .and_then(|o| o.path_mask.clone())
            .or(default.path_mask),
        format: partial.and_then(|o| o.format.clone()).or(default.format),
        format_path: partial
            .and_then(|o| o.format_path)
            .unwrap_or(default.format_path),
        verbose: partial
            .and_then(|o| o.verbose)
            .unwrap_or(default.verbose),
        eol: partial.and_then(|o| o.eol).unwrap_or(default.eol),
        overwrite: partial
            .and_then(|o| o.overwrite)
            .unwrap_or(default.overwrite),
        node_suffix: partial
            .and_then(|o| o.node_suffix.clone())
            .or(default.node_suffix),
        skip_retained: partial
            .and_then(|o| o.skip_retained)
            .unwrap_or(default.skip_retained),
    }
}

/// Returns the client id the session connects with, which is also what
/// `@id` expands to.
///
/// A configured id wins. Otherwise an id prefix yields `<prefix><pid>`, and
/// with neither the id is `subsink-<12 hex digits>`.
pub fn resolve_client_id(broker: &BrokerSettings) -> String {
    match (non_empty(&broker.client_id), non_empty(&broker.id_prefix)) {
        (Some(id), _) => id.to_string(),
        (None, Some(prefix)) => format!("{prefix}{}", std::process::id()),
        (None, None) => {
            let uuid = Uuid::new_v4().simple().to_string();
            format!("subsink-{}", &uuid[..12])
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Rejects broker settings that cannot form a valid session.
pub fn validate_broker(broker: &BrokerSettings) -> Result<(), ConfigError> {
    if !broker.clean_session && non_empty(&broker.client_id).is_none() {
        return Err(ConfigError::Message(
            "a persistent session (clean_session = false) requires an explicit client id".into(),
        ));
    }
    Ok(())
}

/// Where a message ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Standard output, formatted with the template if one is given.
    Stream { format: Option<String> },
    /// A file whose path is the expanded mask.
    MaskFile { mask: String },
    /// A file whose path is the expanded format template.
    FormatFile { template: String },
}

/// Per-run output context, frozen at startup and passed to every
/// formatting call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    pub mode: OutputMode,
    pub verbose: bool,
    pub eol: bool,
    pub overwrite: bool,
    pub node_suffix: Option<String>,
    pub skip_retained: bool,
    pub client_id: String,
    /// Addressable from masks as `topic1`..`topic9`.
    pub subscribed_topics: Vec<String>,
}

impl TemplateConfig {
    /// A stream configuration with default flags.
    pub fn new(mode: OutputMode, client_id: impl Into<String>, subscribed_topics: Vec<String>) -> Self {
        let output = Settings::default().output;
        Self {
            mode,
            verbose: output.verbose,
            eol: output.eol,
            overwrite: output.overwrite,
            node_suffix: output.node_suffix,
            skip_retained: output.skip_retained,
            client_id: client_id.into(),
            subscribed_topics,
        }
    }

    /// Validates output settings and picks the output mode.
    pub fn from_settings(
        output: &OutputSettings,
        client_id: impl Into<String>,
        subscribed_topics: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let mode = match (&output.path_mask, &output.format, output.format_path) {
            (Some(mask), _, _) if mask.is_empty() => {
                return Err(ConfigError::Message("path mask must not be empty".into()));
            }
            (Some(_), _, true) => {
                return Err(ConfigError::Message(
                    "path mask and format-path mode are mutually exclusive".into(),
                ));
            }
            (Some(_), Some(_), false) => {
                return Err(ConfigError::Message(
                    "path mask and format template are mutually exclusive".into(),
                ));
            }
            (Some(mask), None, false) => OutputMode::MaskFile { mask: mask.clone() },
            (None, Some(template), true) => OutputMode::FormatFile {
                template: template.clone(),
            },
            (None, None, true) => {
                return Err(ConfigError::Message(
                    "format-path mode requires a format template".into(),
                ));
            }
            (None, format, false) => OutputMode::Stream {
                format: format.clone(),
            },
        };

        Ok(Self {
            mode,
            verbose: output.verbose,
            eol: output.eol,
            overwrite: output.overwrite,
            node_suffix: output.node_suffix.clone().filter(|s| !s.is_empty()),
            skip_retained: output.skip_retained,
            client_id: client_id.into(),
            subscribed_topics,
        })
    }
}

#[cfg(test)]
mod tests;
