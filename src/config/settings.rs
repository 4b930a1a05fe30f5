use serde::Deserialize;

/// Largest packet MQTT can encode (a 4-byte remaining length plus header).
pub const MAX_PACKET_SIZE: usize = 268_435_455 + 5;

/// Top-level configuration settings for the application.
///
/// Includes settings for the broker connection, message output and logging.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub broker: BrokerSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// Configuration settings for the broker connection.
///
/// `client_id` is resolved at startup when left unset, from `id_prefix`
/// if one is given.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BrokerSettings {
    pub host: String,
    pub port: u16,
    pub client_id: Option<String>,
    pub id_prefix: Option<String>,
    pub topics: Vec<String>,
    pub qos: u8,
    pub keep_alive_secs: u64,
    /// A persistent session needs an explicit `client_id`.
    pub clean_session: bool,
    /// Largest packet accepted from or sent to the broker, in bytes.
    pub max_packet_size: usize,
}

/// Configuration settings for message output.
///
/// At most one of `path_mask` and `format_path` may be active.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OutputSettings {
    pub path_mask: Option<String>,
    pub format: Option<String>,
    /// Use `format` to compute the output file path.
    pub format_path: bool,
    pub verbose: bool,
    pub eol: bool,
    pub overwrite: bool,
    pub node_suffix: Option<String>,
    pub skip_retained: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub broker: Option<PartialBrokerSettings>,
    pub output: Option<PartialOutputSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub client_id: Option<String>,
    pub id_prefix: Option<String>,
    pub topics: Option<Vec<String>>,
    pub qos: Option<u8>,
    pub keep_alive_secs: Option<u64>,
    pub clean_session: Option<bool>,
    pub max_packet_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialOutputSettings {
    pub path_mask: Option<String>,
    pub format: Option<String>,
    pub format_path: Option<bool>,
    pub verbose: Option<bool>,
    pub eol: Option<bool>,
    pub overwrite: Option<bool>,
    pub node_suffix: Option<String>,
    pub skip_retained: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
impl Default for Settings {
    fn default() -> Self {
        Self {
            broker: BrokerSettings {
                host: "localhost".to_string(),
                port: 1883,
                client_id: None,
                id_prefix: None,
                topics: Vec::new(),
                qos: 0,
                keep_alive_secs: 60,
                clean_session: true,
                max_packet_size: MAX_PACKET_SIZE,
            },
            output: OutputSettings {
                path_mask: None,
                format: None,
                format_path: false,
                verbose: false,
                eol: true,
                overwrite: false,
                node_suffix: None,
                skip_retained: false,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
