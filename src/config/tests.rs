use super::settings::Settings;
use super::*;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.broker.host, "localhost");
    assert_eq!(settings.broker.port, 1883);
    assert!(settings.broker.client_id.is_none());
    assert!(settings.output.eol);
    assert!(!settings.output.overwrite);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [broker]
        host = "broker.local"
        port = 8883
        id_prefix = "edge-"
        clean_session = false
        max_packet_size = 65536
        topics = ["sensors/#", "alerts"]

        [output]
        path_mask = "/var/log/mqtt/@topic/@date"
        overwrite = true
        node_suffix = "log"
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();
    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.broker.host, "broker.local");
    assert_eq!(cfg.broker.port, 8883);
    assert_eq!(cfg.broker.topics, vec!["sensors/#", "alerts"]);
    assert_eq!(cfg.broker.qos, 0);
    assert_eq!(cfg.broker.id_prefix.as_deref(), Some("edge-"));
    assert!(!cfg.broker.clean_session);
    assert_eq!(cfg.broker.max_packet_size, 65536);
    assert_eq!(
        cfg.output.path_mask.as_deref(),
        Some("/var/log/mqtt/@topic/@date")
    );
    assert!(cfg.output.overwrite);
    assert!(cfg.output.eol);
    assert_eq!(cfg.output.node_suffix.as_deref(), Some("log"));
}

#[test]
#[serial]
fn load_config_reads_prefixed_environment() {
    temp_env::with_vars(
        [
            ("SUBSINK_BROKER__PORT", Some("1999")),
            ("SUBSINK_BROKER__TOPICS", Some("a/b,c/d")),
            ("SUBSINK_OUTPUT__FORMAT", Some("%t %p")),
            ("SUBSINK_OUTPUT__VERBOSE", Some("true")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.broker.port, 1999);
            assert_eq!(cfg.broker.topics, vec!["a/b", "c/d"]);
            assert_eq!(cfg.output.format.as_deref(), Some("%t %p"));
            assert!(cfg.output.verbose);
            assert_eq!(cfg.broker.host, "localhost");
        },
    );
}

#[test]
fn resolve_client_id_prefers_configured() {
    let mut broker = Settings::default().broker;
    broker.client_id = Some("sub1".into());
    broker.id_prefix = Some("ignored-".into());
    assert_eq!(resolve_client_id(&broker), "sub1");

    broker.client_id = None;
    broker.id_prefix = None;
    let generated = resolve_client_id(&broker);
    assert!(generated.starts_with("subsink-"));
    assert_eq!(generated.len(), "subsink-".len() + 12);

    broker.client_id = Some(String::new());
    assert!(resolve_client_id(&broker).starts_with("subsink-"));
}

#[test]
fn resolve_client_id_appends_pid_to_prefix() {
    let mut broker = Settings::default().broker;
    broker.id_prefix = Some("logger-".into());
    assert_eq!(
        resolve_client_id(&broker),
        format!("logger-{}", std::process::id())
    );
}

#[test]
fn id_prefix_reaches_the_id_token() {
    let mut broker = Settings::default().broker;
    broker.id_prefix = Some("node".into());
    let output = Settings::default().output;

    let cfg = TemplateConfig::from_settings(&output, resolve_client_id(&broker), vec![]).unwrap();
    assert_eq!(cfg.client_id, format!("node{}", std::process::id()));
}

#[test]
fn persistent_session_requires_explicit_client_id() {
    let mut broker = Settings::default().broker;
    assert!(validate_broker(&broker).is_ok());

    broker.clean_session = false;
    broker.id_prefix = Some("node".into());
    let err = validate_broker(&broker).unwrap_err();
    assert!(err.to_string().contains("client id"));

    broker.client_id = Some("sub1".into());
    assert!(validate_broker(&broker).is_ok());
}

#[test]
fn broker_defaults_allow_large_packets() {
    let broker = Settings::default().broker;
    assert!(broker.clean_session);
    assert!(broker.id_prefix.is_none());
    assert_eq!(broker.max_packet_size, MAX_PACKET_SIZE);
    assert!(broker.max_packet_size > 256 * 1024 * 1024);
}

#[test]
fn template_config_picks_stream_by_default() {
    let output = Settings::default().output;
    let cfg = TemplateConfig::from_settings(&output, "sub1", vec![]).unwrap();
    assert_eq!(cfg.mode, OutputMode::Stream { format: None });
    assert_eq!(cfg.client_id, "sub1");
}

#[test]
fn template_config_picks_mask_file() {
    let mut output = Settings::default().output;
    output.path_mask = Some("out/@topic".into());
    output.node_suffix = Some(String::new());

    let cfg = TemplateConfig::from_settings(&output, "sub1", vec![]).unwrap();
    assert_eq!(
        cfg.mode,
        OutputMode::MaskFile {
            mask: "out/@topic".into()
        }
    );
    assert!(cfg.node_suffix.is_none());
}

#[test]
fn template_config_picks_format_file() {
    let mut output = Settings::default().output;
    output.format = Some("logs/%t".into());
    output.format_path = true;

    let cfg = TemplateConfig::from_settings(&output, "sub1", vec![]).unwrap();
    assert_eq!(
        cfg.mode,
        OutputMode::FormatFile {
            template: "logs/%t".into()
        }
    );
}

#[test]
fn template_config_rejects_conflicting_outputs() {
    let mut output = Settings::default().output;
    output.path_mask = Some("a/@topic".into());
    output.format = Some("%p".into());
    assert!(TemplateConfig::from_settings(&output, "id", vec![]).is_err());

    output.format_path = true;
    assert!(TemplateConfig::from_settings(&output, "id", vec![]).is_err());

    output.path_mask = None;
    output.format = None;
    assert!(TemplateConfig::from_settings(&output, "id", vec![]).is_err());

    output.format_path = false;
    output.path_mask = Some(String::new());
    assert!(TemplateConfig::from_settings(&output, "id", vec![]).is_err());
}
