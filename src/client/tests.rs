use super::mqtt::subscribe_filters;
use super::*;
use crate::config::{OutputMode, Settings, TemplateConfig};
use crate::output::OutputSink;
use crate::template::SystemClock;
use crate::utils::error::SessionError;
use rumqttc::QoS;

#[test]
fn test_qos_from_level() {
    assert_eq!(qos_from_level(0), QoS::AtMostOnce);
    assert_eq!(qos_from_level(1), QoS::AtLeastOnce);
    assert_eq!(qos_from_level(2), QoS::ExactlyOnce);
    assert_eq!(qos_from_level(9), QoS::ExactlyOnce);
}

#[test]
fn test_mqtt_options_from_settings() {
    let mut broker = Settings::default().broker;
    broker.host = "broker.local".to_string();
    broker.port = 1999;

    let options = mqtt_options(&broker, "sub1");
    assert_eq!(options.client_id(), "sub1");
    assert_eq!(options.broker_address(), ("broker.local".to_string(), 1999));
    assert!(options.clean_session());
    assert_eq!(options.keep_alive(), std::time::Duration::from_secs(60));
}

#[test]
fn test_mqtt_options_accept_large_publishes() {
    let broker = Settings::default().broker;
    let options = mqtt_options(&broker, "sub1");
    assert_eq!(options.max_packet_size(), broker.max_packet_size);
    assert!(options.max_packet_size() > 20 * 1024);

    let mut broker = broker;
    broker.max_packet_size = 4096;
    assert_eq!(mqtt_options(&broker, "sub1").max_packet_size(), 4096);
}

#[test]
fn test_mqtt_options_persistent_session() {
    let mut broker = Settings::default().broker;
    broker.clean_session = false;
    broker.keep_alive_secs = 2;

    let options = mqtt_options(&broker, "sub1");
    assert!(!options.clean_session());
    assert_eq!(options.keep_alive(), std::time::Duration::from_secs(5));
}

#[test]
fn test_subscribe_filters_keep_order() {
    let mut broker = Settings::default().broker;
    broker.topics = vec!["a/#".to_string(), "b/+".to_string()];
    broker.qos = 1;

    let filters = subscribe_filters(&broker);
    let paths: Vec<_> = filters.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["a/#", "b/+"]);
    assert!(filters.iter().all(|f| f.qos == QoS::AtLeastOnce));
}

#[tokio::test]
async fn test_session_requires_topics() {
    let broker = Settings::default().broker;
    let cfg = TemplateConfig::new(OutputMode::Stream { format: None }, "sub1", vec![]);
    let sink = OutputSink::new(cfg, Box::new(SystemClock), Vec::new());

    assert!(matches!(
        Session::new(&broker, "sub1", sink),
        Err(SessionError::NoTopics)
    ));
}
