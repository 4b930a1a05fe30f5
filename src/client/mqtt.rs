use std::io::Write;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, SubscribeFilter};
use tracing::{debug, info, warn};

use crate::config::BrokerSettings;
use crate::message::Message;
use crate::output::OutputSink;
use crate::utils::error::SessionError;

/// Capacity of the request channel between the client handle and its event loop.
const REQUEST_CAPACITY: usize = 10;

/// Pause before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

pub fn qos_from_level(level: u8) -> QoS {
    match level {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        _ => QoS::ExactlyOnce,
    }
}

pub fn mqtt_options(broker: &BrokerSettings, client_id: &str) -> MqttOptions {
    let mut options = MqttOptions::new(client_id, broker.host.clone(), broker.port);
    options
        .set_keep_alive(Duration::from_secs(broker.keep_alive_secs.max(5)))
        .set_clean_session(broker.clean_session)
        .set_max_packet_size(broker.max_packet_size, broker.max_packet_size);
    options
}

pub fn subscribe_filters(broker: &BrokerSettings) -> Vec<SubscribeFilter> {
    let qos = qos_from_level(broker.qos);
    broker
        .topics
        .iter()
        .map(|topic| SubscribeFilter::new(topic.clone(), qos))
        .collect()
}

/// A subscriber session: the MQTT client, its event loop and the sink every
/// incoming publish is handed to.
pub struct Session<W: Write> {
    client: AsyncClient,
    eventloop: EventLoop,
    filters: Vec<SubscribeFilter>,
    sink: OutputSink<W>,
}

impl<W: Write> Session<W> {
    pub fn new(broker: &BrokerSettings, client_id: &str, sink: OutputSink<W>) -> Result<Self, SessionError> {
        let filters = subscribe_filters(broker);
        if filters.is_empty() {
            return Err(SessionError::NoTopics);
        }

        let (client, eventloop) = AsyncClient::new(mqtt_options(broker, client_id), REQUEST_CAPACITY);
        Ok(Self {
            client,
            eventloop,
            filters,
            sink,
        })
    }

    /// Polls the connection until it is cancelled, formatting one message at
    /// a time. Subscriptions are (re)sent on every connection acknowledgement.
    pub async fn run(mut self) -> Result<(), SessionError> {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    self.sink.on_message(&Message::from(&publish));
                }
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    info!("Connected ({:?}), subscribing to {} topic(s)", ack.code, self.filters.len());
                    self.client.subscribe_many(self.filters.clone()).await?;
                }
                Ok(Event::Incoming(Packet::SubAck(ack))) => {
                    debug!("Subscription acknowledged: {:?}", ack.return_codes);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Connection error: {e}");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }
}
