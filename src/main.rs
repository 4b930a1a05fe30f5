//! CLI for SubSink
//!
//! Settings come from `config/default.*`, `SUBSINK_*` environment variables
//! (a `.env` file is honoured) and finally the flags below.

use clap::{ArgAction, Parser};
use subsink::client::Session;
use subsink::config::{Settings, TemplateConfig, load_config, resolve_client_id, validate_broker};
use subsink::output::OutputSink;
use subsink::utils::logging;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "subsink", about = "Subscribe to MQTT topics and write messages to stdout or files", disable_help_flag = true)]
struct Cli {
    /// Broker host
    #[arg(short = 'h', long)]
    host: Option<String>,
    /// Broker port
    #[arg(short, long)]
    port: Option<u16>,
    /// Client id (default: subsink-<random>)
    #[arg(short, long)]
    id: Option<String>,
    /// Client id prefix; the id becomes <prefix><pid>. Ignored when --id is given
    #[arg(short = 'I', long)]
    id_prefix: Option<String>,
    /// Keep-alive interval in seconds
    #[arg(short = 'k', long = "keepalive")]
    keep_alive: Option<u64>,
    /// Keep the broker session across disconnects; requires --id
    #[arg(short = 'c', long)]
    disable_clean_session: bool,
    /// Topic to subscribe to; may be repeated, addressable as @topic1..@topic9
    #[arg(short, long = "topic")]
    topics: Vec<String>,
    /// Subscription QoS
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=2))]
    qos: Option<u8>,
    /// Prefix messages with their topic
    #[arg(short, long)]
    verbose: bool,
    /// Do not append a newline to each message
    #[arg(short = 'N', long)]
    no_eol: bool,
    /// Output format, e.g. '@Y-@m-@d %t %p'
    #[arg(short = 'F', long)]
    format: Option<String>,
    /// Write each message to the file named by this path mask, e.g. '/var/log/@topic/@date'
    #[arg(long)]
    fmask: Option<String>,
    /// Use the output format to compute the file path
    #[arg(long)]
    format_path: bool,
    /// Truncate output files instead of appending
    #[arg(long)]
    overwrite: bool,
    /// Suffix appended to output file names as '.<suffix>'
    #[arg(long)]
    nodesuffix: Option<String>,
    /// Ignore retained messages
    #[arg(short = 'R', long)]
    skip_retained: bool,
    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    fn apply(self, settings: &mut Settings) {
        if let Some(host) = self.host {
            settings.broker.host = host;
        }
        if let Some(port) = self.port {
            settings.broker.port = port;
        }
        if self.id.is_some() {
            settings.broker.client_id = self.id;
        }
        if self.id_prefix.is_some() {
            settings.broker.id_prefix = self.id_prefix;
        }
        if let Some(secs) = self.keep_alive {
            settings.broker.keep_alive_secs = secs;
        }
        if self.disable_clean_session {
            settings.broker.clean_session = false;
        }
        if !self.topics.is_empty() {
            settings.broker.topics = self.topics;
        }
        if let Some(qos) = self.qos {
            settings.broker.qos = qos;
        }

        let output = &mut settings.output;
        output.verbose |= self.verbose;
        output.format_path |= self.format_path;
        output.overwrite |= self.overwrite;
        output.skip_retained |= self.skip_retained;
        if self.no_eol {
            output.eol = false;
        }
        if self.format.is_some() {
            output.format = self.format;
        }
        if self.fmask.is_some() {
            output.path_mask = self.fmask;
        }
        if self.nodesuffix.is_some() {
            output.node_suffix = self.nodesuffix;
        }

        if let Some(level) = self.log_level {
            settings.logging.level = level;
        }
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = match load_config() {
        Ok(mut settings) => {
            cli.apply(&mut settings);
            settings
        }
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    logging::init(&settings.logging.level);

    tokio::select! {
        result = run(settings) => {
            if let Err(e) = result {
                error!("subsink failed: {}", e);
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }
}

async fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    validate_broker(&settings.broker)?;
    let client_id = resolve_client_id(&settings.broker);
    let template = TemplateConfig::from_settings(
        &settings.output,
        client_id.clone(),
        settings.broker.topics.clone(),
    )?;

    info!(
        "Connecting to {}:{} as {}",
        settings.broker.host, settings.broker.port, client_id
    );
    let session = Session::new(&settings.broker, &client_id, OutputSink::stdout(template))?;
    session.run().await?;
    Ok(())
}
