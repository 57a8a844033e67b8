use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use beacon::actuator::{ActuatorConfig, CycleActuator};
use beacon::config::{ConfigApplier, SequenceStore};
use beacon::contracts::Actuator;
use beacon::dispatch::{ConfigDispatcher, DispatcherConfig, CONFIG_TOPIC};
use beacon::metrics::MetricsRegistry;
use beacon::output::{LogDriver, LogPublisher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("beacon=info".parse()?))
        .init();

    tracing::info!("Beacon starting...");

    let store = SequenceStore::new();
    let metrics = Arc::new(MetricsRegistry::new());

    let applier = Arc::new(ConfigApplier::new(
        store.clone(),
        Arc::clone(&metrics.config),
    ));
    let dispatcher = Arc::new(ConfigDispatcher::new(
        applier,
        Arc::clone(&metrics.config),
        DispatcherConfig::default(),
    ));

    let actuator_config = ActuatorConfig {
        status_topic: std::env::var("BEACON_STATUS_TOPIC")
            .unwrap_or_else(|_| ActuatorConfig::default().status_topic),
        off_gap: std::env::var("BEACON_OFF_GAP_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or_else(|| ActuatorConfig::default().off_gap),
    };
    let actuator = Arc::new(CycleActuator::new(
        store,
        Arc::new(LogDriver),
        Arc::new(LogPublisher),
        actuator_config,
        Arc::clone(&metrics.actuation),
    ));

    dispatcher.start().await?;
    actuator.start().await?;
    tracing::info!("Background tasks started");

    // Stand-in for the broker session: each stdin line is one payload
    // arriving on the config topic.
    tracing::info!(topic = CONFIG_TOPIC, "Reading config payloads from stdin");
    let sender = dispatcher.sender();
    let stdin_task = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.is_empty() {
                continue;
            }
            if sender.send(Bytes::from(line)).await.is_err() {
                break;
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");

    stdin_task.abort();
    actuator.stop().await?;
    dispatcher.stop().await?;
    metrics.log_summary();

    Ok(())
}
