//! Logging walkthrough for the catalog runtime
//!
//! Run with:
//! ```bash
//! cargo run -p core-runtime --example logging_demo
//! cargo run -p core-runtime --example logging_demo -- json
//! cargo run -p core-runtime --example logging_demo -- compact "core_catalog=trace"
//! ```

use bridge_traits::logging::{ConsoleLogger, LogLevel};
use core_runtime::events::{CoreEvent, EventBus, QueryEvent};
use core_runtime::logging::{init_logging, redact_if_sensitive, LogFormat, LoggingConfig};
use std::env;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

fn main() -> core_runtime::Result<()> {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        _ => LogFormat::Pretty,
    };

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_logger_sink(Arc::new(ConsoleLogger::default()))
        .with_spans(true)
        .with_target(true);

    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }

    init_logging(config)?;
    info!(format = ?format, "Logging initialized");

    let bus = EventBus::default();
    let mut events = bus.subscribe();

    simulate_search(&bus, 1, "dune");
    simulate_search(&bus, 2, "dune messiah");

    while let Ok(event) = events.try_recv() {
        info!(event = %event.description(), "Event delivered");
    }

    info!(
        api_token = %redact_if_sensitive("api_token", "abc123"),
        "Sensitive values are redacted"
    );

    Ok(())
}

#[instrument(skip(bus))]
fn simulate_search(bus: &EventBus, epoch: u64, term: &str) {
    debug!(epoch, "Issuing fetch");

    if bus
        .emit(CoreEvent::Query(QueryEvent::FetchStarted {
            epoch,
            query: format!("?page=1&page_size=24&search={}", term),
        }))
        .is_err()
    {
        warn!("No subscribers for query events");
    }
}
