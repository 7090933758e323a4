//! Test support: one-time tracing setup and record fixtures.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use uuid::Uuid;

use crate::domain::FlatRecord;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "orgtree=trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Deterministic id for fixtures: `fixture_id(1)` is always the same UUID.
pub fn fixture_id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// Root -> [Eng -> [Backend], Sales], ids 1..=4.
pub fn sample_records() -> Vec<FlatRecord> {
    vec![
        FlatRecord::root(fixture_id(1), "Root"),
        FlatRecord::new(fixture_id(2), "Eng", Some(fixture_id(1))),
        FlatRecord::new(fixture_id(3), "Sales", Some(fixture_id(1))),
        FlatRecord::new(fixture_id(4), "Backend", Some(fixture_id(2))),
    ]
}
