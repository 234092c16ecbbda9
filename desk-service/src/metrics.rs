//! Prometheus metrics for the desk service

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_counter_vec, register_int_counter, CounterVec, Histogram,
    IntCounter,
};

lazy_static! {
    /// Commands handled, by kind and outcome
    pub static ref DESK_COMMANDS_TOTAL: CounterVec = register_counter_vec!(
        "desk_commands_total",
        "Commands handled by the dispatcher",
        &["kind", "status"]
    )
    .unwrap();

    /// Claims denied because the room was held by someone else
    pub static ref DESK_CLAIM_DENIALS_TOTAL: IntCounter = register_int_counter!(
        "desk_claim_denials_total",
        "Claims denied by the arbiter"
    )
    .unwrap();

    /// Ledger append latency, submission flow only
    pub static ref DESK_APPEND_DURATION: Histogram = register_histogram!(
        "desk_submission_append_duration_seconds",
        "Ledger append duration in seconds",
        vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 5.0]
    )
    .unwrap();
}
