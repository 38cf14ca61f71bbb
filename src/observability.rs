use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("nova.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("nova.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("nova.client.request_duration_seconds");

pub(crate) static AUTH_LOGINS: Counter = Counter::new("nova.auth.logins");
pub(crate) static AUTH_FAILURES: Counter = Counter::new("nova.auth.failures");

pub(crate) static SEND_CYCLES: Counter = Counter::new("nova.chat.send_cycles");
pub(crate) static SEND_FAILURES: Counter = Counter::new("nova.chat.send_failures");
pub(crate) static SEND_REJECTED: Counter = Counter::new("nova.chat.send_rejected");

pub(crate) static REVEAL_TICKS: Counter = Counter::new("nova.chat.reveal_ticks");
pub(crate) static REVEALS_CANCELLED: Counter = Counter::new("nova.chat.reveals_cancelled");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&AUTH_LOGINS);
    collector.register_counter(&AUTH_FAILURES);

    collector.register_counter(&SEND_CYCLES);
    collector.register_counter(&SEND_FAILURES);
    collector.register_counter(&SEND_REJECTED);

    collector.register_counter(&REVEAL_TICKS);
    collector.register_counter(&REVEALS_CANCELLED);
}
