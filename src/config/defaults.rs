use std::time::Duration;

pub(super) const fn default_exit_transition() -> Option<Duration> {
    Some(Duration::ZERO)
}

pub(super) const fn default_queue_bound() -> usize {
    64
}
