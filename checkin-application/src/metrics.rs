use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    partition_loads: AtomicU64,
    partition_load_errors: AtomicU64,
    fallback_reads: AtomicU64,
    status_changes: AtomicU64,
    rejected_transitions: AtomicU64,
    background_writes: AtomicU64,
    background_write_failures: AtomicU64,
}

impl Metrics {
    pub fn record_partition_load(&self) {
        self.partition_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_partition_load_error(&self) {
        self.partition_load_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_read(&self) {
        self.fallback_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_status_change(&self) {
        self.status_changes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected_transition(&self) {
        self.rejected_transitions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_background_write(&self) {
        self.background_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_background_write_failure(&self) {
        self.background_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn partition_loads(&self) -> u64 {
        self.partition_loads.load(Ordering::Relaxed)
    }

    pub fn fallback_reads(&self) -> u64 {
        self.fallback_reads.load(Ordering::Relaxed)
    }

    pub fn background_write_failures(&self) -> u64 {
        self.background_write_failures.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let loads = self.partition_loads.load(Ordering::Relaxed);
        let load_errors = self.partition_load_errors.load(Ordering::Relaxed);
        let fallbacks = self.fallback_reads.load(Ordering::Relaxed);
        let changes = self.status_changes.load(Ordering::Relaxed);
        let rejected = self.rejected_transitions.load(Ordering::Relaxed);
        let writes = self.background_writes.load(Ordering::Relaxed);
        let write_failures = self.background_write_failures.load(Ordering::Relaxed);

        format!(
            "# TYPE checkin_partition_loads_total counter\n\
checkin_partition_loads_total {}\n\
# TYPE checkin_partition_load_errors_total counter\n\
checkin_partition_load_errors_total {}\n\
# TYPE checkin_fallback_reads_total counter\n\
checkin_fallback_reads_total {}\n\
# TYPE checkin_status_changes_total counter\n\
checkin_status_changes_total {}\n\
# TYPE checkin_rejected_transitions_total counter\n\
checkin_rejected_transitions_total {}\n\
# TYPE checkin_background_writes_total counter\n\
checkin_background_writes_total {}\n\
# TYPE checkin_background_write_failures_total counter\n\
checkin_background_write_failures_total {}\n",
            loads, load_errors, fallbacks, changes, rejected, writes, write_failures
        )
    }
}
