/// Number of backfill days written concurrently before the next batch starts.
/// A tuning knob, not a correctness parameter: larger batches increase write
/// concurrency, smaller batches reduce the blast radius of one failing day.
pub const BACKFILL_BATCH_SIZE: usize = 10;

/// Upper bound on a single adapter fetch call.
pub const ADAPTER_TIMEOUT_SECS: u64 = 30;
