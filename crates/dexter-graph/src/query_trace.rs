//! Structured query tracing for resolver entry points.
//!
//! Events use target `dexter::query_json` and are intended to be consumed with:
//! `DEXTER_LOG=dexter::query_json=trace DEXTER_LOG_FORMAT=json`.
//!
//! Environment:
//! - `DEXTER_QUERY_RUN_ID`: optional run identifier attached to every event.

use crate::TypeId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: "dexter::query_json", Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| {
            std::env::var("DEXTER_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string())
        })
        .as_str()
}

#[inline]
pub(crate) fn member_start(query_id: u64, op: &'static str, holder: TypeId, generation: u64) {
    trace!(
        target: "dexter::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op,
        holder_type_id = holder.0,
        generation
    );
}

#[inline]
pub(crate) fn member_end(
    query_id: u64,
    op: &'static str,
    result: &'static str,
    cache_misses: u32,
) {
    let cache_hit = cache_misses == 0;
    trace!(
        target: "dexter::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        result,
        cache_hit,
        cache_misses
    );
}

#[inline]
pub(crate) fn snapshot_derived(from_generation: u64, to_generation: u64, changed: usize) {
    trace!(
        target: "dexter::query_json",
        event = "snapshot",
        run_id = run_id(),
        from_generation,
        to_generation,
        changed
    );
}
