use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use tracing::debug;

use crate::model::*;
use crate::observability;

use super::error::{EngineError, RpcError};
use super::recurrence::expand;

/// Fold per-occurrence precheck outcomes into one summary.
/// Idempotent: re-running over the same input yields the same summary.
pub fn summarize(results: &[PrecheckResult]) -> PrecheckSummary {
    let mut success_count = 0;
    let mut error_count = 0;
    let mut distinct_error_codes = Vec::new();
    for r in results {
        if r.success {
            success_count += 1;
        } else {
            error_count += 1;
            if !distinct_error_codes.contains(&r.error_code) {
                distinct_error_codes.push(r.error_code);
            }
        }
    }
    PrecheckSummary {
        success_count,
        error_count,
        distinct_error_codes,
        should_warn: error_count > 0,
    }
}

/// Batched precheck/commit RPC surface. One round trip per series, never one
/// call per occurrence.
#[async_trait]
pub trait PrecheckClient: Send + Sync {
    /// Evaluate each candidate occurrence without committing anything.
    async fn precheck(&self, occurrences: &[Occurrence]) -> Result<Vec<PrecheckResult>, RpcError>;

    /// Commit the accepted occurrences as bookings.
    async fn commit(&self, occurrences: &[Occurrence]) -> Result<(), RpcError>;
}

/// Outcome of one precheck round trip, tagged with its generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPrecheck {
    pub generation: u64,
    pub occurrences: Vec<Occurrence>,
    pub summary: PrecheckSummary,
    /// The subset the server accepted, in order — the input to `commit_series`.
    pub accepted: Vec<Occurrence>,
}

const DEFAULT_RPC_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Caller-side coordinator for the expand → precheck → aggregate path.
///
/// Owns the monotonically increasing generation counter used to discard
/// responses that a rule edit made stale while they were in flight. There is
/// no cancellation primitive: cancellation is ignoring the response.
pub struct SeriesPlanner {
    generation: AtomicU64,
    timeout: StdDuration,
}

impl SeriesPlanner {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_RPC_TIMEOUT)
    }

    pub fn with_timeout(timeout: StdDuration) -> Self {
        Self {
            generation: AtomicU64::new(0),
            timeout,
        }
    }

    /// Call on every rule/window edit: any precheck still in flight is
    /// answered with `Ok(None)` and its summary discarded.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Expand the rule and run the batched precheck round trip.
    ///
    /// Returns `Ok(None)` when a newer generation superseded this call while
    /// the RPC was in flight; the caller must not act on a `None`.
    pub async fn precheck_series(
        &self,
        client: &dyn PrecheckClient,
        rule: &RecurrenceRule,
        base: &TimeWindow,
        now: LocalTime,
        policy: &BookingPolicy,
    ) -> Result<Option<SeriesPrecheck>, EngineError> {
        let occurrences = expand(rule, base, now, policy.max_days_in_advance)?;
        let generation = self.next_generation();
        let cadence = observability::cadence_label(rule.cadence);
        debug!(generation, cadence, count = occurrences.len(), "precheck round trip");
        metrics::histogram!(observability::PRECHECK_OCCURRENCES).record(occurrences.len() as f64);

        let started = std::time::Instant::now();
        let outcome = tokio::time::timeout(self.timeout, client.precheck(&occurrences)).await;
        metrics::histogram!(observability::PRECHECK_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());

        let results = match outcome {
            Ok(Ok(results)) => results,
            Ok(Err(e)) => {
                metrics::counter!(observability::PRECHECKS_TOTAL, "status" => "error", "cadence" => cadence)
                    .increment(1);
                return Err(EngineError::Rpc(e));
            }
            Err(_) => {
                metrics::counter!(observability::PRECHECKS_TOTAL, "status" => "timeout", "cadence" => cadence)
                    .increment(1);
                return Err(EngineError::Rpc(RpcError::Network("precheck timed out".into())));
            }
        };

        if self.current_generation() != generation {
            debug!(generation, "discarding stale precheck response");
            metrics::counter!(observability::PRECHECKS_TOTAL, "status" => "stale", "cadence" => cadence)
                .increment(1);
            return Ok(None);
        }

        metrics::counter!(observability::PRECHECKS_TOTAL, "status" => "ok", "cadence" => cadence)
            .increment(1);
        let summary = summarize(&results);
        let accepted = results.iter().filter(|r| r.success).map(|r| r.occurrence).collect();
        Ok(Some(SeriesPrecheck {
            generation,
            occurrences,
            summary,
            accepted,
        }))
    }
}

impl Default for SeriesPlanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Commit the accepted subset. An empty subset short-circuits without an RPC.
pub async fn commit_series(
    client: &dyn PrecheckClient,
    accepted: &[Occurrence],
) -> Result<(), EngineError> {
    if accepted.is_empty() {
        return Ok(());
    }
    client.commit(accepted).await.map_err(EngineError::Rpc)
}
