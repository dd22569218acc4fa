//! Task scheduler - fan-out / join
//!
//! Runs the active task set concurrently against one frozen snapshot, waits
//! for every task (a join, not a race), and folds the partial updates into
//! one delta with the per-field merge law. Because each task owns a
//! distinct accumulator, the fold is commutative and no locking is needed.

use futures::future::join_all;
use memo_research::{ResearchTask, TaskUpdate};
use memo_state::{ResearchDelta, ResearchState};
use std::sync::Arc;

/// Fan-out scheduler over a fixed task set
#[derive(Debug, Clone)]
pub struct TaskScheduler {
    tasks: Vec<Arc<dyn ResearchTask>>,
}

impl TaskScheduler {
    /// Create a scheduler over the given task set
    #[inline]
    #[must_use]
    pub fn new(tasks: Vec<Arc<dyn ResearchTask>>) -> Self {
        Self { tasks }
    }

    /// Number of configured tasks
    #[inline]
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Run one research cycle
    ///
    /// Every task sees the identical pre-cycle snapshot; no task observes
    /// another task's update within the cycle. Task failures are normalized
    /// here into a diagnostic finding in the failing task's own
    /// accumulator, so the cycle always completes with a well-formed delta.
    pub async fn run_cycle(&self, snapshot: &ResearchState) -> ResearchDelta {
        let updates = join_all(self.tasks.iter().map(|task| async move {
            let accumulator = task.accumulator();
            let update = match task.produce_update(snapshot).await {
                Ok(update) => {
                    tracing::debug!(
                        task = task.name(),
                        findings = update.findings.len(),
                        "task completed"
                    );
                    update
                }
                Err(failure) => {
                    tracing::warn!(
                        task = task.name(),
                        error = %failure,
                        "task failed, recording diagnostic finding"
                    );
                    TaskUpdate::finding(failure.to_string())
                }
            };

            let mut delta = ResearchDelta::findings(accumulator, update.findings);
            delta.messages = update.messages;
            delta
        }))
        .await;

        updates
            .into_iter()
            .fold(ResearchDelta::empty(), ResearchDelta::merge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use memo_research::TaskFailure;
    use memo_research::{SourceError, TaskUpdate};
    use memo_state::{Accumulator, Subject};
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct StubTask {
        name: &'static str,
        accumulator: Accumulator,
        outcome: Result<&'static str, SourceError>,
    }

    #[async_trait]
    impl ResearchTask for StubTask {
        fn name(&self) -> &'static str {
            self.name
        }

        fn accumulator(&self) -> Accumulator {
            self.accumulator
        }

        async fn produce_update(
            &self,
            _snapshot: &ResearchState,
        ) -> Result<TaskUpdate, TaskFailure> {
            match &self.outcome {
                Ok(finding) => Ok(TaskUpdate::finding(*finding)),
                Err(err) => Err(TaskFailure::Search(err.clone())),
            }
        }
    }

    fn ok_task(name: &'static str, accumulator: Accumulator, finding: &'static str) -> Arc<dyn ResearchTask> {
        Arc::new(StubTask {
            name,
            accumulator,
            outcome: Ok(finding),
        })
    }

    fn failing_task(name: &'static str, accumulator: Accumulator) -> Arc<dyn ResearchTask> {
        Arc::new(StubTask {
            name,
            accumulator,
            outcome: Err(SourceError::Unavailable("stub outage".to_string())),
        })
    }

    fn snapshot() -> ResearchState {
        ResearchState::new(Subject::new("Tesla", "TSLA").unwrap())
    }

    #[tokio::test]
    async fn run_cycle_merges_disjoint_updates() {
        let scheduler = TaskScheduler::new(vec![
            ok_task("financial", Accumulator::Financial, "f1"),
            ok_task("market", Accumulator::Market, "m1"),
        ]);

        let delta = scheduler.run_cycle(&snapshot()).await;
        assert_eq!(delta.financial_findings, vec!["f1"]);
        assert_eq!(delta.market_findings, vec!["m1"]);
    }

    #[tokio::test]
    async fn run_cycle_is_order_insensitive_for_disjoint_tasks() {
        let forward = TaskScheduler::new(vec![
            ok_task("financial", Accumulator::Financial, "f1"),
            ok_task("market", Accumulator::Market, "m1"),
        ]);
        let reversed = TaskScheduler::new(vec![
            ok_task("market", Accumulator::Market, "m1"),
            ok_task("financial", Accumulator::Financial, "f1"),
        ]);

        let a = forward.run_cycle(&snapshot()).await;
        let b = reversed.run_cycle(&snapshot()).await;
        assert_eq!(a.financial_findings, b.financial_findings);
        assert_eq!(a.market_findings, b.market_findings);
    }

    #[tokio::test]
    async fn run_cycle_normalizes_failures_into_diagnostics() {
        let scheduler = TaskScheduler::new(vec![
            ok_task("financial", Accumulator::Financial, "f1"),
            failing_task("market", Accumulator::Market),
        ]);

        let delta = scheduler.run_cycle(&snapshot()).await;
        assert_eq!(delta.financial_findings, vec!["f1"]);
        assert_eq!(
            delta.market_findings,
            vec!["search failed: service unavailable: stub outage"]
        );
    }

    #[tokio::test]
    async fn run_cycle_with_all_tasks_failing_still_yields_delta() {
        let scheduler = TaskScheduler::new(vec![
            failing_task("financial", Accumulator::Financial),
            failing_task("market", Accumulator::Market),
        ]);

        let delta = scheduler.run_cycle(&snapshot()).await;
        assert_eq!(delta.financial_findings.len(), 1);
        assert_eq!(delta.market_findings.len(), 1);
    }

    #[tokio::test]
    async fn run_cycle_with_no_tasks_is_empty() {
        let scheduler = TaskScheduler::new(Vec::new());
        let delta = scheduler.run_cycle(&snapshot()).await;
        assert!(delta.is_empty());
    }
}
