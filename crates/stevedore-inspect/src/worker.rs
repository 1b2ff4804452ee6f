//! Background worker for continuous reconciliation

use stevedore_domain::traits::{ArtifactStore, ScanClient};
use tokio::time::interval;

use crate::{InspectConfig, ReconcileMetrics, ReconcileOutcome, ReconciliationEngine};

/// Runs reconciliation passes for the configured repositories on a
/// schedule.
///
/// Each cycle attempts `reconcile` for every configured repository;
/// repositories that are not PENDING are skipped cheaply, so the worker
/// acts as a retry-free poller for externally re-armed repositories.
pub struct InspectionWorker<S, C> {
    engine: ReconciliationEngine<S, C>,
    config: InspectConfig,
    metrics: ReconcileMetrics,
}

impl<S, C> InspectionWorker<S, C>
where
    S: ArtifactStore,
    S::Error: std::fmt::Display,
    C: ScanClient,
    C::Error: std::fmt::Display,
{
    /// Create a worker around an engine.
    pub fn new(engine: ReconciliationEngine<S, C>, config: InspectConfig) -> Self {
        Self {
            engine,
            config,
            metrics: ReconcileMetrics::new(),
        }
    }

    /// Accumulated metrics across all cycles run so far.
    pub fn metrics(&self) -> &ReconcileMetrics {
        &self.metrics
    }

    /// Run one cycle: a reconciliation attempt per configured repository.
    pub fn run_once(&mut self) {
        for repo_key in self.config.repos.clone() {
            match self.engine.reconcile(&repo_key) {
                ReconcileOutcome::Succeeded(pass) => {
                    tracing::info!(
                        "reconciled {}: {} records applied to {} artifacts",
                        repo_key,
                        pass.records_applied,
                        pass.artifacts_annotated
                    );
                    self.metrics.merge(pass);
                }
                ReconcileOutcome::Failed => {
                    tracing::warn!("reconciliation of {} failed", repo_key);
                    self.metrics.passes_failed += 1;
                }
                ReconcileOutcome::Skipped => {
                    self.metrics.passes_skipped += 1;
                }
            }
        }
    }

    /// Run indefinitely at the configured interval, until ctrl-c.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.config.reconcile_interval());

        tracing::info!(
            "inspection worker started ({} repositories, interval {:?})",
            self.config.repos.len(),
            self.config.reconcile_interval()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_once();
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown signal received, stopping inspection worker");
                    break;
                }
            }
        }

        tracing::info!("inspection worker stopped.\n{}", self.metrics.summary());
    }

    /// Run a fixed number of cycles (useful for testing).
    pub async fn run_cycles(&mut self, cycles: usize) {
        let mut ticker = interval(self.config.reconcile_interval());
        for _ in 0..cycles {
            ticker.tick().await;
            self.run_once();
        }
    }
}
