//! Command implementations.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use stevedore_client::HttpScanClient;
use stevedore_domain::{ArtifactLocator, ArtifactProperty};
use stevedore_inspect::{InspectionWorker, ReconcileOutcome, ReconciliationEngine};
use stevedore_scan::ArtifactLocatorService;
use stevedore_store::{ArtifactStore, SqliteStore};

use crate::cli::{PropertiesAction, PropertiesArgs, ReconcileArgs, ScanArgs};
use crate::error::{CliError, Result};
use crate::{Config, Formatter};

fn open_store(config: &Config) -> Result<Arc<SqliteStore>> {
    let path = config.database_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Arc::new(SqliteStore::open(path)?))
}

fn build_engine(config: &Config) -> Result<ReconciliationEngine<SqliteStore, HttpScanClient>> {
    let store = open_store(config)?;
    let client = Arc::new(HttpScanClient::new(config.client.clone())?);
    Ok(ReconciliationEngine::new(store, client))
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

/// List artifacts due for scanning; optionally stamp them as scanned.
pub fn execute_scan(args: ScanArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(config)?;
    let service = ArtifactLocatorService::new(store, config.scan.clone());

    let eligible: Vec<ArtifactLocator> = service.eligible_paths()?.into_iter().collect();
    println!("{}", formatter.artifact_table(&eligible));

    if args.stamp && !eligible.is_empty() {
        let now = now_millis();
        for locator in &eligible {
            service.record_scan_time(locator, now)?;
        }
        println!(
            "{}",
            formatter.success(&format!("Recorded scan time on {} artifact(s)", eligible.len()))
        );
    }
    Ok(())
}

/// Run a reconciliation pass for one repository, or all configured ones.
pub fn execute_reconcile(
    args: ReconcileArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let engine = build_engine(config)?;

    let repos: Vec<String> = match args.repo {
        Some(repo) => vec![repo],
        None => config.inspect.repos.clone(),
    };
    if repos.is_empty() {
        println!(
            "{}",
            formatter.warning("No repositories configured for inspection.")
        );
        return Ok(());
    }

    for repo_key in &repos {
        match engine.reconcile(repo_key) {
            ReconcileOutcome::Succeeded(metrics) => println!(
                "{}",
                formatter.success(&format!(
                    "{}: {} record(s) applied to {} artifact(s), {} skipped",
                    repo_key,
                    metrics.records_applied,
                    metrics.artifacts_annotated,
                    metrics.records_skipped
                ))
            ),
            ReconcileOutcome::Skipped => println!(
                "{}",
                formatter.warning(&format!("{}: not pending, skipped", repo_key))
            ),
            ReconcileOutcome::Failed => println!(
                "{}",
                formatter.error(&format!("{}: reconciliation failed (status set to FAILURE)", repo_key))
            ),
        }
    }
    Ok(())
}

/// Run the background worker until interrupted.
pub async fn execute_watch(config: &Config) -> Result<()> {
    let engine = build_engine(config)?;
    let mut worker = InspectionWorker::new(engine, config.inspect.clone());
    worker.run().await;
    Ok(())
}

/// Show the inspection status of every configured repository.
pub fn execute_status(config: &Config, formatter: &Formatter) -> Result<()> {
    let store = open_store(config)?;
    let client = Arc::new(HttpScanClient::new(config.client.clone())?);
    let engine = ReconciliationEngine::new(store.clone(), client);

    let mut rows = Vec::new();
    for repo_key in &config.inspect.repos {
        let status = engine.tracker().status(repo_key)?;
        let artifacts = store.artifact_count(std::slice::from_ref(repo_key))?;
        rows.push((repo_key.clone(), status, artifacts));
    }
    println!("{}", formatter.status_table(&rows));
    Ok(())
}

/// Re-arm a repository for reconciliation.
pub fn execute_reset(repo: &str, config: &Config, formatter: &Formatter) -> Result<()> {
    let engine = build_engine(config)?;
    engine.tracker().reset(repo)?;
    println!(
        "{}",
        formatter.success(&format!("{} re-armed for reconciliation", repo))
    );
    Ok(())
}

/// Read, write, or delete stevedore properties on an artifact.
pub fn execute_properties(
    args: PropertiesArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let store = open_store(config)?;

    match args.action {
        PropertiesAction::Get { repo, path } => {
            let locator = ArtifactLocator::new(repo, path);
            for property in ArtifactProperty::all() {
                if let Some(value) = store.get_property(&locator, property.name())? {
                    println!("{} = {}", property.name(), value);
                }
            }
        }
        PropertiesAction::Set {
            repo,
            path,
            name,
            value,
        } => {
            let property = ArtifactProperty::from_name(&name).ok_or_else(|| {
                CliError::InvalidInput(format!("'{}' is not a stevedore property", name))
            })?;
            let locator = ArtifactLocator::new(repo, path);
            store.set_property(&locator, property.name(), &value)?;
            println!("{}", formatter.success(&format!("Set {} on {}", name, locator)));
        }
        PropertiesAction::Delete { repo, path, name } => {
            let locator = ArtifactLocator::new(repo, path);
            match name {
                Some(name) => {
                    let property = ArtifactProperty::from_name(&name).ok_or_else(|| {
                        CliError::InvalidInput(format!("'{}' is not a stevedore property", name))
                    })?;
                    store.delete_property(&locator, property.name())?;
                    println!(
                        "{}",
                        formatter.success(&format!("Deleted {} from {}", name, locator))
                    );
                }
                None => {
                    for property in ArtifactProperty::all() {
                        store.delete_property(&locator, property.name())?;
                    }
                    println!(
                        "{}",
                        formatter.success(&format!("Deleted all stevedore properties from {}", locator))
                    );
                }
            }
        }
    }
    Ok(())
}
