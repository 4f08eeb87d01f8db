use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use tokio::process::Command;

use crate::loader::{self, STUDENTS_KEY};

#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Shell command that scrapes every profile.
    pub scraper: String,
    /// File the scraper writes.
    pub scraped: PathBuf,
    /// Snapshot the leaderboard reads.
    pub snapshot: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Success { students: usize },
    Failure(String),
}

/// Runs the scraper once. The snapshot is replaced only when the scrape succeeds.
pub async fn refresh(config: &RefreshConfig) -> RefreshOutcome {
    match try_refresh(config).await {
        Ok(students) => {
            log::info!(
                "snapshot {} refreshed with {students} students",
                config.snapshot.display()
            );
            RefreshOutcome::Success { students }
        }
        Err(err) => {
            log::error!("refresh failed: {err:#}");
            RefreshOutcome::Failure(format!("{err:#}"))
        }
    }
}

/// Refreshes on a fixed interval until Ctrl-C.
pub async fn watch(config: &RefreshConfig, every: Duration) -> anyhow::Result<()> {
    watch_until(config, every, async {
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl-C")
    })
    .await
}

/// Refreshes on a fixed interval until `stop` resolves. The first refresh runs immediately.
pub async fn watch_until<F>(config: &RefreshConfig, every: Duration, stop: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = anyhow::Result<()>>,
{
    let mut ticker = tokio::time::interval(every);
    tokio::pin!(stop);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                refresh(config).await;
            }
            signal = &mut stop => {
                signal?;
                log::info!("stopping refresh loop");
                return Ok(());
            }
        }
    }
}

async fn try_refresh(config: &RefreshConfig) -> anyhow::Result<usize> {
    log::info!("running scraper: {}", config.scraper);
    let output = Command::new("sh")
        .arg("-c")
        .arg(&config.scraper)
        .kill_on_drop(true)
        .output()
        .await
        .context("failed to start scraper")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.trim().is_empty() {
        log::debug!("scraper stdout: {}", stdout.trim());
    }
    if !stderr.trim().is_empty() {
        log::debug!("scraper stderr: {}", stderr.trim());
    }

    if !output.status.success() {
        bail!("scraper exited with {}", output.status);
    }

    let snapshot = loader::read_snapshot(&config.scraped)?;
    let Some(students) = snapshot.get(STUDENTS_KEY).and_then(|v| v.as_object()) else {
        bail!(
            "scraper output {} has no `{STUDENTS_KEY}` mapping",
            config.scraped.display()
        );
    };
    let count = students.len();

    replace_snapshot(&config.snapshot, &serde_json::to_vec_pretty(&snapshot)?)?;
    Ok(count)
}

fn replace_snapshot(target: &Path, contents: &[u8]) -> anyhow::Result<()> {
    let staging = target.with_extension("json.tmp");
    std::fs::write(&staging, contents)
        .with_context(|| format!("failed to write {}", staging.display()))?;
    std::fs::rename(&staging, target)
        .with_context(|| format!("failed to replace {}", target.display()))?;
    Ok(())
}
