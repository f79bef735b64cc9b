use crate::utils::error::{CheckerError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// A recurring crontab entry that runs the checker in `--cron` mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronEntry {
    pub schedule: String,
    /// Relative paths in the config resolve against this directory.
    pub working_dir: PathBuf,
    pub executable: PathBuf,
    pub config: PathBuf,
    pub log_file: PathBuf,
}

impl CronEntry {
    pub fn line(&self) -> String {
        format!(
            "{} cd {} && {} --cron --config {} >> {} 2>&1",
            self.schedule,
            self.working_dir.display(),
            self.executable.display(),
            self.config.display(),
            self.log_file.display()
        )
    }
}

/// Returns the new table, or `None` when the line is already installed.
pub fn add_entry(table: &str, line: &str) -> Option<String> {
    if table.lines().any(|existing| existing.trim() == line) {
        return None;
    }
    let mut updated = table.trim_end_matches('\n').to_string();
    if !updated.is_empty() {
        updated.push('\n');
    }
    updated.push_str(line);
    updated.push('\n');
    Some(updated)
}

/// Returns the new table, or `None` when the line was not present.
pub fn remove_entry(table: &str, line: &str) -> Option<String> {
    let kept: Vec<&str> = table
        .lines()
        .filter(|existing| existing.trim() != line)
        .collect();
    if kept.len() == table.lines().count() {
        return None;
    }
    let mut updated = kept.join("\n");
    if !updated.is_empty() {
        updated.push('\n');
    }
    Some(updated)
}

pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

async fn read_crontab() -> Result<String> {
    let output = Command::new("crontab")
        .arg("-l")
        .output()
        .await
        .map_err(|e| CheckerError::Schedule {
            message: format!("crontab not available: {}", e),
        })?;

    // `crontab -l` fails when the user has no table yet.
    if !output.status.success() {
        tracing::debug!(
            "crontab -l exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Ok(String::new());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

async fn write_crontab(table: &str) -> Result<()> {
    let mut child = Command::new("crontab")
        .arg("-")
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| CheckerError::Schedule {
            message: format!("crontab not available: {}", e),
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(table.as_bytes()).await?;
    }
    let status = child.wait().await?;
    if !status.success() {
        return Err(CheckerError::Schedule {
            message: format!("crontab - exited with {}", status),
        });
    }
    Ok(())
}

/// Installs `entry`; returns `false` when it was already present.
pub async fn install(entry: &CronEntry) -> Result<bool> {
    let line = entry.line();
    let table = read_crontab().await?;
    let Some(updated) = add_entry(&table, &line) else {
        tracing::info!("✓ Cron job already exists");
        return Ok(false);
    };

    if let Some(dir) = entry.log_file.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    write_crontab(&updated).await?;
    tracing::info!("✅ Cron job added: {}", line);
    Ok(true)
}

/// Removes `entry`; returns `false` when no matching line existed.
pub async fn remove(entry: &CronEntry) -> Result<bool> {
    let line = entry.line();
    let table = read_crontab().await?;
    let Some(updated) = remove_entry(&table, &line) else {
        tracing::info!("No matching cron job found");
        return Ok(false);
    };

    write_crontab(&updated).await?;
    tracing::info!("✅ Cron job removed");
    Ok(true)
}
