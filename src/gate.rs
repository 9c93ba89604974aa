//! Foreground process gate
//!
//! Kodi and RetroArch handle the remote themselves. While either runs the
//! bridge stays dormant, so the process table is queried before every line.

use crate::mapping::config::GateSettings;
use log::{debug, info};
use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("Failed to run process query '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Process query '{command}' failed with {status}")]
    Failed { command: String, status: ExitStatus },
}

/// Whether key events are forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Active,
    Dormant,
}

/// Process table lines captured at one instant.
///
/// Each entry is one trimmed output line of the listing command, so the
/// denylist matches whatever columns the command prints (`ps -A`,
/// `ps -eo args`, `ps aux`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSnapshot {
    entries: Vec<String>,
}

impl ProcessSnapshot {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse listing output, one entry per non-blank line.
    pub fn from_ps_output(output: &str) -> Self {
        let entries = output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// First denylist entry that is a substring of any process line.
    pub fn find_any<'a>(&self, denylist: &'a [String]) -> Option<&'a str> {
        denylist
            .iter()
            .find(|name| self.entries.iter().any(|entry| entry.contains(name.as_str())))
            .map(String::as_str)
    }
}

/// Source of process snapshots.
pub trait ProcessLister {
    fn list(&mut self) -> impl Future<Output = Result<ProcessSnapshot, GateError>> + Send;
}

/// Runs `ps -A` (or the configured command) on every query.
#[derive(Debug, Clone)]
pub struct PsLister {
    command: String,
    args: Vec<String>,
}

impl PsLister {
    pub fn new(settings: &GateSettings) -> Self {
        Self {
            command: settings.command.clone(),
            args: settings.args.clone(),
        }
    }
}

impl ProcessLister for PsLister {
    async fn list(&mut self) -> Result<ProcessSnapshot, GateError> {
        let output = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|source| GateError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GateError::Failed {
                command: self.command.clone(),
                status: output.status,
            });
        }

        Ok(ProcessSnapshot::from_ps_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Lister that replays queued snapshots in tests.
///
/// Once the queue is empty it keeps returning the fallback snapshot.
#[derive(Debug, Clone, Default)]
pub struct MockProcessLister {
    queued: VecDeque<ProcessSnapshot>,
    fallback: ProcessSnapshot,
    calls: Arc<AtomicUsize>,
}

impl MockProcessLister {
    /// Always report `snapshot`.
    pub fn fixed(snapshot: ProcessSnapshot) -> Self {
        Self {
            fallback: snapshot,
            ..Self::default()
        }
    }

    /// Report `snapshots` in order, then an empty process table.
    pub fn scripted<I: IntoIterator<Item = ProcessSnapshot>>(snapshots: I) -> Self {
        Self {
            queued: snapshots.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Shared counter of `list` calls (clones share it).
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl ProcessLister for MockProcessLister {
    async fn list(&mut self) -> Result<ProcessSnapshot, GateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.queued.pop_front().unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Decides per iteration whether the bridge is active.
pub struct ProcessGate<L: ProcessLister> {
    lister: L,
    denylist: Vec<String>,
    last: Option<GateState>,
}

impl<L: ProcessLister> ProcessGate<L> {
    pub fn new(lister: L, denylist: Vec<String>) -> Self {
        Self {
            lister,
            denylist,
            last: None,
        }
    }

    /// Query the process table. Never cached between calls.
    pub async fn check(&mut self) -> Result<GateState, GateError> {
        let snapshot = self.lister.list().await?;
        let blocker = snapshot.find_any(&self.denylist);
        let state = match blocker {
            Some(_) => GateState::Dormant,
            None => GateState::Active,
        };

        if self.last != Some(state) {
            match blocker {
                Some(name) => info!("'{}' is running, bridge dormant", name),
                None => info!("No foreground owner running, bridge active"),
            }
            self.last = Some(state);
        } else {
            debug!("Gate state: {:?}", state);
        }

        Ok(state)
    }

    pub async fn is_active(&mut self) -> Result<bool, GateError> {
        Ok(self.check().await? == GateState::Active)
    }

    /// State seen on the most recent check.
    pub fn last_state(&self) -> Option<GateState> {
        self.last
    }
}
