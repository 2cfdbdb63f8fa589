use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::{debug, info, warn};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::api::{dispatch, Call, Response, Transaction};
use crate::config::Config;
use crate::error;
use crate::logging::{log_call, log_outcome, CallId};
use crate::model::Address;
use crate::registry::{InvariantViolation, RegistryState, VotingRegistry};

/// Failures of the host environment itself, as opposed to rejected calls.
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Inconsistent snapshot: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Local host environment for a single registry.
///
/// The host supplies caller identities, applies calls strictly one at a
/// time, and persists the registry as a JSON snapshot. A host holds an
/// exclusive lock on its snapshot for as long as it exists, so hosts in
/// other threads or processes wait for it to be dropped.
#[derive(Debug)]
pub struct Host {
    registry: VotingRegistry,
    state_path: PathBuf,
    _lock: File,
}

impl Host {
    /// Open the registry described by `config`: restore the snapshot if one
    /// exists, otherwise deploy a fresh registry owned by the configured admin.
    pub fn open(config: &Config) -> Result<Self, HostError> {
        let state_path = config.state_path().to_path_buf();
        let lock = lock_snapshot(&state_path)?;
        let registry = match read_snapshot(&state_path) {
            Ok(registry) => registry,
            Err(HostError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                info!("No snapshot at {}, deploying", state_path.display());
                VotingRegistry::new(config.admin())
            }
            Err(err) => return Err(err),
        };
        if registry.owner() != config.admin() {
            warn!(
                "Configured admin {} does not own the restored registry; owner is {}",
                config.admin(),
                registry.owner()
            );
        }
        Ok(Self {
            registry,
            state_path,
            _lock: lock,
        })
    }

    /// Deploy a fresh registry, to be persisted at `state_path`.
    pub fn deploy(admin: Address, state_path: impl Into<PathBuf>) -> Result<Self, HostError> {
        let state_path = state_path.into();
        let lock = lock_snapshot(&state_path)?;
        Ok(Self {
            registry: VotingRegistry::new(admin),
            state_path,
            _lock: lock,
        })
    }

    /// Restore a registry from a snapshot. Snapshots that break any registry
    /// invariant are rejected.
    pub fn load(state_path: impl Into<PathBuf>) -> Result<Self, HostError> {
        let state_path = state_path.into();
        let lock = lock_snapshot(&state_path)?;
        let registry = read_snapshot(&state_path)?;
        Ok(Self {
            registry,
            state_path,
            _lock: lock,
        })
    }

    pub fn registry(&self) -> &VotingRegistry {
        &self.registry
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Apply a single call on behalf of `caller`.
    pub fn submit(&mut self, caller: Address, call: Call) -> error::Result<Response> {
        let id = CallId::next();
        log_call(id, caller, &call);
        let outcome = dispatch(&mut self.registry, caller, call);
        log_outcome(id, &outcome);
        outcome
    }

    /// Apply every transaction in order. A rejected transaction does not stop
    /// the ones after it.
    pub fn replay(
        &mut self,
        transactions: impl IntoIterator<Item = Transaction>,
    ) -> Vec<error::Result<Response>> {
        transactions
            .into_iter()
            .map(|tx| self.submit(tx.from, tx.call))
            .collect()
    }

    /// Write the snapshot. The previous snapshot is only replaced once the new
    /// one has been completely written.
    pub fn persist(&self) -> Result<(), HostError> {
        let mut tmp = NamedTempFile::new_in(parent_dir(&self.state_path))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &self.registry)?;
            writer.flush()?;
        }
        tmp.persist(&self.state_path).map_err(|err| err.error)?;
        info!("Snapshot written to {}", self.state_path.display());
        Ok(())
    }
}

/// Read a JSON transcript: an array of transactions.
pub fn read_transcript(path: impl AsRef<Path>) -> Result<Vec<Transaction>, HostError> {
    let file = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(file)?)
}

/// Take the exclusive lock guarding the snapshot at `state_path`, blocking
/// until any other holder releases it.
///
/// The lock lives on a sibling `.lock` file, since persisting replaces the
/// snapshot file itself.
fn lock_snapshot(state_path: &Path) -> Result<File, HostError> {
    let lock_path = lock_path(state_path);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;
    debug!("Waiting for {}", lock_path.display());
    file.lock_exclusive()?;
    debug!("Locked {}", lock_path.display());
    Ok(file)
}

fn lock_path(state_path: &Path) -> PathBuf {
    let mut path = state_path.as_os_str().to_owned();
    path.push(".lock");
    PathBuf::from(path)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn read_snapshot(state_path: &Path) -> Result<VotingRegistry, HostError> {
    let file = BufReader::new(File::open(state_path)?);
    let state: RegistryState = serde_json::from_reader(file)?;
    let registry = VotingRegistry::try_from(state)?;
    info!(
        "Restored registry from {} ({} candidates, {} events)",
        state_path.display(),
        registry.candidates_count(),
        registry.events().len()
    );
    Ok(registry)
}
