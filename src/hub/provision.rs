use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use tracing::{info, warn};

use crate::error::RawfetchError;

use super::DatasetHub;

/// A way of installing a hub client that is missing.
pub trait Provisioner {
    /// Human-readable form of what will be run.
    fn describe(&self) -> String;

    fn provision(&self) -> Result<(), RawfetchError>;
}

/// Runs an external installer command, e.g. `pipx install kagglehub`.
#[derive(Clone, Debug)]
pub struct CommandProvisioner {
    package: String,
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandProvisioner {
    pub fn new<I, S>(package: impl Into<String>, program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            package: package.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Provisioner for CommandProvisioner {
    fn describe(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().map(|arg| arg.to_string_lossy().into_owned()));
        parts.join(" ")
    }

    fn provision(&self) -> Result<(), RawfetchError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| RawfetchError::Provisioning {
                hub: self.package.clone(),
                message: format!("failed to run '{}': {source}", self.describe()),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RawfetchError::Provisioning {
                hub: self.package.clone(),
                message: format!("'{}' exited with {status}", self.describe()),
            })
        }
    }
}

/// Make sure `hub` is usable, trying each provisioner in order.
///
/// Availability is re-checked after every successful provisioner; the
/// first one that leaves the hub available wins.
pub fn ensure_available(
    hub: &dyn DatasetHub,
    provisioners: &[Box<dyn Provisioner>],
) -> Result<(), RawfetchError> {
    if hub.is_available() {
        return Ok(());
    }

    warn!("{} not found", hub.name());
    let mut failures = Vec::new();
    for provisioner in provisioners {
        let description = provisioner.describe();
        info!("Installing {} via '{description}'...", hub.name());
        match provisioner.provision() {
            Ok(()) if hub.is_available() => {
                info!("{} is now available", hub.name());
                return Ok(());
            }
            Ok(()) => {
                warn!("'{description}' succeeded but {} is still unavailable", hub.name());
                failures.push(format!("'{description}' did not make it importable"));
            }
            Err(err) => {
                warn!("{err}");
                failures.push(err.to_string());
            }
        }
    }

    Err(RawfetchError::Provisioning {
        hub: hub.name().to_string(),
        message: if failures.is_empty() {
            "client unavailable and automatic installation is disabled".to_string()
        } else {
            failures.join("; ")
        },
    })
}
