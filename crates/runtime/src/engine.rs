//! Applies the manifest's entries to a grant store, then removes the installer.

use crate::confirm::ConfirmationGate;
use crate::host::{ComponentRegistry, Prompt};
use crate::{Error, Result};
use grants::{PermissionEntry, RunConfig};
use storage::{GrantStore, Permission};
use tracing::{debug, info, warn};

/// Where a run currently is. `Done` is reached exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Confirming,
    Applying,
    Finalizing,
    Done,
}

/// How the confirmation step went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confirmation {
    /// The entry list was empty, so nothing was asked.
    #[default]
    NotRequired,
    Silent,
    Accepted,
    Rejected,
}

/// Summary of a finished run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub state: RunState,
    pub confirmation: Confirmation,
    /// `(origin, grant key)` pairs written, in write order.
    pub written: Vec<(String, String)>,
    /// Every error that was reported to the user.
    pub errors: Vec<Error>,
    pub removed: bool,
}

impl RunReport {
    fn enter(&mut self, state: RunState) {
        debug!(from = ?self.state, to = ?state, "run state");
        self.state = state;
    }

    pub fn failed_entries(&self) -> Vec<usize> {
        self.errors
            .iter()
            .filter_map(|e| match e {
                Error::InvalidOrigin { index, .. } | Error::StoreWrite { index, .. } => {
                    Some(*index)
                }
                _ => None,
            })
            .collect()
    }
}

/// Runs the installer once against its collaborators.
///
/// Holds no state of its own; everything a run produces goes into the
/// returned [`RunReport`].
pub struct ApplicationEngine<'a> {
    config: &'a RunConfig,
    store: &'a dyn GrantStore,
    prompt: &'a dyn Prompt,
    registry: &'a dyn ComponentRegistry,
}

impl<'a> ApplicationEngine<'a> {
    pub fn new(
        config: &'a RunConfig,
        store: &'a dyn GrantStore,
        prompt: &'a dyn Prompt,
        registry: &'a dyn ComponentRegistry,
    ) -> Self {
        Self {
            config,
            store,
            prompt,
            registry,
        }
    }

    /// Confirm, apply every entry, then remove the installer.
    ///
    /// Never fails: errors are shown through [`Prompt::alert`] and collected
    /// in the report. Self-removal is attempted no matter what happened before.
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        let outcome = self.confirm_and_apply(&mut report);
        self.finish(report, outcome)
    }

    /// Skip straight to finalization after a failure that happened before the
    /// run could start.
    pub fn abort(&self, error: Error) -> RunReport {
        self.finish(RunReport::default(), Err(error))
    }

    fn finish(&self, mut report: RunReport, outcome: Result<()>) -> RunReport {
        if let Err(e) = outcome {
            warn!(error = %e, phase = ?e.phase(), "run failed before finalizing");
            self.alert(&format!("Unexpected error:\n{e}"));
            report.errors.push(e);
        }

        report.enter(RunState::Finalizing);
        match self.remove_self() {
            Ok(()) => {
                info!(id = self.config.component_id(), "installer removed");
                report.removed = true;
            }
            Err(e) => {
                warn!(error = %e, "self-removal failed");
                self.alert(&format!(
                    "Unexpected error:\n{e}\nPlease remove this installer manually."
                ));
                report.errors.push(e);
            }
        }

        report.enter(RunState::Done);
        info!(
            written = report.written.len(),
            errors = report.errors.len(),
            removed = report.removed,
            "run done"
        );
        report
    }

    fn confirm_and_apply(&self, report: &mut RunReport) -> Result<()> {
        let entries = &self.config.permissions;
        if entries.is_empty() {
            info!("no permissions to apply");
            return Ok(());
        }

        report.enter(RunState::Confirming);
        report.confirmation = if self.config.is_silent() {
            Confirmation::Silent
        } else if ConfirmationGate::new(self.prompt).confirm(
            entries,
            self.config.effective_title(),
            self.config.effective_warning(),
        )? {
            Confirmation::Accepted
        } else {
            Confirmation::Rejected
        };

        if report.confirmation == Confirmation::Rejected {
            info!("user declined; no grants applied");
            return Ok(());
        }

        report.enter(RunState::Applying);
        for (index, entry) in entries.iter().enumerate() {
            if let Err(e) = self.apply_entry(index, entry, report) {
                warn!(index, domain = %entry.domain, error = %e, "entry not applied");
                self.alert(&format!("Unexpected error adding a permission.\n{e}"));
                report.errors.push(e);
            }
        }
        Ok(())
    }

    fn apply_entry(
        &self,
        index: usize,
        entry: &PermissionEntry,
        report: &mut RunReport,
    ) -> Result<()> {
        let grant = grants::normalize(entry).map_err(|e| Error::from_grants(index, e))?;

        for (origin, key) in grant.pairs() {
            self.store
                .add(origin, key, Permission::Allow)
                .map_err(|source| Error::StoreWrite {
                    index,
                    origin: origin.to_string(),
                    grant: key.to_string(),
                    source,
                })?;
            info!(index, origin, key, "grant written");
            report.written.push((origin.to_string(), key.to_string()));
        }
        Ok(())
    }

    fn remove_self(&self) -> Result<()> {
        let id = self.config.component_id();
        let uninstall_error = |reason: String| Error::Uninstall {
            id: id.to_string(),
            reason,
        };

        let component = self
            .registry
            .lookup(id)
            .map_err(|e| uninstall_error(e.to_string()))?
            .ok_or_else(|| uninstall_error("component not found".to_string()))?;

        component
            .uninstall()
            .map_err(|e| uninstall_error(e.to_string()))
    }

    fn alert(&self, message: &str) {
        self.prompt.alert(self.config.effective_title(), message);
    }
}
