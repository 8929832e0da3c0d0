//! Deciding when it is safe to run.
//!
//! On application startup no window exists yet, so the installer waits for
//! the first window to open and then for that window to finish loading
//! before showing anything. For every other launch reason it runs at once.

use crate::engine::{ApplicationEngine, RunReport};
use crate::{Error, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Why the host started the installer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchReason {
    /// The host application is starting; no windows yet.
    AppStartup,
    /// Installed, enabled or upgraded while the host is already running.
    Enable,
}

impl LaunchReason {
    pub fn needs_window(self) -> bool {
        matches!(self, LaunchReason::AppStartup)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// Window notifications delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Opened(WindowId),
    Loaded(WindowId),
}

/// Wait until a window is ready to host a prompt.
///
/// Returns the window that became ready, or `None` when no wait was needed.
/// Only the first `Opened` window is tracked; the open listener is finished
/// as soon as it fires.
pub async fn wait_until_ready(
    reason: LaunchReason,
    events: &mut mpsc::Receiver<WindowEvent>,
) -> Result<Option<WindowId>> {
    if !reason.needs_window() {
        return Ok(None);
    }

    let window = loop {
        match events.recv().await {
            Some(WindowEvent::Opened(id)) => break id,
            Some(other) => debug!(event = ?other, "ignored before first window opened"),
            None => return Err(Error::Lifecycle("host closed before a window opened".into())),
        }
    };
    debug!(window = window.0, "first window opened; waiting for load");

    loop {
        match events.recv().await {
            Some(WindowEvent::Loaded(id)) if id == window => {
                info!(window = window.0, "window loaded");
                return Ok(Some(window));
            }
            Some(other) => debug!(event = ?other, "ignored while waiting for load"),
            None => {
                return Err(Error::Lifecycle(format!(
                    "host closed before window {} loaded",
                    window.0
                )));
            }
        }
    }
}

/// Wait as `reason` requires, then run the engine.
///
/// A failed wait is reported like any other run failure and the installer is
/// still removed.
pub async fn launch(
    engine: &ApplicationEngine<'_>,
    reason: LaunchReason,
    events: &mut mpsc::Receiver<WindowEvent>,
) -> RunReport {
    info!(?reason, "installer launched");
    match wait_until_ready(reason, events).await {
        Ok(_) => engine.run(),
        Err(e) => engine.abort(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;
    use grants::{PermissionEntry, RunConfig};

    #[test]
    fn test_only_startup_needs_window() {
        assert!(LaunchReason::AppStartup.needs_window());
        assert!(!LaunchReason::Enable.needs_window());
    }

    #[tokio::test]
    async fn test_non_startup_does_not_wait() {
        let (_tx, mut rx) = mpsc::channel(1);
        let ready = wait_until_ready(LaunchReason::Enable, &mut rx).await.unwrap();
        assert_eq!(ready, None);
    }

    #[tokio::test]
    async fn test_startup_waits_for_open_then_load() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(WindowEvent::Loaded(WindowId(9))).await.unwrap();
        tx.send(WindowEvent::Opened(WindowId(1))).await.unwrap();
        tx.send(WindowEvent::Opened(WindowId(2))).await.unwrap();
        tx.send(WindowEvent::Loaded(WindowId(2))).await.unwrap();
        tx.send(WindowEvent::Loaded(WindowId(1))).await.unwrap();

        let ready = wait_until_ready(LaunchReason::AppStartup, &mut rx)
            .await
            .unwrap();
        assert_eq!(ready, Some(WindowId(1)));
    }

    #[tokio::test]
    async fn test_closed_stream_is_lifecycle_error() {
        let (tx, mut rx) = mpsc::channel(2);
        tx.send(WindowEvent::Opened(WindowId(1))).await.unwrap();
        drop(tx);

        let err = wait_until_ready(LaunchReason::AppStartup, &mut rx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Lifecycle(_)));
    }

    #[tokio::test]
    async fn test_closed_before_any_window_is_lifecycle_error() {
        let (tx, mut rx) = mpsc::channel::<WindowEvent>(1);
        drop(tx);

        let err = wait_until_ready(LaunchReason::AppStartup, &mut rx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Lifecycle(_)));
    }

    #[tokio::test]
    async fn test_launch_with_closed_stream_alerts_and_removes() {
        let h = Harness::new(true);
        let config = RunConfig::new(vec![PermissionEntry::new("example.com")]).silent(true);
        let (tx, mut rx) = mpsc::channel(1);
        drop(tx);

        let report = launch(&h.engine(&config), LaunchReason::AppStartup, &mut rx).await;

        let alerts = h.prompt.alerts.borrow();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("Unexpected error:\n"));
        assert!(report.written.is_empty());
        assert!(report.removed);
        assert!(matches!(report.errors.as_slice(), [Error::Lifecycle(_)]));
        assert_eq!(h.calls(), vec!["uninstall"]);
    }

    #[tokio::test]
    async fn test_launch_runs_once_window_loaded() {
        let h = Harness::new(true);
        let config = RunConfig::new(vec![PermissionEntry::new("example.com")]).silent(true);
        let (tx, mut rx) = mpsc::channel(2);
        tx.send(WindowEvent::Opened(WindowId(3))).await.unwrap();
        tx.send(WindowEvent::Loaded(WindowId(3))).await.unwrap();

        let report = launch(&h.engine(&config), LaunchReason::AppStartup, &mut rx).await;

        assert_eq!(
            h.calls(),
            vec!["add http://example.com plugins 1", "uninstall"]
        );
        assert_eq!(report.written.len(), 1);
        assert!(report.removed);
        assert!(h.prompt.alerts.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_launch_on_enable_runs_immediately() {
        let h = Harness::new(true);
        let config = RunConfig::new(vec![PermissionEntry::new("foo.com").with_capability("flash")]);
        let (_tx, mut rx) = mpsc::channel(1);

        let report = launch(&h.engine(&config), LaunchReason::Enable, &mut rx).await;

        assert_eq!(h.prompt.confirms.get(), 1);
        assert_eq!(report.written.len(), 2);
        assert!(report.removed);
    }
}
