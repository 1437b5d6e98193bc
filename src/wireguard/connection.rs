//! Connection listing and the stop-then-start toggle protocol

use super::inventory::Inventory;
use super::runner::{CommandRunner, SudoRunner};
use super::status::{active_interfaces, summary_lines};
use super::WireGuardError;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// A configured tunnel and whether it is currently up.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Connection {
    pub name: String,
    pub active: bool,
}

/// Composes the inventory and the status probe, and drives `wg-quick`.
///
/// At most one tunnel is meant to be active at a time; multiple default
/// WireGuard configs would fight over the same iptables rules. `toggle`
/// enforces this by stopping every active tunnel before starting the
/// requested one instead of diffing.
pub struct WireGuardManager {
    inventory: Inventory,
    runner: Box<dyn CommandRunner>,
}

impl WireGuardManager {
    pub fn new(config_dir: PathBuf) -> Self {
        Self::with_runner(config_dir, Box::new(SudoRunner))
    }

    pub fn with_runner(config_dir: PathBuf, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            inventory: Inventory::new(config_dir),
            runner,
        }
    }

    /// Every configured tunnel, flagged active iff `wg show` reports it.
    /// Order follows the inventory listing.
    pub fn list_connections(&self) -> Result<Vec<Connection>, WireGuardError> {
        let all = self.inventory.list_all()?;
        let active = active_interfaces(&self.raw_status()?);

        Ok(all
            .into_iter()
            .map(|name| {
                let active = active.contains(&name);
                Connection { name, active }
            })
            .collect())
    }

    /// Human-readable status lines from a fresh probe.
    pub fn status_summary(&self) -> Result<Vec<String>, WireGuardError> {
        Ok(summary_lines(&self.raw_status()?))
    }

    /// Stop every active tunnel, then start `name` unless it was among them.
    ///
    /// Toggling the sole active tunnel therefore deactivates it with no
    /// replacement. Returns the combined output of all invocations in order.
    ///
    /// The unknown-name check runs against the inventory before anything is
    /// executed, so a bad name costs zero external invocations. A failed
    /// deactivation aborts the whole toggle; a failed activation leaves the
    /// host with zero active tunnels and is surfaced verbatim, output
    /// included. Neither is retried or rolled back.
    pub fn toggle(&self, name: &str) -> Result<Vec<u8>, WireGuardError> {
        let all = self.inventory.list_all()?;
        if !all.iter().any(|n| n == name) {
            return Err(WireGuardError::UnknownConnection(name.to_string()));
        }

        let active = active_interfaces(&self.raw_status()?);
        let target_was_active = active.iter().any(|n| n == name);

        let mut output = Vec::new();
        for conn in all.iter().filter(|n| active.contains(*n)) {
            info!("Stopping connection {}", conn);
            let out = self.runner.run(&["wg-quick", "down", conn.as_str()])?;
            output.extend_from_slice(&out);
            info!("Successfully stopped connection {}", conn);
        }

        if !target_was_active {
            info!("Starting connection {}", name);
            let out = self.runner.run(&["wg-quick", "up", name])?;
            output.extend_from_slice(&out);
            info!("Successfully started connection {}", name);
        }

        Ok(output)
    }

    fn raw_status(&self) -> Result<String, WireGuardError> {
        let raw = self.runner.run(&["wg", "show"])?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    type CallLog = Arc<Mutex<Vec<Vec<String>>>>;

    /// Runner that records every argv and serves scripted responses.
    struct FakeRunner {
        status_output: String,
        fail_down: bool,
        fail_up: bool,
        calls: CallLog,
    }

    impl FakeRunner {
        fn with_status(status_output: &str) -> Self {
            Self {
                status_output: status_output.to_string(),
                fail_down: false,
                fail_up: false,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, argv: &[&str]) -> Result<Vec<u8>, WireGuardError> {
            self.calls
                .lock()
                .unwrap()
                .push(argv.iter().map(|s| s.to_string()).collect());

            let fail = |argv: &[&str]| WireGuardError::CommandFailed {
                command: format!("sudo {}", argv.join(" ")),
                status: "exit status: 1".to_string(),
                output: "scripted failure".to_string(),
            };

            match argv {
                ["wg", "show"] => Ok(self.status_output.clone().into_bytes()),
                ["wg-quick", "down", name] => {
                    if self.fail_down {
                        Err(fail(argv))
                    } else {
                        Ok(format!("down {}\n", name).into_bytes())
                    }
                }
                ["wg-quick", "up", name] => {
                    if self.fail_up {
                        Err(fail(argv))
                    } else {
                        Ok(format!("up {}\n", name).into_bytes())
                    }
                }
                other => panic!("unexpected command: {:?}", other),
            }
        }
    }

    fn config_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(format!("{}.conf", name)), "").unwrap();
        }
        dir
    }

    fn manager(dir: &TempDir, runner: FakeRunner) -> (WireGuardManager, CallLog) {
        // Keep a handle on the call log before the runner is boxed away.
        let calls = runner.calls.clone();
        (
            WireGuardManager::with_runner(dir.path().to_path_buf(), Box::new(runner)),
            calls,
        )
    }

    #[test]
    fn test_list_connections_flags_active() {
        let dir = config_dir(&["home", "office"]);
        let (manager, _calls) = manager(&dir, FakeRunner::with_status("interface: office\n"));

        let connections = manager.list_connections().unwrap();
        assert_eq!(
            connections,
            vec![
                Connection {
                    name: "home".to_string(),
                    active: false
                },
                Connection {
                    name: "office".to_string(),
                    active: true
                },
            ]
        );
    }

    #[test]
    fn test_list_connections_none_active() {
        let dir = config_dir(&["home", "office"]);
        let (manager, _calls) = manager(&dir, FakeRunner::with_status(""));

        let connections = manager.list_connections().unwrap();
        assert!(connections.iter().all(|c| !c.active));
    }

    #[test]
    fn test_toggle_switches_active_tunnel() {
        let dir = config_dir(&["home", "office"]);
        let (manager, calls) = manager(&dir, FakeRunner::with_status("interface: home\n"));

        let output = manager.toggle("office").unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "down home\nup office\n");

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], vec!["wg", "show"]);
        assert_eq!(calls[1], vec!["wg-quick", "down", "home"]);
        assert_eq!(calls[2], vec!["wg-quick", "up", "office"]);
    }

    #[test]
    fn test_toggle_active_tunnel_only_deactivates() {
        let dir = config_dir(&["home", "office"]);
        let (manager, calls) = manager(&dir, FakeRunner::with_status("interface: home\n"));

        let output = manager.toggle("home").unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "down home\n");

        let calls = calls.lock().unwrap();
        assert!(!calls.iter().any(|argv| argv.first().map(String::as_str) == Some("wg-quick")
            && argv.get(1).map(String::as_str) == Some("up")));
    }

    #[test]
    fn test_toggle_inactive_with_nothing_active() {
        let dir = config_dir(&["home"]);
        let (manager, calls) = manager(&dir, FakeRunner::with_status(""));

        let output = manager.toggle("home").unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "up home\n");

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2); // wg show, then the single up
    }

    #[test]
    fn test_toggle_unknown_issues_no_invocations() {
        let dir = config_dir(&["home"]);
        let (manager, calls) = manager(&dir, FakeRunner::with_status("interface: home\n"));

        let err = manager.toggle("unknown").unwrap_err();
        assert!(matches!(err, WireGuardError::UnknownConnection(ref n) if n == "unknown"));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_toggle_deactivates_in_listing_order() {
        // Two tunnels somehow active at once: both are stopped, sorted order.
        let dir = config_dir(&["office", "home"]);
        let (manager, calls) =
            manager(&dir, FakeRunner::with_status("interface: office\ninterface: home\n"));

        manager.toggle("home").unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[1], vec!["wg-quick", "down", "home"]);
        assert_eq!(calls[2], vec!["wg-quick", "down", "office"]);
    }

    #[test]
    fn test_toggle_aborts_on_deactivation_failure() {
        let dir = config_dir(&["home", "office"]);
        let mut fake = FakeRunner::with_status("interface: home\ninterface: office\n");
        fake.fail_down = true;
        let (manager, calls) = manager(&dir, fake);

        let err = manager.toggle("office").unwrap_err();
        assert!(matches!(err, WireGuardError::CommandFailed { .. }));

        // First down failed: no second down, no up.
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], vec!["wg-quick", "down", "home"]);
    }

    #[test]
    fn test_toggle_activation_failure_surfaced_without_rollback() {
        let dir = config_dir(&["home", "office"]);
        let mut fake = FakeRunner::with_status("interface: home\n");
        fake.fail_up = true;
        let (manager, calls) = manager(&dir, fake);

        let err = manager.toggle("office").unwrap_err();
        assert!(err.to_string().contains("scripted failure"));

        // home was stopped and stays stopped; nothing is re-activated.
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], vec!["wg-quick", "up", "office"]);
    }

    #[test]
    fn test_status_summary_passthrough() {
        let dir = config_dir(&["office"]);
        let raw = "interface: office\n  latest handshake: now\n  transfer: 1 B\n";
        let (manager, _calls) = manager(&dir, FakeRunner::with_status(raw));

        let lines = manager.status_summary().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Connection: office");
    }
}
