//! Scoped helper process, such as a browser automation server.
//!
//! The child is killed and reaped when the guard is shut down or dropped, so
//! an early return or a failed run never leaves it running.

use std::process::{Child, Command, ExitStatus, Stdio};

use tracing::{info, warn};

use crate::error::DriverError;

#[derive(Debug)]
pub struct ServerProcess {
    child: Option<Child>,
    command: String,
}

impl ServerProcess {
    /// Start `command_line`, split on whitespace into program and arguments.
    pub fn spawn(command_line: &str) -> Result<Self, DriverError> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or(DriverError::MissingConfig("helper process command"))?;
        let child = Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        info!(command = command_line, pid = child.id(), "helper process started");
        Ok(Self {
            child: Some(child),
            command: command_line.to_string(),
        })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Kill the process and wait for it to exit.
    pub fn shutdown(mut self) -> Result<Option<ExitStatus>, DriverError> {
        let status = self
            .child
            .take()
            .map(|mut child| terminate(&mut child))
            .transpose()?;
        Ok(status)
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Err(e) = terminate(&mut child)
        {
            warn!(command = %self.command, error = %e, "failed to stop helper process");
        }
    }
}

fn terminate(child: &mut Child) -> std::io::Result<ExitStatus> {
    // Already exited on its own.
    if let Some(status) = child.try_wait()? {
        return Ok(status);
    }
    child.kill()?;
    let status = child.wait()?;
    info!(pid = child.id(), ?status, "helper process stopped");
    Ok(status)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn shutdown_kills_long_running_child() {
        let server = ServerProcess::spawn("sleep 30").unwrap();
        assert!(server.id().is_some());
        let status = server.shutdown().unwrap().unwrap();
        assert!(!status.success());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn drop_reaps_child() {
        let pid = {
            let server = ServerProcess::spawn("sleep 30").unwrap();
            server.id().unwrap()
        };
        // Reaped children are gone from the process table.
        assert!(!std::path::Path::new(&format!("/proc/{pid}")).exists());
    }

    #[test]
    fn empty_command_rejected() {
        assert!(matches!(
            ServerProcess::spawn("   "),
            Err(DriverError::MissingConfig(_))
        ));
    }

    #[test]
    fn missing_program_is_io_error() {
        assert!(matches!(
            ServerProcess::spawn("timefill-no-such-program --flag"),
            Err(DriverError::Process(_))
        ));
    }
}
