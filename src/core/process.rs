use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolveError {
    #[error("process {pid} not found")]
    NotFound { pid: u32 },
}

/// Maps a process id to its display name.
pub trait ProcessResolver {
    /// Called once per refresh cycle, after enumeration and before any lookup.
    fn begin_cycle(&mut self) {}

    /// # Errors
    ///
    /// Returns `ResolveError::NotFound` if the process has exited or is not visible.
    fn resolve_name(&mut self, pid: u32) -> Result<String, ResolveError>;
}

pub struct SysinfoResolver {
    system_info: System,
}

impl SysinfoResolver {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing().with_processes(ProcessRefreshKind::nothing());
        Self {
            system_info: System::new_with_specifics(refresh_kind),
        }
    }
}

impl ProcessResolver for SysinfoResolver {
    fn begin_cycle(&mut self) {
        self.system_info.refresh_processes(ProcessesToUpdate::All, true);
    }

    fn resolve_name(&mut self, pid: u32) -> Result<String, ResolveError> {
        self.system_info
            .process(Pid::from(pid as usize))
            .map(|proc| proc.name().to_string_lossy().to_string())
            .ok_or(ResolveError::NotFound { pid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_own_process() {
        let mut resolver = SysinfoResolver::new();
        resolver.begin_cycle();

        let name = resolver.resolve_name(std::process::id());
        assert!(name.is_ok());
        assert!(!name.unwrap_or_default().is_empty());
    }

    #[test]
    fn missing_pid_is_not_found() {
        let mut resolver = SysinfoResolver::new();
        resolver.begin_cycle();

        assert_eq!(
            resolver.resolve_name(u32::MAX),
            Err(ResolveError::NotFound { pid: u32::MAX })
        );
    }

    #[test]
    fn not_found_display() {
        let err = ResolveError::NotFound { pid: 42 };
        assert_eq!(err.to_string(), "process 42 not found");
    }
}
