//! Platform-specific shell selection and exit status handling

use std::env;
use std::process::ExitStatus;

/// Shell invocation for the current platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInfo {
    /// Shell executable (e.g., "sh", "cmd")
    pub program: &'static str,
    /// Flag that makes the shell run a command string (e.g., "-c", "/C")
    pub command_flag: &'static str,
    windows: bool,
}

impl ShellInfo {
    /// Detect the current platform's shell
    pub fn current() -> Self {
        Self::from_os(env::consts::OS)
    }

    /// Create shell info from an OS string
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self {
                program: "cmd",
                command_flag: "/C",
                windows: true,
            },
            _ => Self {
                program: "sh",
                command_flag: "-c",
                windows: false,
            },
        }
    }

    /// Rewrite `script` so its standard error is interleaved into standard output
    pub fn with_combined_output(&self, script: &str) -> String {
        if self.windows {
            format!("({}) 2>&1", script)
        } else {
            format!("exec 2>&1\n{}", script)
        }
    }
}

/// Exit code of a finished process. A process killed by a signal reports
/// `128 + signal`, as POSIX shells do.
pub fn exit_status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
