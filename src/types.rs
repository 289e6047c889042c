use std::fmt;
use std::process::ExitStatus;

/// How a task process ended.
///
/// `code` is `None` when the process was terminated by a signal or its
/// status could not be collected; such exits count as failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskExit {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl TaskExit {
    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn with_signal(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }

    /// Exit whose status could not be determined (e.g. `wait` failed).
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for TaskExit {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

impl fmt::Display for TaskExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "{code}"),
            (None, Some(signal)) => write!(f, "signal {signal}"),
            (None, None) => f.write_str("unknown"),
        }
    }
}

/// Signals the shutdown sequencer sends to task processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessSignal {
    /// Polite request to stop (SIGINT on Unix).
    Interrupt,
    /// Forceful termination (SIGKILL on Unix).
    Kill,
}
