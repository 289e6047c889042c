// src/exec/signal.rs

//! Process-group signalling (Unix only).

use std::io;

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use tracing::debug;

use crate::types::ProcessSignal;

fn nix_signal(signal: ProcessSignal) -> Signal {
    match signal {
        ProcessSignal::Interrupt => Signal::SIGINT,
        ProcessSignal::Kill => Signal::SIGKILL,
    }
}

/// Send `signal` to the process group led by `pid`.
///
/// `ESRCH` (the group is already gone) counts as success.
pub fn signal_process_group(pid: u32, signal: ProcessSignal) -> io::Result<()> {
    let pgid = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;

    match killpg(Pid::from_raw(pgid), nix_signal(signal)) {
        Ok(()) => {
            debug!(pgid, ?signal, "signalled process group");
            Ok(())
        }
        Err(Errno::ESRCH) => {
            debug!(pgid, ?signal, "process group already exited");
            Ok(())
        }
        Err(errno) => Err(io::Error::from(errno)),
    }
}
