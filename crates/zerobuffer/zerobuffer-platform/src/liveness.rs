//! Process liveness probe (spec §4.1.4): given a pid, is it alive, without
//! signaling or otherwise disturbing the process.

/// Returns `true` if `pid` identifies a running process.
///
/// `kill(pid, 0)` performs no actual signal delivery; the kernel only runs
/// its permission and existence checks. `ESRCH` means "no such process",
/// `EPERM` means the process exists but we can't signal it (still alive),
/// any other outcome (including success) means alive.
pub fn is_process_alive(pid: u32) -> bool {
    if pid == 0 {
        return false;
    }
    let rc = unsafe { libc::kill(pid as libc::pid_t, 0) };
    if rc == 0 {
        return true;
    }
    let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
    errno != libc::ESRCH
}

/// Returns the calling process's pid, as stamped into the OIEB on
/// connect/create.
pub fn current_pid() -> u32 {
    std::process::id()
}
