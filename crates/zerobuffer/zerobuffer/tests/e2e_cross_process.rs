//! Two-process integration tests (spec §8 scenarios 6 and 7): these need a
//! real dead pid, so a single process's threads can't stand in for the
//! peer. Grounded on `lithos-icc`'s `tests/e2e_mmap.rs` self-spawning
//! pattern: the same test binary re-execs itself with a role env var, and
//! the orchestrating test waits on the child's exit status.

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

macro_rules! log {
    ($($arg:tt)*) => {{
        let _ = writeln!(std::io::stderr(), $($arg)*);
        let _ = std::io::stderr().flush();
    }};
}

const ENV_ROLE: &str = "ZEROBUFFER_E2E_ROLE";
const ENV_NAME: &str = "ZEROBUFFER_E2E_NAME";

const ROLE_WRITER_THEN_DIE: &str = "writer-then-die";
const ROLE_STALE_READER: &str = "stale-reader";

fn unique_name(case: &str) -> String {
    format!("zb-e2e-{}-{case}-{}", std::process::id(), Instant::now().elapsed().as_nanos())
}

/// Connects, writes one frame so the reader has something to block past,
/// then exits the process *without* dropping `Writer` cleanly — `std::process::exit`
/// skips destructors, leaving `writer_pid` stamped and the process genuinely
/// dead, which is what the reader's liveness probe needs to observe.
fn run_writer_then_die(name: &str) {
    use std::time::Duration;
    use zerobuffer::Writer;

    let mut writer = Writer::connect(name).expect("writer: connect failed");
    writer.write_frame(b"one frame then I die", Duration::from_secs(5)).expect("writer: write failed");
    log!("[WRITER] wrote one frame, now exiting without disconnecting");
    std::process::exit(0);
}

/// Stamps a reader pid into a freshly created buffer and exits without
/// running `Drop` (so the shared memory and semaphores are left behind,
/// exactly like a crash), for the orchestrator to reclaim afterwards.
fn run_stale_reader(name: &str) {
    use zerobuffer::{BufferConfig, Reader};

    let _reader = Reader::create(name, BufferConfig::new(0, 4096)).expect("stale reader: create failed");
    log!("[STALE-READER] created buffer, now exiting without destroying it");
    std::process::exit(0);
}

fn spawn_role(exe: &std::path::Path, test_name: &str, role: &str, name: &str) -> std::process::Child {
    Command::new(exe)
        .arg("--exact")
        .arg(test_name)
        .env(ENV_ROLE, role)
        .env(ENV_NAME, name)
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn child process")
}

/// spec §8 scenario 6: "Writer death during read". The reader blocks in
/// `read_frame(timeout)`; the writer process dies without disconnecting.
/// The reader must surface `WriterDead`, not merely `Timeout`, once it
/// re-checks liveness on timeout.
#[test]
fn writer_death_during_read_is_detected() {
    if let Ok(role) = env::var(ENV_ROLE) {
        let _ = tracing_subscriber::fmt::try_init();
        let name = env::var(ENV_NAME).expect("missing name");
        match role.as_str() {
            ROLE_WRITER_THEN_DIE => run_writer_then_die(&name),
            other => panic!("unknown role: {other}"),
        }
        return;
    }

    use zerobuffer::{BufferConfig, Reader, ZeroBufferError};

    let name = unique_name("writer-death");
    let mut reader = Reader::create(&name, BufferConfig::new(0, 4096)).unwrap();

    let exe = env::current_exe().unwrap();
    let mut child = spawn_role(&exe, "writer_death_during_read_is_detected", ROLE_WRITER_THEN_DIE, &name);

    // Drain the one frame the child wrote before it exits, so the reader's
    // *next* read_frame is the one that has to wait out the dead writer.
    let frame = reader.read_frame(Duration::from_secs(5)).unwrap();
    assert_eq!(&frame[..], b"one frame then I die");
    reader.release_frame(frame);

    let status = child.wait().unwrap();
    assert!(status.success(), "writer child exited abnormally: {status}");

    let result = reader.read_frame(Duration::from_secs(3));
    assert!(matches!(result, Err(ZeroBufferError::WriterDead)), "expected WriterDead, got {result:?}");
}

/// spec §8 scenario 7: "Stale-buffer reclamation". A previous reader
/// crashed, leaving the shared-memory region and both semaphores behind. A
/// new `Reader::create` for the same name must detect the dead owner,
/// unlink the stale resources, and succeed with a fresh buffer.
#[test]
fn stale_reader_buffer_is_reclaimed() {
    if let Ok(role) = env::var(ENV_ROLE) {
        let _ = tracing_subscriber::fmt::try_init();
        let name = env::var(ENV_NAME).expect("missing name");
        match role.as_str() {
            ROLE_STALE_READER => run_stale_reader(&name),
            other => panic!("unknown role: {other}"),
        }
        return;
    }

    use zerobuffer::{BufferConfig, Reader, Writer};

    let name = unique_name("stale-reclaim");
    let exe = env::current_exe().unwrap();

    let mut child = spawn_role(&exe, "stale_reader_buffer_is_reclaimed", ROLE_STALE_READER, &name);
    let status = child.wait().unwrap();
    assert!(status.success(), "stale-reader child exited abnormally: {status}");

    // The dead reader left shared memory and semaphores behind; a fresh
    // Reader::create for the same name must reclaim rather than fail.
    let mut reader = Reader::create(&name, BufferConfig::new(0, 8192)).expect("reclamation should succeed");
    let mut writer = Writer::connect(&name).unwrap();
    writer.write_frame(b"fresh buffer works", Duration::from_secs(2)).unwrap();
    let frame = reader.read_frame(Duration::from_secs(2)).unwrap();
    assert_eq!(&frame[..], b"fresh buffer works");
    assert_eq!(frame.sequence(), 1, "reclaimed buffer starts sequence numbering over at 1");
}
