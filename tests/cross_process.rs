//! Cross-process tests for the locking subsystem.
//!
//! Each test drives real child processes through the `phaselock run`
//! binary, so the arbitration being exercised is the kernel's own,
//! exactly as independent applications would hit it.

use phaselock::{LockError, Lockfile};
use serial_test::serial;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn phaselock_bin() -> &'static str {
    env!("CARGO_BIN_EXE_phaselock")
}

/// Spawn `phaselock run` holding `mode` on `lock` while sleeping for
/// `hold_secs` seconds.
fn spawn_holder(lock: &Lockfile, mode: &str, hold_secs: u32) -> Child {
    Command::new(phaselock_bin())
        .args([
            "run",
            "-m",
            mode,
            lock.path().to_str().unwrap(),
            "--",
            "sleep",
            &hold_secs.to_string(),
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn phaselock run")
}

/// Poll `cond` until it holds or `timeout` elapses.
fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(25));
    }
    false
}

/// Wait until some other process holds a conflicting lock.
fn wait_until_held(lock: &Lockfile) {
    assert!(
        wait_until(Duration::from_secs(10), || matches!(
            lock.try_exclusive(),
            Err(LockError::WouldBlock)
        )),
        "holder process never took the lock"
    );
}

fn temp_lock() -> (TempDir, Lockfile) {
    let dir = TempDir::new().unwrap();
    let lock = Lockfile::open(dir.path().join("res.lock")).unwrap();
    (dir, lock)
}

#[test]
#[serial]
fn exclusive_holder_excludes_other_processes() {
    let (_dir, lock) = temp_lock();

    let mut holder = spawn_holder(&lock, "exclusive", 15);
    wait_until_held(&lock);

    // Both modes are denied while a foreign process holds exclusive.
    assert!(matches!(lock.try_exclusive(), Err(LockError::WouldBlock)));
    assert!(matches!(lock.try_concurrent(), Err(LockError::WouldBlock)));

    holder.kill().unwrap();
    holder.wait().unwrap();
}

#[test]
#[serial]
fn non_blocking_run_reports_busy_exit_code() {
    let (_dir, lock) = temp_lock();

    let mut holder = spawn_holder(&lock, "exclusive", 15);
    wait_until_held(&lock);

    let status = Command::new(phaselock_bin())
        .args([
            "run",
            "-n",
            lock.path().to_str().unwrap(),
            "--",
            "true",
        ])
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(phaselock::exit_codes::LOCK_BUSY));

    holder.kill().unwrap();
    holder.wait().unwrap();
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn concurrent_holders_coexist_across_processes() {
    let (_dir, lock) = temp_lock();

    let mut first = spawn_holder(&lock, "concurrent", 15);
    let mut second = spawn_holder(&lock, "concurrent", 15);

    // Both children must be counted as live holders at the same time.
    assert!(
        wait_until(Duration::from_secs(10), || {
            lock.state().map(|s| s.concurrent >= 2).unwrap_or(false)
        }),
        "never observed two simultaneous concurrent holders"
    );

    // A third concurrent holder is still welcome; exclusive is not.
    let _third = lock.try_concurrent().unwrap();
    assert!(matches!(lock.try_exclusive(), Err(LockError::WouldBlock)));

    first.kill().unwrap();
    first.wait().unwrap();
    second.kill().unwrap();
    second.wait().unwrap();
}

#[test]
#[serial]
fn release_restores_availability_across_processes() {
    let (_dir, lock) = temp_lock();

    let mut holder = spawn_holder(&lock, "exclusive", 3);
    wait_until_held(&lock);

    // Blocking acquire must be granted once the holder's sleep ends.
    let started = Instant::now();
    let handle = lock.exclusive().unwrap();
    assert!(started.elapsed() < Duration::from_secs(30));
    drop(handle);

    holder.wait().unwrap();
}

#[test]
#[serial]
fn killed_holder_releases_the_lock() {
    let (_dir, lock) = temp_lock();

    let mut holder = spawn_holder(&lock, "exclusive", 60);
    wait_until_held(&lock);

    // SIGKILL: no release runs in the holder; the kernel's descriptor
    // teardown is all that frees the lock.
    holder.kill().unwrap();
    holder.wait().unwrap();

    assert!(
        wait_until(Duration::from_secs(10), || lock.try_exclusive().is_ok()),
        "lock never became acquirable after the holder was killed"
    );
}

#[test]
#[serial]
fn concurrent_first_open_converges_on_one_lockfile() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh.lock");

    // Several processes race to create the same missing lockfile.
    let children: Vec<Child> = (0..4)
        .map(|_| {
            Command::new(phaselock_bin())
                .args([
                    "run",
                    path.to_str().unwrap(),
                    "--",
                    "true",
                ])
                .stdout(Stdio::null())
                .spawn()
                .unwrap()
        })
        .collect();

    for mut child in children {
        assert!(child.wait().unwrap().success());
    }

    // All racers converged: the file exists and arbitration behaves.
    let lock = Lockfile::open(&path).unwrap();
    let _held = lock.try_exclusive().unwrap();
}

#[test]
#[serial]
fn run_propagates_wrapped_command_exit_code() {
    let (_dir, lock) = temp_lock();

    let status = Command::new(phaselock_bin())
        .args([
            "run",
            lock.path().to_str().unwrap(),
            "--",
            "sh",
            "-c",
            "exit 7",
        ])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(7));
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn status_json_reports_foreign_holders() {
    let (_dir, lock) = temp_lock();

    let mut holder = spawn_holder(&lock, "concurrent", 15);
    assert!(
        wait_until(Duration::from_secs(10), || {
            lock.state().map(|s| s.concurrent >= 1).unwrap_or(false)
        }),
        "holder process never took the lock"
    );

    let output = Command::new(phaselock_bin())
        .args(["status", "--json", lock.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["concurrent"], 1);
    assert_eq!(payload["exclusive"], 0);
    assert_eq!(payload["mode"], "concurrent");

    holder.kill().unwrap();
    holder.wait().unwrap();
}

#[test]
#[serial]
fn clean_does_not_remove_foreign_held_lockfile() {
    let (_dir, lock) = temp_lock();

    let mut holder = spawn_holder(&lock, "concurrent", 15);
    wait_until_held(&lock);

    assert!(!lock.clean(chrono::Duration::zero()).unwrap());
    assert!(lock.path().exists());

    holder.kill().unwrap();
    holder.wait().unwrap();

    // With the holder gone the token can be reclaimed.
    assert!(
        wait_until(Duration::from_secs(10), || {
            lock.clean(chrono::Duration::zero()).unwrap_or(false)
        }),
        "lockfile was never reclaimable after the holder died"
    );
    assert!(!lock.path().exists());
}

#[test]
#[serial]
fn mutual_exclusion_is_observed_by_competing_writers() {
    let (_dir, lock) = temp_lock();
    let journal = lock.path().with_file_name("journal");

    // Each writer appends a begin/end pair under an exclusive lock. If
    // exclusion ever failed, pairs from different writers would
    // interleave.
    let writers: Vec<Child> = (0..4)
        .map(|i| {
            let script = format!(
                "echo begin-{i} >> {p}; sleep 0.1; echo end-{i} >> {p}",
                p = journal.display()
            );
            Command::new(phaselock_bin())
                .args([
                    "run",
                    lock.path().to_str().unwrap(),
                    "--",
                    "sh",
                    "-c",
                    &script,
                ])
                .spawn()
                .unwrap()
        })
        .collect();

    for mut writer in writers {
        assert!(writer.wait().unwrap().success());
    }

    let contents = std::fs::read_to_string(&journal).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 8);
    for pair in lines.chunks(2) {
        let begin = pair[0].strip_prefix("begin-").unwrap();
        let end = pair[1].strip_prefix("end-").unwrap();
        assert_eq!(begin, end, "critical sections interleaved: {contents}");
    }
}
