// Safe process execution.
//
// Every external program runs through `spawn`: an explicit program plus a
// discrete argument vector, never a shell string. Nothing here quotes, joins
// or interpolates user input into a command line; metacharacters in a project
// name reach the child as literal bytes of a single argv element.
//
// - stdout/stderr are fully buffered, and optionally streamed to callbacks
// - the child's environment is rebuilt from scratch with credentials removed
// - on timeout the child's process group gets SIGTERM, then SIGKILL after a grace window
// - non-zero exit is data, not an error; `exec_or_throw` applies that policy

use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{CommandError, Error, Result};
use crate::safe_env::{self, EnvMap, EnvPolicy};
use crate::utils::shell;

/// Grace window between the graceful and the forceful termination signal.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const READ_CHUNK: usize = 8 * 1024;

type ChunkCallback<'a> = Box<dyn FnMut(&str) + 'a>;

/// Options for a single `spawn`.
pub struct SpawnOptions<'a> {
    pub cwd: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub kill_grace: Duration,
    /// Explicit environment. Still scrubbed by `env_policy` before use.
    pub env: Option<EnvMap>,
    pub env_policy: EnvPolicy,
    on_stdout: Option<ChunkCallback<'a>>,
    on_stderr: Option<ChunkCallback<'a>>,
}

impl Default for SpawnOptions<'_> {
    fn default() -> Self {
        Self {
            cwd: None,
            timeout: None,
            kill_grace: DEFAULT_KILL_GRACE,
            env: None,
            env_policy: EnvPolicy::Denylist,
            on_stdout: None,
            on_stderr: None,
        }
    }
}

impl<'a> SpawnOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    pub fn env(mut self, env: EnvMap) -> Self {
        self.env = Some(env);
        self
    }

    pub fn env_policy(mut self, policy: EnvPolicy) -> Self {
        self.env_policy = policy;
        self
    }

    pub fn on_stdout(mut self, callback: impl FnMut(&str) + 'a) -> Self {
        self.on_stdout = Some(Box::new(callback));
        self
    }

    pub fn on_stderr(mut self, callback: impl FnMut(&str) + 'a) -> Self {
        self.on_stderr = Some(Box::new(callback));
        self
    }

    fn child_env(&self) -> EnvMap {
        match &self.env {
            Some(env) => safe_env::sanitize_env_with(env, &self.env_policy),
            None => safe_env::sanitize_env_with(&safe_env::current_env(), &self.env_policy),
        }
    }
}

/// Outcome of one process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub exit_status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_signal: Option<String>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_status == Some(0)
    }

    /// Prefers stderr, falls back to stdout if stderr is empty.
    pub fn error_text(&self) -> String {
        if !self.stderr.trim().is_empty() {
            self.stderr.trim().to_string()
        } else {
            self.stdout.trim().to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamKind {
    Stdout,
    Stderr,
}

struct Chunk {
    kind: StreamKind,
    bytes: Vec<u8>,
}

fn pump<R: Read + Send + 'static>(
    mut reader: R,
    kind: StreamKind,
    tx: Sender<Chunk>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match reader.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let chunk = Chunk {
                        kind,
                        bytes: buf[..n].to_vec(),
                    };
                    if tx.send(chunk).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

/// Tracks the timeout → SIGTERM → grace → SIGKILL escalation for one child.
struct Watchdog {
    deadline: Instant,
    grace: Duration,
    terminated_at: Option<Instant>,
    killed: bool,
}

impl Watchdog {
    fn new(timeout: Duration, grace: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            grace,
            terminated_at: None,
            killed: false,
        }
    }

    fn timed_out(&self) -> bool {
        self.terminated_at.is_some()
    }

    fn killed(&self) -> bool {
        self.killed
    }

    /// The deadline applies to the whole process group: a direct child that
    /// already exited may have left grandchildren holding our pipes.
    fn tick(&mut self, child: &mut Child, exited: bool) {
        let now = Instant::now();
        match self.terminated_at {
            None if now >= self.deadline => {
                tracing::debug!(
                    pid = child.id(),
                    exited,
                    "timeout reached, sending graceful termination"
                );
                terminate(child, exited);
                self.terminated_at = Some(now);
            }
            Some(at) if !self.killed && now >= at + self.grace => {
                tracing::debug!(pid = child.id(), "grace window elapsed, killing");
                force_kill(child, exited);
                self.killed = true;
            }
            _ => {}
        }
    }
}

#[cfg(unix)]
fn signal_group(child: &Child, signal: libc::c_int) {
    // The child leads its own process group (see `spawn`), so this reaches
    // any grandchildren holding our pipes as well.
    // SAFETY: kill(2) has no memory-safety preconditions.
    unsafe {
        libc::kill(-(child.id() as libc::pid_t), signal);
    }
}

#[cfg(unix)]
fn terminate(child: &mut Child, _exited: bool) {
    signal_group(child, libc::SIGTERM);
}

#[cfg(not(unix))]
fn terminate(child: &mut Child, exited: bool) {
    if !exited {
        let _ = child.kill();
    }
}

#[cfg(unix)]
fn force_kill(child: &mut Child, exited: bool) {
    signal_group(child, libc::SIGKILL);
    if !exited {
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn force_kill(child: &mut Child, exited: bool) {
    if !exited {
        let _ = child.kill();
    }
}

#[cfg(unix)]
fn signal_of(status: &ExitStatus) -> Option<String> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(signal_name)
}

#[cfg(not(unix))]
fn signal_of(_status: &ExitStatus) -> Option<String> {
    None
}

#[cfg(unix)]
fn signal_name(signal: i32) -> String {
    match signal {
        libc::SIGHUP => "SIGHUP".to_string(),
        libc::SIGINT => "SIGINT".to_string(),
        libc::SIGQUIT => "SIGQUIT".to_string(),
        libc::SIGABRT => "SIGABRT".to_string(),
        libc::SIGKILL => "SIGKILL".to_string(),
        libc::SIGSEGV => "SIGSEGV".to_string(),
        libc::SIGPIPE => "SIGPIPE".to_string(),
        libc::SIGTERM => "SIGTERM".to_string(),
        other => format!("SIG{}", other),
    }
}

/// Render a command line for logs and error messages. Display only; never executed.
pub fn display_command<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(
        args.iter()
            .map(|a| a.as_ref().to_string_lossy().into_owned()),
    );
    shell::quote_args(&parts)
}

/// Run `program` with an explicit argument vector and wait for it.
///
/// Errors only when the program cannot be started (`ORBIT-C004`) or when the
/// timeout elapses (`ORBIT-C003`). A non-zero exit is returned as data.
pub fn spawn<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    mut options: SpawnOptions<'_>,
) -> Result<ExecutionResult> {
    let command_line = display_command(program, args);
    let cwd = match &options.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    tracing::debug!(command = %command_line, cwd = %cwd.display(), "spawning");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(&cwd)
        .env_clear()
        .envs(options.child_env())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    if options.timeout.is_some() {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let mut child = cmd.spawn().map_err(|e| {
        Error::Command(CommandError::FailedToStart {
            program: program.to_string(),
            reason: e.to_string(),
        })
    })?;

    let (tx, rx) = mpsc::channel();
    let mut readers = Vec::with_capacity(2);
    if let Some(out) = child.stdout.take() {
        readers.push(pump(out, StreamKind::Stdout, tx.clone()));
    }
    if let Some(err) = child.stderr.take() {
        readers.push(pump(err, StreamKind::Stderr, tx.clone()));
    }
    drop(tx);

    let mut watchdog = options
        .timeout
        .map(|timeout| Watchdog::new(timeout, options.kill_grace));

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut streams_open = true;
    let mut status: Option<ExitStatus> = None;
    let mut exited_at: Option<Instant> = None;

    loop {
        if streams_open {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(chunk) => {
                    let text = String::from_utf8_lossy(&chunk.bytes);
                    match chunk.kind {
                        StreamKind::Stdout => {
                            stdout.extend_from_slice(&chunk.bytes);
                            if let Some(cb) = options.on_stdout.as_mut() {
                                cb(&text);
                            }
                        }
                        StreamKind::Stderr => {
                            stderr.extend_from_slice(&chunk.bytes);
                            if let Some(cb) = options.on_stderr.as_mut() {
                                cb(&text);
                            }
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => streams_open = false,
            }
        } else if status.is_none() {
            thread::sleep(POLL_INTERVAL);
        }

        if status.is_none() {
            status = child.try_wait()?;
            if status.is_some() {
                exited_at = Some(Instant::now());
            }
        }

        if !streams_open && status.is_some() {
            break;
        }

        match watchdog.as_mut() {
            Some(dog) => {
                dog.tick(&mut child, status.is_some());
                // Something outside the group still holds the pipes.
                if dog.killed() && status.is_some() {
                    break;
                }
            }
            None => {
                // Without a timeout there is no group to signal; stop waiting
                // on output held open by a background process once the child
                // itself has been gone for a grace window.
                if exited_at.is_some_and(|at| at.elapsed() >= options.kill_grace) {
                    tracing::debug!(command = %command_line, "output still held open after exit");
                    break;
                }
            }
        }
    }

    // Readers blocked on pipes someone else still holds are left detached.
    if !streams_open {
        for reader in readers {
            let _ = reader.join();
        }
    }

    let status = match status {
        Some(status) => status,
        None => child.wait()?,
    };

    if let Some(dog) = &watchdog {
        if dog.timed_out() {
            let timeout_ms = options
                .timeout
                .map(|t| t.as_millis() as u64)
                .unwrap_or_default();
            tracing::warn!(command = %command_line, timeout_ms, "command timed out");
            return Err(Error::Command(CommandError::Timeout {
                command: command_line,
                timeout_ms,
            }));
        }
    }

    let result = ExecutionResult {
        exit_status: status.code(),
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        termination_signal: signal_of(&status),
    };

    tracing::debug!(
        command = %command_line,
        exit_status = ?result.exit_status,
        signal = ?result.termination_signal,
        "finished"
    );

    Ok(result)
}

/// Turn a finished invocation into stdout, or a `ORBIT-C002` error carrying stderr.
pub fn require_success<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    result: ExecutionResult,
) -> Result<String> {
    if result.success() {
        return Ok(result.stdout);
    }

    Err(Error::Command(CommandError::Failed {
        command: display_command(program, args),
        exit_status: result.exit_status,
        signal: result.termination_signal.clone(),
        stderr: result.error_text(),
    }))
}

/// `spawn`, treating any non-zero exit as fatal. Returns stdout.
pub fn exec_or_throw<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    options: SpawnOptions<'_>,
) -> Result<String> {
    let result = spawn(program, args, options)?;
    require_success(program, args, result)
}

/// Seam between orchestration and real processes.
pub trait ProcessRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        options: SpawnOptions<'_>,
    ) -> Result<ExecutionResult>;

    fn run_or_throw(
        &self,
        program: &str,
        args: &[String],
        options: SpawnOptions<'_>,
    ) -> Result<String> {
        let result = self.run(program, args, options)?;
        require_success(program, args, result)
    }
}

/// Runs real processes through `spawn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        options: SpawnOptions<'_>,
    ) -> Result<ExecutionResult> {
        spawn(program, args, options)
    }
}

/// Helper for call sites that only have a directory reference.
pub fn in_dir<'a>(dir: &Path) -> SpawnOptions<'a> {
    SpawnOptions::new().cwd(dir)
}
