//! Build subprocess launch and output relay

use std::future::Future;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::bootstrap::error::BootstrapError;
use crate::config::Goal;

/// Lifecycle step run before the goal
pub const CLEAN_STEP: &str = "clean";

/// Resolves once the run should stop. Cloneable so several stages can
/// observe the same signal.
pub type Interrupt = Shared<BoxFuture<'static, ()>>;

/// [`Interrupt`] fired by Ctrl-C.
///
/// If the signal handler cannot be installed the future never resolves.
pub fn ctrl_c_interrupt() -> Interrupt {
    async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
    .boxed()
    .shared()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Result of a finished build subprocess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOutcome {
    pub status: ExitStatus,
    /// Number of output lines relayed from both streams
    pub lines: usize,
}

/// `<script> clean <goal>` run from `work_dir` with both output streams piped
pub fn build_command(script: &Path, goal: Goal, work_dir: &Path) -> Command {
    let mut command = Command::new(script);
    command
        .args([CLEAN_STEP, goal.as_str()])
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    command
}

/// Decodes one raw line, dropping the `\n` or `\r\n` terminator.
/// Bytes that are not UTF-8 become U+FFFD.
fn decode_line(buf: &[u8]) -> String {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// Reads both streams line by line until each reaches end of stream,
/// handing every line to `emit` as soon as it arrives.
///
/// Both pipes are drained concurrently so a child blocked on a full stderr
/// pipe cannot stall the stdout reader.
pub async fn relay_lines<O, E, F>(mut stdout: O, mut stderr: E, mut emit: F) -> io::Result<usize>
where
    O: AsyncBufRead + Unpin,
    E: AsyncBufRead + Unpin,
    F: FnMut(OutputStream, &str),
{
    // read_until keeps partial input in the buffer when a select! branch loses,
    // so a buffer is only cleared once its line has been emitted.
    let mut out_buf = Vec::new();
    let mut err_buf = Vec::new();
    let mut out_open = true;
    let mut err_open = true;
    let mut count = 0;

    while out_open || err_open {
        let (stream, buf, read) = tokio::select! {
            read = stdout.read_until(b'\n', &mut out_buf), if out_open => {
                (OutputStream::Stdout, &mut out_buf, read?)
            }
            read = stderr.read_until(b'\n', &mut err_buf), if err_open => {
                (OutputStream::Stderr, &mut err_buf, read?)
            }
        };

        if read == 0 {
            match stream {
                OutputStream::Stdout => out_open = false,
                OutputStream::Stderr => err_open = false,
            }
        }
        if !buf.is_empty() {
            emit(stream, &decode_line(buf));
            buf.clear();
            count += 1;
        }
    }

    Ok(count)
}

fn echo_line(stream: OutputStream, line: &str) {
    match stream {
        OutputStream::Stdout => println!("{}", line),
        OutputStream::Stderr => eprintln!("{}", line),
    }
}

/// Spawns the build and echoes its output until it exits.
///
/// When `interrupt` resolves first the child is killed and the run ends with
/// [`BootstrapError::Interrupted`]. The exit status is reported, not judged.
pub async fn launch(
    script: &Path,
    goal: Goal,
    work_dir: &Path,
    interrupt: impl Future<Output = ()>,
) -> Result<BuildOutcome, BootstrapError> {
    let launch_error = |source: io::Error| BootstrapError::Launch {
        script: script.to_path_buf(),
        source,
    };

    debug!(
        "Spawning {:?} {} {} in {:?}",
        script,
        CLEAN_STEP,
        goal.as_str(),
        work_dir
    );
    let mut child = build_command(script, goal, work_dir)
        .spawn()
        .map_err(launch_error)?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Err(launch_error(io::Error::other("child output is not captured")));
    };

    let relay = relay_lines(BufReader::new(stdout), BufReader::new(stderr), echo_line);

    let lines = tokio::select! {
        biased;
        () = interrupt => {
            warn!("Interrupted, stopping build process");
            if let Err(e) = child.start_kill() {
                warn!("Failed to kill build process: {}", e);
            }
            match child.wait().await {
                Ok(status) => debug!("Build process stopped with {}", status),
                Err(e) => warn!("Failed to reap build process: {}", e),
            }
            return Err(BootstrapError::Interrupted);
        }
        relayed = relay => relayed.map_err(BootstrapError::Output)?,
    };

    let status = child.wait().await.map_err(BootstrapError::Output)?;
    info!("Build process exited with {} after {} lines", status, lines);

    Ok(BuildOutcome { status, lines })
}
