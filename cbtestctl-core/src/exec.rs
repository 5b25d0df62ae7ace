//! External command execution: the streaming runner and the capturer.
//!
//! Every cbtestctl interaction with the outside world (`cbdyncluster`, `git`,
//! `mvn`) goes through these two functions. Both return a real `Result`: a
//! spawn failure, a nonzero exit, or a missing capture line is an error value
//! carrying the rendered command line, never a sentinel the caller has to
//! remember to inspect.

use std::fmt;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{DriverError, Result};

/// A fully specified external invocation: program, arguments, and an explicit
/// working directory. The process-wide current directory is never mutated;
/// callers that need a different directory set it here.
#[derive(Debug, Clone)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
    dir: Option<PathBuf>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the child with this directory as its working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn build(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        match shlex::try_join(parts) {
            Ok(joined) => f.write_str(&joined),
            // A NUL byte in an argument cannot be shell-quoted; fall back to
            // a plain join for display purposes.
            Err(_) => write!(f, "{} {}", self.program, self.args.join(" ")),
        }
    }
}

/// Execute a command, streaming its output to the console line-by-line as it
/// becomes available, and return once the child exits.
///
/// stdout is piped and echoed; stderr is inherited so diagnostics from the
/// child reach the console directly. Blocks until the child terminates.
pub fn run_streaming(cmd: &CommandLine) -> Result<()> {
    println!("+ {cmd}");
    let mut child = cmd
        .build()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| DriverError::spawn(cmd.to_string(), source))?;

    if let Some(stdout) = child.stdout.take() {
        let reader = BufReader::new(stdout);
        for line in reader.lines() {
            println!("{}", line?);
        }
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(DriverError::command_failed(cmd.to_string(), status));
    }
    Ok(())
}

/// Execute a command expected to print a single meaningful line and return
/// that first stdout line, right-trimmed. The remainder of the output is
/// drained and discarded so the child never blocks on a full pipe.
///
/// A nonzero exit takes precedence over an empty capture; a command that
/// succeeds but prints nothing is an [`DriverError::EmptyCapture`].
pub fn capture_first_line(cmd: &CommandLine) -> Result<String> {
    println!("+ {cmd}");
    let mut child = cmd
        .build()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| DriverError::spawn(cmd.to_string(), source))?;

    let mut first = String::new();
    if let Some(stdout) = child.stdout.take() {
        let mut reader = BufReader::new(stdout);
        reader.read_line(&mut first)?;
        io::copy(&mut reader, &mut io::sink())?;
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(DriverError::command_failed(cmd.to_string(), status));
    }

    let first = first.trim_end().to_string();
    if first.is_empty() {
        return Err(DriverError::empty_capture(cmd.to_string()));
    }
    Ok(first)
}
