//! External relocation process
//!
//! The locator is invoked as `<program> <targetId> <tokens...>`, or through
//! `ssh <host>` when a remote host is configured. Locally the arguments are
//! separate argv entries and no shell is involved. ssh hands its command
//! line to the remote login shell, so every remote word is single-quoted.

#![allow(clippy::result_large_err)]

use seiscat_core::errors::{ExError, ExErrorKind};
use seiscat_core::SeisCatError;
use seiscat_store::errors::Result;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

const OP_LOCATE: &str = "run_locator";

/// How a run's stdout lands in the configured output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Start the file over; used for the first run of an execution
    Replace,
    /// Add after the output of earlier runs of the same execution
    Append,
}

/// Where and how to run the locator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocatorConfig {
    pub program: String,
    #[serde(default)]
    pub remote_host: Option<String>,
    /// File receiving a copy of the locator's stdout
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl LocatorConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            remote_host: None,
            output_path: None,
        }
    }

    fn command(&self, target_id: i64, args: &str) -> Command {
        let mut argv: Vec<String> = vec![self.program.clone(), target_id.to_string()];
        argv.extend(args.split_whitespace().map(str::to_string));

        match &self.remote_host {
            Some(host) => {
                let mut cmd = Command::new("ssh");
                cmd.arg("--")
                    .arg(host)
                    .args(argv.iter().map(|word| shell_quote(word)));
                cmd
            }
            None => {
                let mut cmd = Command::new(&argv[0]);
                cmd.args(&argv[1..]);
                cmd
            }
        }
    }

    fn write_output(&self, target_id: i64, lines: &[String], mode: OutputMode) -> Result<()> {
        let Some(path) = &self.output_path else {
            return Ok(());
        };
        let io_failure = |e: std::io::Error| {
            ExError::new(ExErrorKind::Io)
                .with_op(OP_LOCATE)
                .with_target_id(target_id)
                .with_message(format!("cannot write {}: {}", path.display(), e))
        };
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(mode == OutputMode::Append)
            .truncate(mode == OutputMode::Replace)
            .open(path)
            .map_err(io_failure)?;
        for line in lines {
            writeln!(file, "{}", line).map_err(io_failure)?;
        }
        Ok(())
    }

    fn failure(&self, target_id: i64, message: impl Into<String>) -> ExError {
        ExError::from(SeisCatError::ExternalProcess {
            program: self.program.clone(),
            message: message.into(),
        })
        .with_op(OP_LOCATE)
        .with_target_id(target_id)
    }
}

/// Run the locator for `target_id` and return its stdout lines
///
/// The lines are also written to the configured output file, replacing or
/// extending it according to `mode`.
///
/// # Errors
///
/// Returns `ExternalProcess` when the process cannot be spawned, its output
/// cannot be read, or it exits unsuccessfully; `Io` when the output copy
/// cannot be written.
pub fn run_locator(
    config: &LocatorConfig,
    target_id: i64,
    args: &str,
    mode: OutputMode,
) -> Result<Vec<String>> {
    tracing::info!(
        op = OP_LOCATE,
        target_id,
        program = config.program.as_str(),
        remote_host = config.remote_host.as_deref().unwrap_or(""),
        args,
        "starting locator"
    );

    let mut child = config
        .command(target_id, args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| config.failure(target_id, format!("cannot start: {}", e)))?;

    let mut lines = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines() {
            match line {
                Ok(line) => {
                    tracing::debug!(
                        op = OP_LOCATE,
                        target_id,
                        line = line.as_str(),
                        "locator output"
                    );
                    lines.push(line);
                }
                Err(e) => {
                    // reap the child before giving up on it
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(config.failure(target_id, format!("cannot read output: {}", e)));
                }
            }
        }
    }

    let status = child
        .wait()
        .map_err(|e| config.failure(target_id, format!("cannot wait: {}", e)))?;
    if !status.success() {
        return Err(config.failure(target_id, format!("exited with {}", status)));
    }

    config.write_output(target_id, &lines, mode)?;
    Ok(lines)
}

/// Quote one word for a POSIX shell unless it is made of inert characters
fn shell_quote(word: &str) -> String {
    let inert = |c: char| c.is_ascii_alphanumeric() || "_=.,:+-/@%".contains(c);
    if !word.is_empty() && word.chars().all(inert) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}
