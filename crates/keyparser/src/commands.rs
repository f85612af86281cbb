//! # Command execution
//!
//! ## Overview
//!
//! This module connects completed key chains to an external command runner. Failures reported by
//! the runner are shown to the user through a [MessageService] and never travel back up into the
//! key handling code.
//!
use std::fmt;

/// Errors that can be encountered while running a bound command.
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum CommandError {
    /// Error for unknown commands.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Error for bad command arguments.
    #[error("Invalid argument")]
    InvalidArgument,

    /// Error for command parse failures.
    #[error("Failed to parse command: {0}")]
    ParseFailed(String),

    /// Generic error.
    #[error("Error: {0}")]
    Error(String),
}

/// Identifies the browser window that a key parser and its commands belong to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct WindowId(pub usize);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A service capable of running command strings inside a window.
pub trait CommandRunner {
    /// Run `cmd` in the window `win_id`, optionally repeated `count` times.
    fn run(&mut self, win_id: WindowId, cmd: &str, count: Option<usize>)
        -> Result<(), CommandError>;
}

/// A service for showing messages to the user.
pub trait MessageService {
    /// Show an error message. The `diagnostic` text is extra context meant for logs and bug
    /// reports rather than for the message itself.
    fn error(&self, text: &str, diagnostic: &str);
}

/// Something that can run the command a key chain is bound to.
pub trait Execute {
    /// Run `cmd`, optionally repeated `count` times.
    fn execute(&mut self, cmd: &str, count: Option<usize>);
}

/// Runs bound commands for a single window, reporting failures as messages.
pub struct CommandExecutor<R, M> {
    win_id: WindowId,
    runner: R,
    messages: M,
}

impl<R, M> CommandExecutor<R, M>
where
    R: CommandRunner,
    M: MessageService,
{
    /// Create an executor for the window `win_id`.
    pub fn new(win_id: WindowId, runner: R, messages: M) -> Self {
        CommandExecutor { win_id, runner, messages }
    }

    /// The window this executor runs commands in.
    pub fn win_id(&self) -> WindowId {
        self.win_id
    }

    /// Get a reference to the underlying command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Get a reference to the message service used for reporting failures.
    pub fn messages(&self) -> &M {
        &self.messages
    }
}

impl<R, M> Execute for CommandExecutor<R, M>
where
    R: CommandRunner,
    M: MessageService,
{
    fn execute(&mut self, cmd: &str, count: Option<usize>) {
        if let Err(e) = self.runner.run(self.win_id, cmd, count) {
            let text = e.to_string();
            let diagnostic = format!(
                "window {}: command {:?} (count {:?}) failed: {:?}",
                self.win_id, cmd, count, e
            );

            tracing::error!(win_id = self.win_id.0, cmd, ?count, error = %e, "command failed");

            self.messages.error(&text, &diagnostic);
        }
    }
}

impl<R, M> fmt::Debug for CommandExecutor<R, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandExecutor").field("win_id", &self.win_id).finish()
    }
}
