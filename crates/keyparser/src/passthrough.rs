//! # Passthrough key parsing
//!
//! ## Overview
//!
//! In modes like Insert and Passthrough, most keys belong to whatever widget has focus, but a
//! handful of (possibly multi-key) bindings still need to work. [PassthroughMatcher] wraps a
//! [ChainMatcher] so that bindings get the first look at each key, and when a multi-key chain
//! turns out not to be bound, the literal keys that made it up are posted back to the focused
//! window so the widget still receives them.
//!
//! Typing "jk" with only "jj" bound in Insert mode looks like this:
//!
//! - "j" is a prefix of "jj", so it's held back and PartialMatch is returned.
//! - "k" makes "jk", which matches nothing. Press and release events for "j" and then "k" are
//!   posted to the focused window, and ExactMatch is returned since the keys have been dealt with.
//! - The posted "j" arrives back here first and is ignored, so that the toolkit delivers it to the
//!   widget. The posted "k" then arrives as a single-key chain, which is never replayed.
use std::fmt;

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::commands::{CommandExecutor, CommandRunner, Execute, MessageService};
use crate::config::{ConfigSource, Mode};
use crate::key::{KeyInfo, KeySequence};
use crate::matcher::{ChainMatcher, MatchResult};
use crate::window::FocusService;

/// A key parser that hands unbound key chains back to the focused window.
pub struct PassthroughMatcher<M, R, S, F> {
    mode: Mode,
    matcher: M,
    executor: CommandExecutor<R, S>,
    focus: F,

    /// The chain typed so far, without any key mappings applied.
    orig_sequence: KeySequence,
    ignore_next_key: bool,
    do_log: bool,
}

impl<M, R, S, F> PassthroughMatcher<M, R, S, F>
where
    M: ChainMatcher,
    R: CommandRunner,
    S: MessageService,
    F: FocusService,
{
    /// Create a parser for `mode`, loading its settings from `config`.
    ///
    /// The settings are read once here, and aren't reloaded for the lifetime of the parser.
    pub fn new<C: ConfigSource + ?Sized>(
        mode: Mode,
        mut matcher: M,
        executor: CommandExecutor<R, S>,
        focus: F,
        config: &C,
    ) -> Self {
        let settings = config.read_config(mode);
        matcher.configure(mode, &settings);

        PassthroughMatcher {
            mode,
            matcher,
            executor,
            focus,
            orig_sequence: KeySequence::new(),
            ignore_next_key: false,
            do_log: false,
        }
    }

    /// Handle a key press.
    ///
    /// When `dry_run` is true, only report whether there would be a match. Nothing is executed,
    /// posted or remembered.
    pub fn handle(&mut self, event: &KeyEvent, dry_run: bool) -> MatchResult {
        let key = KeyInfo::from(event);

        if key.is_modifier_key() || self.ignore_next_key {
            if self.do_log {
                tracing::debug!(mode = %self.mode, %key, dry_run, "ignoring key");
            }

            self.ignore_next_key = self.ignore_next_key && dry_run;

            return MatchResult::NoMatch;
        }

        let orig_sequence = self.orig_sequence.append_event(event);
        let result = self.matcher.handle(event, dry_run, &mut self.executor);

        if self.do_log {
            tracing::debug!(mode = %self.mode, keys = %orig_sequence, dry_run, ?result, "handled key");
        }

        if !dry_run {
            // The matcher drops its own chain whenever it stops being a partial match, so this one
            // follows along.
            self.orig_sequence = match result {
                MatchResult::PartialMatch => orig_sequence.clone(),
                MatchResult::NoMatch | MatchResult::ExactMatch => KeySequence::new(),
            };
        }

        if dry_run || orig_sequence.len() == 1 || result != MatchResult::NoMatch {
            return result;
        }

        let Some(window) = self.focus.focus_window() else {
            return result;
        };

        if self.do_log {
            tracing::debug!(mode = %self.mode, keys = %orig_sequence, "replaying unbound keys");
        }

        self.ignore_next_key = true;

        for key in orig_sequence.iter() {
            self.focus.post_event(&window, key.to_event(KeyEventKind::Press));
            self.focus.post_event(&window, key.to_event(KeyEventKind::Release));
        }

        return MatchResult::ExactMatch;
    }

    /// Throw away the chain typed so far, both here and in the wrapped matcher.
    ///
    /// This needs to be called whenever the wrapped matcher resets its chain on its own, such as
    /// after a timeout, so that the two stay in sync.
    pub fn clear_keystring(&mut self) {
        if !self.orig_sequence.is_empty() {
            self.orig_sequence = KeySequence::new();
        }

        self.matcher.clear_keystring();
    }

    /// Enable or disable debug logging of handled keys.
    ///
    /// This is off by default, since replayed keys would otherwise be logged twice.
    pub fn set_logging(&mut self, do_log: bool) {
        self.do_log = do_log;
    }

    /// The mode this parser was created for.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The literal keys typed so far in the current chain.
    pub fn orig_sequence(&self) -> &KeySequence {
        &self.orig_sequence
    }

    /// Whether the next key will be skipped because it's the start of a replay.
    pub fn ignores_next_key(&self) -> bool {
        self.ignore_next_key
    }

    /// Get a reference to the wrapped matcher.
    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Get a reference to the command executor.
    pub fn executor(&self) -> &CommandExecutor<R, S> {
        &self.executor
    }

    /// Get a reference to the focus service.
    pub fn focus(&self) -> &F {
        &self.focus
    }
}

impl<M, R, S, F> Execute for PassthroughMatcher<M, R, S, F>
where
    R: CommandRunner,
    S: MessageService,
{
    fn execute(&mut self, cmd: &str, count: Option<usize>) {
        self.executor.execute(cmd, count)
    }
}

impl<M, R, S, F> fmt::Debug for PassthroughMatcher<M, R, S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassthroughMatcher").field("mode", &self.mode).finish()
    }
}
