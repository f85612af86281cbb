//! # Chain matching interfaces
//!
//! A [ChainMatcher] tracks the keys typed so far in the current chain, and classifies each new
//! key as completing a binding, extending one, or matching nothing. When a chain completes, the
//! matcher runs its command through the [Execute] it was handed.
use crossterm::event::KeyEvent;

use crate::commands::Execute;
use crate::config::{Mode, ModeSettings};

/// The outcome of feeding one key into a chain matcher.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MatchResult {
    /// The chain doesn't match, and can't become a match with more keys.
    NoMatch,

    /// The chain is a prefix of at least one binding.
    PartialMatch,

    /// The chain is exactly a binding.
    ExactMatch,
}

/// A key chain matcher.
pub trait ChainMatcher {
    /// Load the bindings for `mode`.
    fn configure(&mut self, mode: Mode, settings: &ModeSettings);

    /// Feed `event` into the current chain.
    ///
    /// When `dry_run` is true, the matcher must only report what would happen, without updating
    /// its chain or running anything.
    fn handle(&mut self, event: &KeyEvent, dry_run: bool, exec: &mut dyn Execute)
        -> MatchResult;

    /// Throw away the keys typed so far in the current chain.
    fn clear_keystring(&mut self);
}
