//! # keyparser
//!
//! ## Overview
//!
//! This crate decides what to do with key presses in a modal application: whether the keys typed
//! so far complete a bound command, might still complete one, or match nothing at all.
//!
//! The chain matching itself is left to a [ChainMatcher](matcher::ChainMatcher) implementation.
//! What this crate adds on top of it is:
//!
//! - [CommandExecutor](commands::CommandExecutor), which runs the commands that completed chains
//!   are bound to, and reports their failures to the user instead of to the caller.
//! - [PassthroughMatcher](passthrough::PassthroughMatcher), for modes where unbound keys belong
//!   to the focused widget. Multi-key chains that turn out to be unbound get replayed to the
//!   focused window as the literal keys the user typed.
//! - [KeyConfig](config::KeyConfig), for reading per-mode bindings from TOML.
//!
//! Key events are [crossterm] events. Windows are whatever the
//! [FocusService](window::FocusService) implementation uses to identify them.

// Require docs for public APIs, and disable the more annoying clippy lints.
#![deny(missing_docs)]
#![allow(clippy::bool_to_int_with_if)]
#![allow(clippy::needless_return)]
#![allow(clippy::type_complexity)]

#[macro_use]
mod util;

pub mod commands;
pub mod config;
pub mod key;
pub mod matcher;
pub mod passthrough;
pub mod window;

pub use crossterm;
