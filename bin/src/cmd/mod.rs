//! CLI subcommand modules.
//!
//! This module contains the implementations for all foresight CLI subcommands.

pub(crate) mod features;
pub(crate) mod forecast;
pub(crate) mod snapshot;
