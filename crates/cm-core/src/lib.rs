// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Editing session lifecycle.
//!
//! A [`Session`] pairs one [`ConfigStore`] with the remote service that
//! persists it. Loading is all-or-nothing; saving never rolls back local
//! edits.

mod session;

pub use session::{Session, SessionError, SessionResult};

pub use config_core::ConfigStore;
