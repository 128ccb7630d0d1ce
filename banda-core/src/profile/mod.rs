// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Player profiles and ranking
//!
//! The remote profile store is an external service; this module only
//! defines the interface the app consumes (`ProfileStore`), an in-process
//! implementation, and the local session that remembers which profile
//! belongs to this device.

mod session;
mod store;

pub use session::{keys, points_for_answer, ProfileSession};
pub use store::{MemoryProfileStore, ProfileError, ProfileStore, ProfileUpdate, UserProfile};
