// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for remote quiz content
//!
//! Covers the offline-first cache, the update coordinator and the
//! question service that screens read from.

mod support;

mod cache_tests;
mod store_tests;
mod types_tests;
