//! CLI Commands

pub mod content;
