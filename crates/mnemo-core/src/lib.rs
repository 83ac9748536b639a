//! Mnemo Core Library
//!
//! Core domain logic for the mnemo knowledge archive.

pub mod archive;
pub mod config;
pub mod error;
pub mod logging;
pub mod rules;
pub mod search;
pub mod text;
