//! Bizcard Core - Shared types and display rules.
//!
//! This crate provides the types shared across all bizcard crates:
//! - `viewer` - Store clients, fetcher, rendering and export
//! - `cli` - The `bizcard` command-line tool
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no file access. Everything here is total: derivation functions
//! fall back to display defaults instead of failing.
//!
//! # Modules
//!
//! - [`types`] - The profile record, record identifiers, fetch lifecycle and theme
//! - [`display`] - Fallback substitution, URL validation and date formatting
//! - [`vcard`] - Contact export as vCard text

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod display;
pub mod types;
pub mod vcard;

pub use types::*;
