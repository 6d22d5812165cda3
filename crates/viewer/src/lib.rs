//! Bizcard viewer library.
//!
//! Loads profile records from Firestore behind an anonymous session, turns
//! them into card views, exports contacts and keeps the viewer's theme
//! preference. The `bizcard` binary is a thin shell over this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assets;
pub mod config;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod firebase;
pub mod preferences;
pub mod routes;
pub mod view;
