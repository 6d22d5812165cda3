//! Command implementations.

pub mod card;
pub mod theme;
