//! Feature registration, resource contracts, and resolution.
//!
//! This module defines the composition core: how a feature declares what it
//! provides and consumes, how declarations are registered and sealed, and how
//! consumer queries are answered after the registry freezes.

pub mod contract;
pub mod descriptor;
pub mod key;
pub mod registry;
pub mod resolver;
pub mod resource;
