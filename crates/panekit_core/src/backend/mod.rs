//! Data-access collaborator contracts.

pub mod api;
pub mod path;
