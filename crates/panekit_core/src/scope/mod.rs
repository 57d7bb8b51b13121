//! Authorization scope contracts.

pub mod authority;
