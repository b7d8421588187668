//! Host-facing command contract and JSON bridge for presentation shells.

pub mod contract;
pub mod session;
pub mod stdio;
