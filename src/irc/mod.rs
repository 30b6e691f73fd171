//! IRC protocol layer: connection handles, command parsing, and sending.

pub mod commands;
pub mod connection;
pub mod manager;
