//! Tickertone CLI library.
//!
//! Command implementations behind the `tickertone` binary: feature
//! preparation from raw prices, rendering, and parameter templates.

pub mod commands;
