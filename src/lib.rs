//! Dual-screen window placement for Windows
//!
//! Moves top-level windows between the primary and secondary monitor with
//! alignment and DPI-aware sizing, switches the display topology and reports
//! when a secondary screen comes or goes.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod platform;
