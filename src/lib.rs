//! Dashboards of projected solar panel waste in Australia.
//!
//! The crate loads two CSV tables, builds plotly.js figures from them and either serves them
//! over HTTP or writes a standalone HTML file. See `commands` for the entry points used by the
//! binary.

pub mod app;
pub mod args;
pub mod chart;
pub mod commands;
mod config;
pub mod data;
mod error;
pub mod export;
pub mod html;
pub mod model;
pub mod reactive;
pub mod server;
mod utils;


pub use config::Config;
pub use error::{Error, ErrorType, Result};
