//! City Weather Library
//!
//! This module exposes the lookup pipeline, state and rendering modules for use
//! in integration tests.

pub mod app;
pub mod cli;
pub mod data;
pub mod logging;
pub mod pipeline;
pub mod selector;
pub mod ui;
