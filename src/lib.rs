//! template-sync - Download and upload Sendinblue template html content

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod filename;
pub mod telemetry;
