//! txpar - achievable parallelism from transaction execution traces
//!
//! This library loads per-process transaction traces (newline-delimited JSON
//! "instances" records with declared read/write key sets) and computes, for
//! every attempt slot, how many of the active processes could have run
//! independently: the number of connected components of the slot's
//! read/write conflict graph.

pub mod cli;
pub mod config;
pub mod conflict;
pub mod csv_output;
pub mod distribution;
pub mod error;
pub mod json_output;
pub mod loader;
pub mod partition;
pub mod series;
pub mod timeline;
pub mod trace;
