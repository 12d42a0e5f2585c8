// SPDX-License-Identifier: MIT
//
// sacha-core — Shared types and error definitions for the Sacha Advisor
// export engine.

pub mod config;
pub mod error;
pub mod types;

pub use config::ExportConfig;
pub use error::SachaError;
pub use types::*;
