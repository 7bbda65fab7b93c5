//! Shift Rota Generator
//!
//! This library provides the domain model, the greedy rota assigner and the
//! REST API for generating employee shift rotas over a horizon of days.
//!
//! Every run is seeded, so identical requests produce identical rotas.

pub mod api;
pub mod assigner;
pub mod config;
pub mod demo_data;
pub mod domain;
pub mod dto;
pub mod error;
pub mod weekly_off;

pub use assigner::RotaAssigner;
pub use error::{Result, RotaError};
