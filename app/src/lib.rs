//! TicketLens
//!
//! Pulls support tickets from an issue tracker's search API, classifies each
//! one against its SLA target and aggregates the results into monthly tables.

mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
