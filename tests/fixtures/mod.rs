//! Test fixtures for dispatch-planner.
//!
//! Provides:
//! - Real Małopolska locations (construction sites, workshops, technician homes)
//! - Canned OSRM and Nominatim payloads for `httpmock` servers

#![allow(dead_code)]

pub mod malopolska_locations;
pub mod payloads;

pub use malopolska_locations::*;
pub use payloads::*;
