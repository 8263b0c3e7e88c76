//! courtplan - Lay out sports courts and venues inside a site boundary

pub mod cad;
pub mod config;
pub mod domain;
pub mod export;
pub mod geometry;
pub mod layout;
