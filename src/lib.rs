//! Scenic window-seat recommendations from great-circle routes and solar
//! ephemerides, plus the airport lookup and HTTP layers that serve them.

pub mod config;
pub mod domain;
pub mod errors;
pub mod geo;
pub mod handlers;
pub mod path;
pub mod repo;
pub mod routes;
pub mod seat;
pub mod services;
pub mod solar;
pub mod utils;
