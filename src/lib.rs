//! Donor registry - a small blood donor registry service
//!
//! Public donor registration and search, plus an admin area for donation
//! records, served over a JSON API backed by SQLite.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
