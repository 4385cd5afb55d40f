//! GRC Access Control Server
//!
//! Resolves each signed-in user's role into per-feature capabilities and
//! gates the GRC platform's screens, actions and admin surface on them.

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod permissions;
