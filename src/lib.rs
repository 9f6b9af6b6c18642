//! # servicehub-client
//!
//! Client for the service-marketplace REST API (admin, customer and
//! professional dashboards).
//!
//! This crate contains the persisted session, the authenticated request
//! client with its retrying fetchers, and the role-based navigation guard
//! that decides where each in-app navigation lands.

pub mod config;
pub mod net;
pub mod router;
pub mod state;
pub mod util;
