//! Client-side routing.
//!
//! DESIGN
//! ======
//! Access rules are declared per route in `routes`; `guard` is the single
//! decision table interpreting them; `navigator` applies the guard before
//! each transition and records where the user actually landed.

pub mod guard;
pub mod navigator;
pub mod routes;
