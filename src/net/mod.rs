//! Network layer: authenticated HTTP client, retrying fetchers, wire types.
//!
//! DESIGN
//! ======
//! `client` is the only place that talks HTTP. `fetch` layers the backoff
//! policy on top through the `ApiGet` seam so it can be exercised without a
//! server.

pub mod client;
pub mod fetch;
pub mod types;
