//! Client-side state.
//!
//! DESIGN
//! ======
//! `session` owns authentication state; `storage` is the durable key-value
//! medium it persists into. Nothing here is global: callers build one
//! `SessionState` at startup and hand out `Arc` clones.

pub mod session;
pub mod storage;
