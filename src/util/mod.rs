//! Small presentation helpers.

pub mod date;
