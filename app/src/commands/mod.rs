//! Commands invoked by the front-end.

pub mod fields;
pub mod session;
