//! Connect Four (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as
//! `connect_four::{types, core, protocol, input, term}`.

pub use connect_four_core as core;
pub use connect_four_input as input;
pub use connect_four_protocol as protocol;
pub use connect_four_term as term;
pub use connect_four_types as types;
