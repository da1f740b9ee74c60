//! Low-level input handling shared by the markup parsers.
//!
//! The tree-building parser lives in [`crate::html`]; this module only holds
//! the cursor it reads through.

pub(crate) mod input;
