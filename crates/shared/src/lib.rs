//! Transaction field model and prediction wire types shared by the client crates.

pub mod domain;
pub mod error;
pub mod protocol;
