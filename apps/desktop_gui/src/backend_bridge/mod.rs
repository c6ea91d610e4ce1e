//! Worker thread that performs prediction requests on behalf of the UI.

pub mod commands;
pub mod runtime;
