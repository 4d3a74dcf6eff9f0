//! Command-line support for the `pdu-outlet` tool.

pub mod args;
