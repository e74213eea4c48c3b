//! Kritik library exports for the binary and integration tests

pub mod core;
pub mod diagram;
pub mod preview;
pub mod tui;

#[cfg(test)]
pub mod test_support;
