//! Integration tests with mock HTTP servers

pub mod error_handling;
pub mod mock_server;
pub mod stub_server;
