#![allow(dead_code)]

pub mod mock_management_server;

pub use mock_management_server::*;
