#![allow(dead_code)]

pub mod app;
pub mod config;
pub mod mock_receiver;
pub mod server;
