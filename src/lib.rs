pub mod chart;
pub mod config;
pub mod console_log;
pub mod filter;
pub mod mock_feed;
pub mod model;
pub mod repository;
pub mod seed;
pub mod state;
pub mod synth;
