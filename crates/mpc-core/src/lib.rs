pub mod aggregate;
pub mod config;
pub mod depth_pair;
pub mod error;
pub mod fit;
pub mod pipeline;
pub mod sample;
pub mod table;
pub mod types;
