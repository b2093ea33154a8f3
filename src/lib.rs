pub mod config;
pub mod errors;
pub mod lens;
pub mod report;
pub mod resolution;
pub mod roster;
pub mod rpc;
pub mod types;
