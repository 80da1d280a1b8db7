pub mod config;
pub mod ltm;
pub mod network;
pub mod record;
