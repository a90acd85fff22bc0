pub mod config;
pub mod hosts;
pub mod mirror;
pub mod recency;
pub mod release;
pub mod replication;
pub mod result;
