pub mod config;
pub mod deferred_water;
