pub mod classes;
pub mod config;
pub mod distribution;
pub mod records;
pub mod tables;
