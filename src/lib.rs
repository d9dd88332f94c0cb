pub mod command;
pub mod communication;
pub mod config;
