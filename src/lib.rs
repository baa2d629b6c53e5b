pub mod commands;
pub mod engine;
pub mod error;
pub mod facade;
pub mod model;
pub mod output;
pub mod store;
