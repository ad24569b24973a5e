pub mod agent;
pub mod cli;
pub mod engine;
pub mod error;
pub mod example;
pub mod facilities;
pub mod list_kinds;
pub mod market;
pub mod material;
pub mod message;
pub mod model;
pub mod run;
pub mod schema;
pub mod transaction;
pub mod validate;
pub mod visualize;
