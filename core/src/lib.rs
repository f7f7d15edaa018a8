pub mod achievement_subsystem;
pub mod command;
pub mod config;
pub mod customer_subsystem;
pub mod demand_subsystem;
pub mod engine;
pub mod error;
pub mod event;
pub mod event_subsystem;
pub mod quality;
pub mod resolver_subsystem;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod subsystem;
pub mod types;
pub mod weather_subsystem;
