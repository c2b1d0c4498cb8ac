pub mod alpaca;
pub mod binance;
pub mod core;
pub mod factory;
pub mod mock;
pub mod settings_persistence;

pub use factory::{ServiceFactory, Services};
