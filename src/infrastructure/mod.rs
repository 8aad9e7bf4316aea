pub mod coingecko;
pub mod core;
pub mod persistence;
