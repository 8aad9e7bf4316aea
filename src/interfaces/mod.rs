pub mod chart;
pub mod http;
