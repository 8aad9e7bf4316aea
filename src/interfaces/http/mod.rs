pub mod handler;
pub mod router;
pub mod views;

pub use handler::{RequestHandler, RequestState};
pub use router::build_router;
