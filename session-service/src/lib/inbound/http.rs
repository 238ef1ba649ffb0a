pub mod classifier;
pub mod handlers;
pub mod middleware;
pub mod router;
