pub mod errors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;
pub mod validation;

pub use startup::{app, run};
pub use state::AppState;
