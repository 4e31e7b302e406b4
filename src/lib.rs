pub mod app;
pub mod auth;
pub mod bookings;
pub mod classes;
pub mod config;
pub mod error;
pub mod extract;
pub mod state;
pub mod store;

pub use app::build_app;
pub use state::AppState;
