pub mod config;
pub mod constants;
pub mod detector;
pub mod extractors;
pub mod imaging;
pub mod logging;
pub mod measurement;
pub mod metadata;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;
