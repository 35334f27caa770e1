/// Bearer token authentication
pub mod auth;
/// Mapping of scheduling errors to HTTP responses
pub mod error_handling;
