//! # Trainerbook Core
//!
//! Scheduling rules for trainer appointments: the business-hours policy, the
//! free-slot walk, booking validation and the engine that ties them to a
//! repository.

pub mod engine;
pub mod errors;
pub mod models;
pub mod policy;
pub mod repository;
pub mod slots;
pub mod validation;
