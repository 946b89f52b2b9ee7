//! Triage & allocation desk core.
//!
//! Classifies a case from its symptoms, places an appointment, reserves a
//! bed from a shared pool, and plans the weekly staffing roster. The
//! SQLite record store and the admission workflow sit around the engine.

pub mod admission;
pub mod bed_pool;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod intake;
pub mod name_generator;
pub mod rng;
pub mod roster;
pub mod slot_allocator;
pub mod store;
pub mod symptoms;
pub mod types;
