pub mod config;
pub mod error;
pub mod mapping;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod reconcile;
pub mod source;
pub mod sync;
