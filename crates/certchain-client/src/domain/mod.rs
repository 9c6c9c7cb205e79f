//! # Domain Module
//!
//! Core types for the certificate ledger client.

pub mod entities;
pub mod errors;
pub mod metadata;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use metadata::*;
pub use value_objects::*;
