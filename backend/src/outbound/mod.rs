//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **rendering**: shopping list document renderers
//!
//! Adapters translate between domain types and infrastructure
//! representations and contain no business logic.

pub mod persistence;
pub mod rendering;
