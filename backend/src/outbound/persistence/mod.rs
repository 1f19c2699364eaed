//! PostgreSQL persistence adapters using Diesel with `diesel-async`.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module; every database failure is mapped to the port's
//! error enum through `diesel_basic_error_mapping`.
//!
//! # Example
//!
//! ```ignore
//! use recipe_backend::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/recipes")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_collection_repository;
mod diesel_recipe_repository;
mod diesel_reference_data_repository;
mod diesel_shopping_list_repository;
mod diesel_short_link_repository;
mod diesel_subscription_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_collection_repository::DieselCollectionRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_reference_data_repository::DieselReferenceDataRepository;
pub use diesel_shopping_list_repository::DieselShoppingListRepository;
pub use diesel_short_link_repository::DieselShortLinkRepository;
pub use diesel_subscription_repository::DieselSubscriptionRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
