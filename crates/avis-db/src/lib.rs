//! # avis-db
//!
//! PostgreSQL persistence layer for Avis Explorer.
//!
//! This crate provides:
//! - Connection pool management and schema bootstrap
//! - The species catalog repository (read + append)
//! - The per-user identification history repository (append-only)
//!
//! ## Example
//!
//! ```rust,ignore
//! use avis_db::Database;
//! use avis_core::CatalogRepository;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/avis").await?;
//!     let catalog = db.catalog.list().await?;
//!     println!("{} known species", catalog.len());
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod history;
pub mod pool;

pub use catalog::PgCatalogRepository;
pub use history::PgHistoryRepository;
pub use pool::Database;
