//! # chow-db: Database Layer for Chow Orders
//!
//! This crate provides database access for the order platform.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Chow Orders Data Flow                            │
//! │                                                                         │
//! │  Service call (add_item, update_status, ...)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     chow-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (order.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ OrderRepo     │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ OrderItemRepo │    │ ...          │  │   │
//! │  │   │ Management    │    │ ModifierRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (chow.db)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (order, item, modifier)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chow_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/chow.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let order = db.orders().get_by_id(&order_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::modifier::ModifierRepository;
pub use repository::order::OrderRepository;
pub use repository::order_item::OrderItemRepository;
