//! # chow-orders: Order Lifecycle Service
//!
//! The orchestration layer of the order platform: validates input,
//! coordinates [`chow_core`] (pure logic) and [`chow_db`] (storage), and
//! shapes responses for API consumers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Chow Orders Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ chow-orders (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐     ┌───────────┐     ┌───────────┐            │   │
//! │  │   │  service  │     │    dto    │     │   error   │            │   │
//! │  │   │  Order    │     │ camelCase │     │ ApiError  │            │   │
//! │  │   │  Service  │     │ requests/ │     │ ErrorCode │            │   │
//! │  │   │           │     │ responses │     │           │            │   │
//! │  │   └───────────┘     └───────────┘     └───────────┘            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │         ┌──────────────────────┴──────────────────────┐                │
//! │         ▼                                             ▼                │
//! │  ┌─────────────┐                              ┌─────────────┐          │
//! │  │  chow-core  │  pricing, status rules       │   chow-db   │          │
//! │  │  (no I/O)   │  validation                  │  (SQLite)   │          │
//! │  └─────────────┘                              └─────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chow_db::{Database, DbConfig};
//! use chow_orders::{CreateOrderRequest, OrderService};
//!
//! let db = Database::new(DbConfig::from_env()).await?;
//! let service = OrderService::new(db);
//!
//! let order = service
//!     .create_order(CreateOrderRequest {
//!         customer_id,
//!         restaurant_id,
//!         delivery_address_id: None,
//!         payment_method_id: None,
//!         delivery_street: None,
//!         delivery_city: None,
//!         delivery_state: None,
//!         delivery_postal_code: None,
//!         delivery_country: None,
//!     })
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dto;
pub mod error;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use dto::{
    AddItemRequest, AddModifierRequest, CalculatedSubtotalResponse, CreateOrderRequest,
    ModifierResponse, OrderDetailResponse, OrderItemDetailResponse, OrderItemResponse,
    OrderResponse, UpdateItemRequest, UpdateTotalsRequest,
};
pub use error::{ApiError, ErrorCode};
pub use service::{ApiResult, OrderService};
