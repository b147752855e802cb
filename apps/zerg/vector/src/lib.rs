//! Vector Gateway Service
//!
//! HTTP front end for the collection gateway.
//!
//! ## Architecture
//!
//! ```text
//! Client (loader, RAG pipelines)
//!   ↓ (JSON over HTTP)
//! domain_vector::handlers (axum router)
//!   ↓
//! CollectionGateway
//!   ↓
//! ┌───────────────────────┬───────────────────┐
//! │ InMemoryIndex / Chroma│ Hash / OpenAI     │
//! └───────────────────────┴───────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: Environment-driven backend selection
//! - `server`: Server initialization and lifecycle

pub mod config;
pub mod server;

pub use config::{Config, IndexBackend};
pub use server::run;
