//! # Repository Module
//!
//! Database repository implementations for Eshopee.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Persistence writer / startup                                          │
//! │       │                                                                 │
//! │       │  db.storage().save_json("eshopee-cart", &snapshot)             │
//! │       ▼                                                                 │
//! │  LocalStorageRepository                                                │
//! │  ├── get / set / remove           raw JSON text                        │
//! │  ├── load_json / save_json        typed records                        │
//! │  └── namespaces                   diagnostics                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  local_storage table                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`storage::LocalStorageRepository`] - Namespaced key/value records

pub mod storage;
