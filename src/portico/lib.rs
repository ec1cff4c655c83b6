//! # Portico Architecture
//!
//! Portico is the **data layer of an architecture portfolio site**: a project
//! repository with caching, featured-set curation, an offline mirror and the
//! site-wide settings. It is a library first; the `portico` binary is one
//! client among possible others (a web front end, an admin tool).
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - Sets up logging, loads configuration                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (id selectors → project ids)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Operations returning `Result<CmdResult>` with messages   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Repository (repository/)                                   │
//! │  - Cache, featured floor, pagination, related ranking       │
//! │  - Offline fallback, change notification                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - RemoteStore: RestRemote (PostgREST), InMemoryRemote      │
//! │  - LocalMirror over MirrorBackend: FsBackend, MemBackend    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments and returns
//! regular Rust types. It never prints and never exits. Diagnostics go
//! through `tracing`; the binary decides where they end up.
//!
//! ## Testing Strategy
//!
//! 1. **Repository and commands**: unit tests against `InMemoryRemote` and
//!    `MemBackend`, which is where most of the testing lives.
//! 2. **Stores**: `RestRemote` query building and error mapping, `FsBackend`
//!    against a temp directory.
//! 3. **API**: dispatch and selector parsing.
//! 4. **CLI**: end-to-end runs of the binary for commands that work offline.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade, entry point for all operations
//! - [`commands`]: business operations and their result types
//! - [`repository`]: `ProjectRepository` and featured-set rules
//! - [`query`]: query description and the shared evaluator
//! - [`cache`]: TTL query cache
//! - [`store`]: remote store clients and the local mirror
//! - [`model`]: `Project`, drafts, patches, site settings
//! - [`categories`]: the subcategory vocabulary
//! - [`config`]: layered configuration
//! - [`error`]: error types

pub mod api;
pub mod cache;
pub mod categories;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod repository;
pub mod store;
