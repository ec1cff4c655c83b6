//! # Storage
//!
//! Two independent stores sit behind the repository:
//!
//! - **Remote** ([`remote::RemoteStore`]): the authoritative `projects` table.
//!   [`rest::RestRemote`] talks to the hosted PostgREST endpoint;
//!   [`memory::InMemoryRemote`] implements the same contract in process.
//! - **Local mirror** ([`mirror::LocalMirror`]): a durable key-value copy of the
//!   collection plus the client-only site settings, layered over a
//!   [`backend::MirrorBackend`] ([`fs_backend::FsBackend`] on disk,
//!   [`mem_backend::MemBackend`] for tests).
//!
//! The remote store is always the source of truth. The mirror is written
//! after successful remote reads and writes and consulted only when the
//! remote is unreachable.

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod mirror;
pub mod remote;
pub mod rest;
