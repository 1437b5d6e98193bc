//! wg-portal - Session-authenticated web portal for WireGuard tunnels
//!
//! This crate serves a small control surface on a gateway host for toggling
//! mutually-exclusive WireGuard tunnel configurations and reporting their
//! live status. Tunnel state is never cached: the external `wg`/`wg-quick`
//! tools and the config directory are the sole source of truth, and every
//! request re-derives its view from them. The only cross-request state is
//! the in-memory session store.
//!
//! # Architecture
//!
//! - `config`: Configuration file handling (TOML)
//! - `auth`: Password digest generation and verification
//! - `session`: Expiring in-memory session token store
//! - `wireguard`: Tunnel inventory, status probing and the toggle protocol
//! - `server`: HTTP boundary (axum routing, cookies, JSON envelope)

pub mod auth;
pub mod config;
pub mod server;
pub mod session;
pub mod wireguard;

pub use config::Config;
pub use session::SessionStore;
pub use wireguard::WireGuardManager;
