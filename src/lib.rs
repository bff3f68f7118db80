//! # Tessera
//!
//! An offline-capable fetcher and cache for a line-oriented remote image
//! feed.
//!
//! ## Architecture
//!
//! ```text
//! FeedController → FeedRepository → Fetcher | DiskCache → FeedParser
//! ImageLoader → ImageCache (memory LRU + DiskCache) → Fetcher
//! ```
//!
//! The refresh path and the per-image path are independent: the controller
//! turns raw feed text into typed entries and publishes presentation-ready
//! snapshots, while the loader resolves individual image URLs on demand,
//! coalescing concurrent requests for the same URL into one fetch.
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cache`]: Key derivation, namespaced disk cache, tiered image cache
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration (`~/.config/tessera/config.toml`)
//! - [`domain`]: Core domain models (FeedEntry, ControllerState, snapshots)
//! - [`feed`]: Feed repository and refresh controller
//! - [`fetcher`]: HTTP transport trait and reqwest implementation
//! - [`loader`]: Remote image loader with request coalescing
//! - [`monitor`]: Connectivity signal
//! - [`parser`]: Feed text → typed entries

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// caches, fetcher, loader, repository, connectivity.
pub mod app;

/// Content-addressed disk cache, key derivation, and the tiered image cache.
pub mod cache;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
pub mod config;

/// Core domain models.
pub mod domain;

/// Feed repository and the reconnect-aware refresh controller.
pub mod feed;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async transport trait
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Remote image loading with concurrent-request coalescing.
pub mod loader;

/// Best-effort connectivity signal feeding retry-on-reconnect.
pub mod monitor;

/// Line-oriented feed text parsing.
pub mod parser;
