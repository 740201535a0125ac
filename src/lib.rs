//! openv - Sync environment variables from 1Password to GitHub.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── push          # Export to a file or sync through a profile
//! │   ├── run           # Run with an injected environment
//! │   ├── import        # Store a .env file in 1Password
//! │   ├── profile       # Sync profile management
//! │   ├── resolve       # Config, token and source resolution
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── cipher/       # Sealed-box encryption for secret values
//!     ├── manifest      # Tracked key names, JSON encoded
//!     ├── remote/       # ScopeClient trait, GitHub and in-memory clients
//!     ├── reconcile     # Cleanup-then-write reconciliation pass
//!     ├── dispatch      # Sync target to scope and storage kind
//!     ├── domain/       # DesiredSet, Scope, SyncReport
//!     ├── source/       # 1Password and .env sources
//!     ├── profile       # Sync profiles
//!     ├── config        # ~/.openv.toml
//!     └── env           # .env parsing and writing
//! ```
//!
//! # Reconciliation
//!
//! Secrets cannot be read back or listed by name, so every scope carries a
//! plaintext manifest variable recording the secret names written by the
//! last pass. A pass reads that manifest, deletes names no longer desired,
//! writes every desired entry, then rewrites the manifest.

pub mod cli;
pub mod core;
pub mod error;
