//! # System Lifecycle & Orchestration
//!
//! Builds the shared services once and hands out the resource clients.
//!
//! ## Wiring order
//!
//! 1. **Cookie store** - supplied by the caller (file-backed in the demo)
//! 2. **Session guard, notification centre, language service** - no dependencies
//! 3. **API client** - reads the token from the session guard and the locale
//!    from the language service on every request
//! 4. **Auth service** - on top of the API client
//! 5. **Session refresher** - spawned, then the persisted session is resumed
//!
//! Step 5 comes last so an already nearly expired token is refreshed
//! instead of its warning being published to nobody.
//!
//! ## Shutdown
//!
//! The refresher loop only ends when the session guard is dropped, and the
//! system itself holds the guard, so [`AdminSystem::shutdown`] aborts the
//! task and treats cancellation as a clean stop.

pub mod admin_system;

pub use admin_system::*;
