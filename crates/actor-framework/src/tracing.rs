//! # Observability & Tracing
//!
//! The [`setup_tracing`] function installs the process-wide `tracing` subscriber used by
//! every actor and client built on this crate.
//!
//! ## Configuration
//!
//! Levels come from `RUST_LOG`. The format is compact and hides the module prefix
//! (`with_target(false)`); store actors tag their lines with `entity_type` instead.
//!
//! ```bash
//! # Lifecycle and state changes only
//! RUST_LOG=info cargo run
//!
//! # Full request payloads, one line per request
//! RUST_LOG=debug cargo run
//!
//! # One crate at a time
//! RUST_LOG=actor_framework=debug,order_relay=info cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: `Actor started` and `Shutdown` with the final table size
//! - **Writes**: `Created`, `Updated`, `Deleted`, `Retained` at `info`
//! - **Reads**: `Get` and `Lookup` at `debug`, with `found` / `hits`
//! - **Refusals**: `Version conflict`, `Not found`, entity errors at `warn`
//!
//! With `RUST_LOG=debug` a conditional write looks like:
//!
//! ```text
//! DEBUG Update entity_type="Order" id=t1/5b0c.. expected=Some(Ready) update=OrderUpdate { .. }
//!  WARN Version conflict entity_type="Order" id=t1/5b0c.. expected=Ready actual=Dispatched
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type already says where a line came from
        .compact()
        .try_init();
}
