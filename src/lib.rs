//! M-SNAP voucher intake: a four-screen form (recipient plus up to three pets) that
//! exports a spreadsheet record, per-pet documents from `.docx` templates, and a row
//! per pet in the shared voucher tracker.

pub mod core;
pub mod export;
pub mod gui;
pub mod persistence;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_TRACING: Once = Once::new();

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default `msnap=info`.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("msnap=info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        tracing::info!("Tracing initialized");
    });
}
