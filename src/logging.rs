//! Logging setup.
//!
//! Installs a `tracing-subscriber` fmt subscriber filtered by `RUST_LOG`,
//! defaulting to `labgraph=info`. Safe to call more than once; only the
//! first call installs anything.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "labgraph=info";

static INIT: OnceCell<()> = OnceCell::new();

pub fn init() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        // another subscriber may already be installed by the host application
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
