use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default
/// `basemodel=info`). Only the first call has an effect, and an already
/// installed global subscriber is left alone.
pub fn init() {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("basemodel=info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}
