pub use shine_test_macros::test;
pub use tokio;

use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let fmt = fmt::layer().with_test_writer().with_target(false).compact();

    // also installs the `log` bridge, the crates under test log through `log`
    let _ = tracing_subscriber::registry().with(fmt).with(filter).try_init();
}

/// Test setup executed before each test.
pub fn setup_test() {
    INIT.call_once(|| {
        init_tracing();
        log::trace!("test tracing initialized");
    });
}
