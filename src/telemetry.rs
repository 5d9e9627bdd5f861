//! Tracing setup.
//!
//! `RUST_LOG` controls the filter (default `info`). actix-web's access log is
//! emitted through the `log` facade and bridged into the same subscriber.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
    {
        eprintln!("tracing already initialized: {error}");
    }
}
