use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directives used when `RUST_LOG` is unset: dependencies at `warn`, this
/// crate at `info`, or `debug` with `--verbose`.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "warn,gtin_barcodes=debug"
    } else {
        "warn,gtin_barcodes=info"
    }
}

/// Compact stderr logging; `RUST_LOG` wins over the verbosity flag.
pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
