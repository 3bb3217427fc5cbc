/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "debug";

/// Sets up the stderr logger and routes panics through it.
///
/// Safe to call more than once; only the first call installs a logger.
pub fn init() {
    let res = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_FILTER),
    )
    .try_init();

    if res.is_ok() {
        log_panics::init();
    }
}
