//! Log output for tests

/// Route `log` output through env_logger's test writer
///
/// Safe to call from every test; only the first call installs the logger.
/// Filtering follows `RUST_LOG`.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
