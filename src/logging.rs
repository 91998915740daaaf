use tracing_subscriber::EnvFilter;

/// ログ出力の初期化
///
/// `RUST_LOG` があればそれを優先。ログは stderr、通知は stdout に出す。
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "meal_scan=debug,meal_scan_common=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
