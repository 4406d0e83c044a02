/// 初始化日志：默认级别 `default_filter`，可由 RUST_LOG 覆盖。重复调用无副作用
pub fn init_logging(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
    log::debug!("logging initialised (default filter: {})", default_filter);
}
