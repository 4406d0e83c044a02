use crate::AttachmentError;

/// 渲染时最多展开的层级
pub const DEFAULT_RENDER_DEPTH: usize = 6;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub render_depth: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            render_depth: DEFAULT_RENDER_DEPTH,
        }
    }
}

impl AppConfig {
    /// 从环境变量读取配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self, AttachmentError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AttachmentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = non_empty("ATTACH_BASE_URL") {
            config.base_url = url;
        }
        config.token = non_empty("ATTACH_TOKEN");
        if let Some(raw) = non_empty("ATTACH_TIMEOUT_SECS") {
            config.timeout_secs = raw
                .parse()
                .map_err(|_| AttachmentError::Config(format!("ATTACH_TIMEOUT_SECS 不是有效数字: {}", raw)))?;
        }
        if let Some(raw) = non_empty("ATTACH_RENDER_DEPTH") {
            config.render_depth = raw
                .parse()
                .map_err(|_| AttachmentError::Config(format!("ATTACH_RENDER_DEPTH 不是有效数字: {}", raw)))?;
        }
        Ok(config)
    }
}
