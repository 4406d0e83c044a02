use std::collections::{HashMap, HashSet};

/// 文件夹展开状态
///
/// `manual` 记录用户的手动切换；`forced` 是搜索期间叠加的强制展开集合，
/// 不会写回 `manual`，清空搜索后用户原先的展开状态保持不变。
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    manual: HashMap<String, bool>,
    forced: HashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未记录的 key 视为折叠
    pub fn is_expanded(&self, key: &str) -> bool {
        self.forced.contains(key) || self.manual.get(key).copied().unwrap_or(false)
    }

    /// 翻转手动状态，与祖先/后代无关
    pub fn toggle(&mut self, key: &str) -> bool {
        let entry = self.manual.entry(key.to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn expand(&mut self, key: &str) {
        self.manual.insert(key.to_string(), true);
    }

    pub fn set_forced(&mut self, forced: HashSet<String>) {
        self.forced = forced;
    }

    pub fn clear_forced(&mut self) {
        self.forced.clear();
    }

    /// 文件夹重命名后，把 `from` 及其后代的手动状态迁移到 `to` 前缀下
    pub fn rename_prefix(&mut self, from: &str, to: &str) {
        let moved: Vec<String> = self.manual.keys().filter(|k| k.starts_with(from)).cloned().collect();
        for old_key in moved {
            if let Some(expanded) = self.manual.remove(&old_key) {
                self.manual.insert(format!("{}{}", to, &old_key[from.len()..]), expanded);
            }
        }
    }

    /// 丢弃不再存在的 key 的手动状态
    pub fn retain_keys<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.manual.retain(|key, _| keep(key));
    }
}
