use std::collections::HashSet;

use attach_domain::{FileRecord, KeyPath};

/// 搜索过滤：对完整 key 做不区分大小写的子串匹配
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    term: String,
    needle: String,
}

impl SearchFilter {
    pub fn new(term: impl Into<String>) -> Self {
        let term = term.into();
        let needle = term.to_lowercase();
        Self { term, needle }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// 只含空白的搜索词视为未启用
    pub fn is_active(&self) -> bool {
        !self.term.trim().is_empty()
    }

    pub fn matches(&self, record: &FileRecord) -> bool {
        !self.is_active() || record.key.to_lowercase().contains(&self.needle)
    }

    /// 过滤发生在建树之前，结果保持原有顺序
    pub fn apply(&self, records: &[FileRecord]) -> Vec<FileRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

/// 命中记录的全部文件夹前缀，搜索期间强制展开
pub fn forced_expansion(matches: &[FileRecord]) -> HashSet<String> {
    matches
        .iter()
        .flat_map(|record| {
            KeyPath::from_record(record)
                .folder_prefixes()
                .map(|prefix| prefix.to_key())
                .collect::<Vec<_>>()
        })
        .collect()
}
