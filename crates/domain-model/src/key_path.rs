//! 路径 key 的结构化表示
//!
//! 远端用字符串前缀表达层级：`A/B/` 是文件夹，`A/B/c.pdf` 是文件。
//! [`KeyPath`] 把 key 拆成段序列并记住是否为文件夹，所有拼接/取父级/改名都在段上完成，
//! 避免出现 `//` 或丢失结尾分隔符。

use std::fmt::{self, Display, Formatter};

use crate::{FileKind, FileRecord};

pub const SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath {
    segments: Vec<String>,
    folder: bool,
}

impl KeyPath {
    /// 根（空 key）
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
            folder: true,
        }
    }

    /// 解析 key：结尾为分隔符的视为文件夹，空段被忽略
    pub fn parse(key: &str) -> Self {
        let segments = split_segments(key);
        let folder = segments.is_empty() || key.ends_with(SEPARATOR);
        Self { segments, folder }
    }

    /// 按记录的 type 决定末段是否为文件夹（type 优先于 key 的结尾）
    pub fn from_record(record: &FileRecord) -> Self {
        Self {
            segments: split_segments(&record.key),
            folder: record.kind.is_folder(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_folder(&self) -> bool {
        self.folder
    }

    pub fn kind(&self) -> FileKind {
        if self.folder {
            FileKind::Folder
        } else {
            FileKind::File
        }
    }

    /// 末段名称；根为 None
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// 父文件夹；根没有父级
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
            folder: true,
        })
    }

    pub fn child_folder(&self, name: &str) -> Self {
        self.child(name, true)
    }

    pub fn child_file(&self, name: &str) -> Self {
        self.child(name, false)
    }

    fn child(&self, name: &str, folder: bool) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments, folder }
    }

    /// 替换末段名称，保留文件夹/文件属性
    pub fn with_name(&self, name: &str) -> Self {
        match self.parent() {
            Some(parent) => parent.child(name, self.folder),
            None => self.clone(),
        }
    }

    /// 前 `depth` 段构成的前缀；`depth` 小于总段数时一定是文件夹
    pub fn prefix(&self, depth: usize) -> Self {
        let depth = depth.min(self.segments.len());
        Self {
            segments: self.segments[..depth].to_vec(),
            folder: depth < self.segments.len() || self.folder,
        }
    }

    /// 所有文件夹前缀（从浅到深），若自身是文件夹则包含自身
    pub fn folder_prefixes(&self) -> impl Iterator<Item = KeyPath> + '_ {
        (1..=self.segments.len())
            .map(move |depth| self.prefix(depth))
            .filter(KeyPath::is_folder)
    }

    /// 严格祖先：自身为文件夹且段序列是对方的真前缀
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.folder
            && self.segments.len() < other.segments.len()
            && self.segments[..] == other.segments[..self.segments.len()]
    }

    /// 还原为远端使用的 key 字符串
    pub fn to_key(&self) -> String {
        let mut key = self.segments.join("/");
        if self.folder && !self.segments.is_empty() {
            key.push(SEPARATOR);
        }
        key
    }
}

impl Default for KeyPath {
    fn default() -> Self {
        Self::root()
    }
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_key())
    }
}

fn split_segments(key: &str) -> Vec<String> {
    key.split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
