use serde::{Deserialize, Serialize};

use crate::FileKind;

/// 文件树节点（由扁平列表派生，不持久化）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// 截至本节点的完整路径前缀
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// 以下三项仅文件叶子节点携带
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(key: impl Into<String>, name: impl Into<String>, kind: FileKind) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            kind,
            extension: None,
            modified: None,
            size: None,
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    /// 本节点及全部后代的数量
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// 在子树中按 key 查找
    pub fn find(&self, key: &str) -> Option<&TreeNode> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }
}

/// 在整片森林中按 key 查找
pub fn find_node<'a>(forest: &'a [TreeNode], key: &str) -> Option<&'a TreeNode> {
    forest.iter().find_map(|node| node.find(key))
}
