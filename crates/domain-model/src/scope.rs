use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// 两个互相独立的 key 空间：一般文档 / 物料
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    #[default]
    General,
    Materials,
}

impl Partition {
    pub fn from_flag(materiales: bool) -> Self {
        if materiales {
            Self::Materials
        } else {
            Self::General
        }
    }

    /// 远端请求里的 `materiales` 标志
    pub fn is_materials(self) -> bool {
        matches!(self, Self::Materials)
    }
}

/// 文件树所属的实体：gestor（如 `ordenes`）+ 实体 id + 分区
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub gestor: String,
    pub id: String,
    #[serde(default)]
    pub partition: Partition,
}

impl Scope {
    pub fn new(gestor: impl Into<String>, id: impl Into<String>, partition: Partition) -> Self {
        Self {
            gestor: gestor.into(),
            id: id.into(),
            partition,
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.gestor, self.id)?;
        if self.partition.is_materials() {
            write!(f, " (materiales)")?;
        }
        Ok(())
    }
}
