//! # Config 模块
//!
//! blend 子系统的配置。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高，由调用方覆盖字段）
//! 2. 配置文件 (JSON)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 特殊道具（能量水晶）的默认 vnum
pub const DEFAULT_POOLED_ITEM_VNUM: u32 = 51002;

/// 重新加载失败时的处理方式
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReloadPolicy {
    /// 发布空表
    #[default]
    Clear,
    /// 保留上一次成功加载的表
    KeepLastGood,
}

/// blend 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendConfig {
    /// locale 基础目录
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,

    /// blend 文件名（相对于 base_path）
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// 从奖励池抽取属性的特殊道具 vnum
    #[serde(default = "default_pooled_item_vnum")]
    pub pooled_item_vnum: u32,

    /// 加载失败时的处理方式
    #[serde(default)]
    pub on_load_failure: ReloadPolicy,
}

fn default_base_path() -> PathBuf {
    PathBuf::from("locale")
}

fn default_file_name() -> String {
    "blend.txt".to_string()
}

fn default_pooled_item_vnum() -> u32 {
    DEFAULT_POOLED_ITEM_VNUM
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            file_name: default_file_name(),
            pooled_item_vnum: default_pooled_item_vnum(),
            on_load_failure: ReloadPolicy::default(),
        }
    }
}

impl BlendConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    tracing::warn!(error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// blend 文件完整路径：`<base_path>/<file_name>`
    pub fn blend_file_path(&self) -> PathBuf {
        self.base_path.join(&self.file_name)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_name.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "file_name 不能为空".to_string(),
            ));
        }
        Ok(())
    }
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}
