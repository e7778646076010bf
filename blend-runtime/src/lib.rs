//! # Blend Runtime
//!
//! 合成道具（blend item）属性表的加载与抽取。
//!
//! ## 架构概述
//!
//! ```text
//! blend.txt ──► BlendParser ──► BlendTables ──► BlendStore ──► 道具系统
//!                                 │                 │
//!                                 ├─ 合成表          ├─ apply_to_item（创建时）
//!                                 └─ 奖励池          └─ get_pool_bonus（使用时）
//! ```
//!
//! - 普通合成道具：按 vnum 查表，属性类型固定，value / duration 各自按五档权重抽取
//! - 奖励池道具（默认 vnum 51002）：先从奖励池均匀抽一条记录，再各自按五档权重抽取；
//!   创建时不写入 socket，使用时才抽取，以保持可堆叠
//!
//! ## 使用示例
//!
//! ```ignore
//! use blend_runtime::{BlendConfig, BlendStore};
//!
//! let store = BlendStore::new(BlendConfig::load("blend.json"));
//! store.reload()?;
//!
//! // 道具创建
//! store.apply_to_item(&mut item);
//!
//! // 奖励池道具被使用
//! let roll = store.get_pool_bonus()?;
//! ```
//!
//! ## 模块结构
//!
//! - [`tier`]：五档加权抽取
//! - [`apply_type`]：属性名映射
//! - [`parser`]：blend.txt 解析
//! - [`table`]：表结构与抽取算法
//! - [`store`]：可重新加载的表存储
//! - [`item`]：宿主道具接口
//! - [`config`]：配置
//! - [`error`]：错误类型定义

pub mod apply_type;
pub mod config;
pub mod error;
pub mod item;
pub mod parser;
pub mod store;
pub mod table;
pub mod tier;

// 重导出核心类型
pub use apply_type::{APPLY_NONE, ApplyTypeLookup, ApplyTypeTable};
pub use config::{BlendConfig, ConfigError, DEFAULT_POOLED_ITEM_VNUM, ReloadPolicy};
pub use error::{LoadError, LoadResult, ParseError, PoolError};
pub use item::{ApplyOutcome, BlendTarget};
pub use parser::BlendParser;
pub use store::BlendStore;
pub use table::{BlendEntry, BlendRoll, BlendTables, BonusRecord};
pub use tier::{TIER_COUNT, select_tier, tier_for_percent};
