//! # Store 模块
//!
//! 持有当前生效的 blend 表，供道具系统按需查询。
//!
//! ## 并发模型
//!
//! ```text
//! reload:  parse ──► 新 BlendTables ──► Arc 替换（写锁内只做一次指针交换）
//! 查询:    读锁内克隆 Arc ──► 在快照上扫描 / 抽取
//! ```
//!
//! 查询总是在某一次加载的完整快照上进行，不会看到半建成的表。
//! 解析过程在解析器互斥锁内完成，多个 reload 串行执行。

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use rand::Rng;

use crate::apply_type::{ApplyTypeLookup, ApplyTypeTable};
use crate::config::{BlendConfig, ReloadPolicy};
use crate::error::{LoadError, LoadResult, PoolError};
use crate::item::{ApplyOutcome, BlendTarget, write_sockets};
use crate::parser::BlendParser;
use crate::table::{BlendRoll, BlendTables};

/// blend 表存储
pub struct BlendStore<L = ApplyTypeTable> {
    config: BlendConfig,
    parser: Mutex<BlendParser<L>>,
    tables: RwLock<Arc<BlendTables>>,
}

impl BlendStore<ApplyTypeTable> {
    /// 使用内置属性表创建空存储
    pub fn new(config: BlendConfig) -> Self {
        Self::with_lookup(config, ApplyTypeTable::standard())
    }
}

impl<L: ApplyTypeLookup> BlendStore<L> {
    /// 使用自定义属性名映射创建空存储
    pub fn with_lookup(config: BlendConfig, lookup: L) -> Self {
        Self {
            config,
            parser: Mutex::new(BlendParser::with_lookup(lookup)),
            tables: RwLock::new(Arc::new(BlendTables::new())),
        }
    }

    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    // =========================================================================
    // 加载
    // =========================================================================

    /// 从配置指定的路径重新加载
    pub fn reload(&self) -> LoadResult<()> {
        let path = self.config.blend_file_path();
        self.reload_from(path)
    }

    /// 从指定文件重新加载
    pub fn reload_from(&self, path: impl AsRef<Path>) -> LoadResult<()> {
        let mut parser = self.lock_parser();
        let result = parser.load(path);
        self.publish(result)
    }

    /// 从文本重新加载
    pub fn load_str(&self, text: &str) -> LoadResult<()> {
        let mut parser = self.lock_parser();
        let result = parser.parse(text).map_err(LoadError::from);
        self.publish(result)
    }

    /// 上一次加载产生的警告
    pub fn warnings(&self) -> Vec<String> {
        self.lock_parser().warnings().to_vec()
    }

    fn publish(&self, result: LoadResult<BlendTables>) -> LoadResult<()> {
        match result {
            Ok(tables) => {
                self.swap(tables);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, policy = ?self.config.on_load_failure, "blend 表加载失败");
                if self.config.on_load_failure == ReloadPolicy::Clear {
                    self.swap(BlendTables::new());
                }
                Err(e)
            }
        }
    }

    fn swap(&self, tables: BlendTables) {
        let mut guard = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(tables);
    }

    fn lock_parser(&self) -> MutexGuard<'_, BlendParser<L>> {
        self.parser.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // 查询
    // =========================================================================

    /// 当前表的快照
    pub fn snapshot(&self) -> Arc<BlendTables> {
        Arc::clone(&self.tables.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn blend_count(&self) -> usize {
        self.snapshot().blends.len()
    }

    pub fn bonus_count(&self) -> usize {
        self.snapshot().bonuses.len()
    }

    pub fn pooled_item_vnum(&self) -> u32 {
        self.config.pooled_item_vnum
    }

    pub fn is_pooled_item(&self, item_vnum: u32) -> bool {
        item_vnum == self.config.pooled_item_vnum
    }

    /// 是否为合成道具
    ///
    /// 奖励池道具总是返回 `true`，与奖励池是否为空无关。
    pub fn item_exists(&self, item_vnum: u32) -> bool {
        self.is_pooled_item(item_vnum) || self.snapshot().find_blend(item_vnum).is_some()
    }

    /// 为普通合成道具抽取属性
    ///
    /// 奖励池道具不走这里（使用时由 [`Self::get_pool_bonus_with`] 抽取），返回 `None`。
    pub fn resolve_blend_with<R: Rng>(&self, item_vnum: u32, rng: &mut R) -> Option<BlendRoll> {
        if self.is_pooled_item(item_vnum) {
            return None;
        }
        let roll = self.snapshot().resolve_blend(item_vnum, rng)?;
        tracing::debug!(
            item_vnum,
            apply_type = roll.apply_type,
            apply_value = roll.apply_value,
            apply_duration = roll.apply_duration,
            "blend item 抽取"
        );
        Some(roll)
    }

    /// 同 [`Self::resolve_blend_with`]，使用线程本地随机源
    pub fn resolve_blend(&self, item_vnum: u32) -> Option<BlendRoll> {
        self.resolve_blend_with(item_vnum, &mut rand::rng())
    }

    /// 使用奖励池道具时抽取属性
    pub fn get_pool_bonus_with<R: Rng>(&self, rng: &mut R) -> Result<BlendRoll, PoolError> {
        self.snapshot().resolve_pool_bonus(rng).inspect_err(|e| {
            tracing::error!(
                item_vnum = self.config.pooled_item_vnum,
                error = %e,
                "奖励池道具无法抽取属性"
            );
        })
    }

    /// 同 [`Self::get_pool_bonus_with`]，使用线程本地随机源
    pub fn get_pool_bonus(&self) -> Result<BlendRoll, PoolError> {
        self.get_pool_bonus_with(&mut rand::rng())
    }

    // =========================================================================
    // 道具
    // =========================================================================

    /// 道具创建时写入属性
    ///
    /// - 普通合成道具：抽取后写入 socket 0/1/2
    /// - 奖励池道具：不写入，保持可堆叠
    /// - 无条目：不写入
    pub fn apply_to_item_with<T, R>(&self, item: &mut T, rng: &mut R) -> ApplyOutcome
    where
        T: BlendTarget + ?Sized,
        R: Rng,
    {
        let item_vnum = item.vnum();
        if self.is_pooled_item(item_vnum) {
            return ApplyOutcome::Deferred;
        }
        match self.resolve_blend_with(item_vnum, rng) {
            Some(roll) => {
                write_sockets(item, &roll);
                ApplyOutcome::Applied(roll)
            }
            None => ApplyOutcome::Unresolved,
        }
    }

    /// 同 [`Self::apply_to_item_with`]，使用线程本地随机源
    pub fn apply_to_item<T: BlendTarget + ?Sized>(&self, item: &mut T) -> ApplyOutcome {
        self.apply_to_item_with(item, &mut rand::rng())
    }
}
