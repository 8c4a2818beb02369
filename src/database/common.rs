use crate::config::{config::DatabaseBackend, Config};

use super::redis;

/// 当前配置是否使用内存后端
pub(super) fn use_memory() -> bool {
    return Config::get().database.backend == DatabaseBackend::Memory;
}

/// 连接数据库，内存后端无需任何准备
pub async fn connect_database() -> Result<(), ()> {
    if use_memory() {
        return Ok(());
    }
    return redis::connect_database().await;
}
