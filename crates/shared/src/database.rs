//! PostgreSQL 连接池
//!
//! 服务启动时建池并执行迁移，就绪探针通过 `health_check` 测量往返延迟。

use crate::config::DatabaseConfig;
use crate::error::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    #[instrument(skip(config), fields(max_connections = config.max_connections))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = Self::pool_options(config).connect(&config.url).await?;
        info!("Database pool ready");
        Ok(Self { pool })
    }

    /// 包装已有连接池（测试中配合 `connect_lazy` 使用）
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 执行 `SELECT 1`，返回往返耗时
    pub async fn health_check(&self) -> Result<Duration> {
        let started = Instant::now();
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        let elapsed = started.elapsed();
        debug!(latency_ms = elapsed.as_millis() as u64, "Database ping");
        Ok(elapsed)
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }

    /// 执行仓库根目录 `migrations/` 下的迁移
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}
