//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod families;
mod family_links;
mod students;

use crate::config::AppConfig;
use crate::errors::{Result, TalkLearnError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移（含链接 token 加密回填）
        Migrator::up(&db, None)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TalkLearnError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| TalkLearnError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| TalkLearnError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TalkLearnError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    families::{
        entities::{Family, Student},
        requests::{AddStudentRequest, CreateFamilyRequest, FamilyListQuery, UpdateFamilyRequest},
        responses::FamilyListResponse,
    },
    family_links::{entities::FamilyLink, requests::LinkListQuery, responses::LinkListResponse},
};
use crate::storage::{NewLinkRecord, Storage};
use crate::utils::link_token::SealedToken;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 家庭模块
    async fn create_family(&self, family: CreateFamilyRequest) -> Result<Family> {
        self.create_family_impl(family).await
    }

    async fn get_family_by_id(&self, id: i64) -> Result<Option<Family>> {
        self.get_family_by_id_impl(id).await
    }

    async fn list_families_with_pagination(
        &self,
        query: FamilyListQuery,
    ) -> Result<FamilyListResponse> {
        self.list_families_with_pagination_impl(query).await
    }

    async fn update_family(
        &self,
        id: i64,
        update: UpdateFamilyRequest,
    ) -> Result<Option<Family>> {
        self.update_family_impl(id, update).await
    }

    async fn delete_family(&self, id: i64) -> Result<bool> {
        self.delete_family_impl(id).await
    }

    async fn count_families(&self) -> Result<u64> {
        self.count_families_impl().await
    }

    // 学生模块
    async fn add_student(&self, family_id: i64, student: AddStudentRequest) -> Result<Student> {
        self.add_student_impl(family_id, student).await
    }

    async fn list_students_by_family(&self, family_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_family_impl(family_id).await
    }

    async fn remove_student(&self, family_id: i64, student_id: i64) -> Result<bool> {
        self.remove_student_impl(family_id, student_id).await
    }

    // 链接模块
    async fn create_family_link(&self, record: NewLinkRecord) -> Result<FamilyLink> {
        self.create_family_link_impl(record).await
    }

    async fn get_family_link_by_id(&self, link_id: i64) -> Result<Option<FamilyLink>> {
        self.get_family_link_by_id_impl(link_id).await
    }

    async fn get_family_link_by_index(&self, token_index: &str) -> Result<Option<FamilyLink>> {
        self.get_family_link_by_index_impl(token_index).await
    }

    async fn get_link_cipher_by_id(&self, link_id: i64) -> Result<Option<String>> {
        self.get_link_cipher_by_id_impl(link_id).await
    }

    async fn get_link_index_by_id(&self, link_id: i64) -> Result<Option<String>> {
        self.get_link_index_by_id_impl(link_id).await
    }

    async fn list_family_links_with_pagination(
        &self,
        family_id: i64,
        query: LinkListQuery,
    ) -> Result<LinkListResponse> {
        self.list_family_links_with_pagination_impl(family_id, query)
            .await
    }

    async fn rotate_family_link(
        &self,
        link_id: i64,
        sealed: SealedToken,
    ) -> Result<Option<FamilyLink>> {
        self.rotate_family_link_impl(link_id, sealed).await
    }

    async fn revoke_family_link(&self, link_id: i64) -> Result<Option<FamilyLink>> {
        self.revoke_family_link_impl(link_id).await
    }

    async fn touch_family_link(&self, link_id: i64) -> Result<bool> {
        self.touch_family_link_impl(link_id).await
    }
}
