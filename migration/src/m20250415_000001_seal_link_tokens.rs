//! 家庭链接 token 加密迁移
//!
//! 旧版 schema 将链接 token 以明文存储在 `family_links.token` 列。
//! 本迁移将所有存量 token 改写为 AES-256-GCM 密文 + HMAC-SHA256 查找索引，
//! 然后通过重建表的方式删除明文列（SQLite 不支持直接修改列约束）。
//!
//! 所需密钥与服务端一致，从环境变量读取：
//! - `TALKLEARN_LINK_ENCRYPTION_KEY`（base64，32 字节）
//! - `TALKLEARN_LINK_INDEX_KEY`（base64，32 字节）
//!
//! 空表上执行为无害操作，不需要密钥。

use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend};
use sha2::Sha256;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 新表：token_cipher + token_index 取代明文 token
        manager
            .create_table(
                Table::create()
                    .table(FamilyLinksSealed::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FamilyLinksSealed::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinksSealed::FamilyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FamilyLinksSealed::Label).string().null())
                    .col(
                        ColumnDef::new(FamilyLinksSealed::TokenCipher)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinksSealed::TokenIndex)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinksSealed::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinksSealed::ExpiresAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinksSealed::RotatedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinksSealed::RevokedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinksSealed::LastUsedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinksSealed::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FamilyLinksSealed::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FamilyLinksSealed::Table, FamilyLinksSealed::FamilyId)
                            .to(Families::Table, Families::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 回填存量数据
        let db = manager.get_connection();

        let select = Query::select()
            .columns([
                FamilyLinks::Id,
                FamilyLinks::FamilyId,
                FamilyLinks::Label,
                FamilyLinks::Token,
                FamilyLinks::Status,
                FamilyLinks::ExpiresAt,
                FamilyLinks::RotatedAt,
                FamilyLinks::RevokedAt,
                FamilyLinks::LastUsedAt,
                FamilyLinks::CreatedAt,
                FamilyLinks::UpdatedAt,
            ])
            .from(FamilyLinks::Table)
            .to_owned();

        let rows = db.query_all(&select).await?;

        if !rows.is_empty() {
            let sealer = LegacySealer::from_env()?;

            for row in rows {
                let id: i64 = row.try_get("", "id")?;
                let family_id: i64 = row.try_get("", "family_id")?;
                let label: Option<String> = row.try_get("", "label")?;
                let token: String = row.try_get("", "token")?;
                let status: String = row.try_get("", "status")?;
                let expires_at: Option<i64> = row.try_get("", "expires_at")?;
                let rotated_at: Option<i64> = row.try_get("", "rotated_at")?;
                let revoked_at: Option<i64> = row.try_get("", "revoked_at")?;
                let last_used_at: Option<i64> = row.try_get("", "last_used_at")?;
                let created_at: i64 = row.try_get("", "created_at")?;
                let updated_at: i64 = row.try_get("", "updated_at")?;

                let (cipher, index) = sealer.seal(&token)?;

                let insert = Query::insert()
                    .into_table(FamilyLinksSealed::Table)
                    .columns([
                        FamilyLinksSealed::Id,
                        FamilyLinksSealed::FamilyId,
                        FamilyLinksSealed::Label,
                        FamilyLinksSealed::TokenCipher,
                        FamilyLinksSealed::TokenIndex,
                        FamilyLinksSealed::Status,
                        FamilyLinksSealed::ExpiresAt,
                        FamilyLinksSealed::RotatedAt,
                        FamilyLinksSealed::RevokedAt,
                        FamilyLinksSealed::LastUsedAt,
                        FamilyLinksSealed::CreatedAt,
                        FamilyLinksSealed::UpdatedAt,
                    ])
                    .values_panic([
                        id.into(),
                        family_id.into(),
                        label.into(),
                        cipher.into(),
                        index.into(),
                        status.into(),
                        expires_at.into(),
                        rotated_at.into(),
                        revoked_at.into(),
                        last_used_at.into(),
                        created_at.into(),
                        updated_at.into(),
                    ])
                    .to_owned();

                manager.exec_stmt(insert).await?;
            }
        }

        // 删除旧表并顶替其名字
        manager
            .drop_table(Table::drop().table(FamilyLinks::Table).to_owned())
            .await?;
        manager
            .rename_table(
                Table::rename()
                    .table(FamilyLinksSealed::Table, FamilyLinks::Table)
                    .to_owned(),
            )
            .await?;

        // PostgreSQL 的序列不随显式 id 插入推进,回填后必须重置,
        // 否则后续签发的自增主键会与存量行冲突
        if manager.get_database_backend() == DatabaseBackend::Postgres {
            db.execute_unprepared(
                "SELECT setval(pg_get_serial_sequence('family_links', 'id'), \
                 COALESCE((SELECT MAX(id) FROM family_links), 0) + 1, false)",
            )
            .await?;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // 明文 token 已不可恢复，本迁移不支持回滚
        Err(DbErr::Migration(
            "seal_link_tokens cannot be reverted: plaintext tokens are gone".to_owned(),
        ))
    }
}

/// 与服务端 `utils::link_token` 相同的封存逻辑，在迁移期独立实现，
/// 避免 migration crate 反向依赖主 crate。
struct LegacySealer {
    encryption_key: [u8; 32],
    index_key: [u8; 32],
}

impl LegacySealer {
    fn from_env() -> Result<Self, DbErr> {
        Ok(Self {
            encryption_key: read_key("TALKLEARN_LINK_ENCRYPTION_KEY")?,
            index_key: read_key("TALKLEARN_LINK_INDEX_KEY")?,
        })
    }

    fn seal(&self, token_text: &str) -> Result<(String, String), DbErr> {
        let raw = URL_SAFE_NO_PAD.decode(token_text).map_err(|e| {
            DbErr::Migration(format!("legacy token is not valid base64url: {e}"))
        })?;

        let key = Key::<Aes256Gcm>::from_slice(&self.encryption_key);
        let aead = Aes256Gcm::new(key);
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let mut cipher = aead
            .encrypt(&nonce, raw.as_slice())
            .map_err(|e| DbErr::Migration(format!("token encryption failed: {e}")))?;

        let mut out = nonce.to_vec();
        out.append(&mut cipher);

        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&self.index_key)
            .map_err(|e| DbErr::Migration(format!("invalid index key: {e}")))?;
        mac.update(&raw);
        let index = hex::encode(mac.finalize().into_bytes());

        Ok((STANDARD.encode(out), index))
    }
}

fn read_key(name: &str) -> Result<[u8; 32], DbErr> {
    let value = std::env::var(name).map_err(|_| {
        DbErr::Migration(format!(
            "{name} must be set to seal existing family link tokens"
        ))
    })?;
    let bytes = STANDARD
        .decode(value.trim())
        .map_err(|e| DbErr::Migration(format!("{name} is not valid base64: {e}")))?;
    bytes
        .try_into()
        .map_err(|_| DbErr::Migration(format!("{name} must decode to exactly 32 bytes")))
}

use super::m20250301_000001_create_tables::{Families, FamilyLinks};

#[derive(Iden)]
enum FamilyLinksSealed {
    Table,
    Id,
    FamilyId,
    Label,
    TokenCipher,
    TokenIndex,
    Status,
    ExpiresAt,
    RotatedAt,
    RevokedAt,
    LastUsedAt,
    CreatedAt,
    UpdatedAt,
}
