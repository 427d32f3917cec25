//! 家庭链接实体
//!
//! `token_cipher` 为 AES-256-GCM 密文（base64），`token_index` 为
//! HMAC-SHA256 查找索引（hex，唯一）。明文 token 不落库。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "family_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub family_id: i64,
    pub label: Option<String>,
    pub token_cipher: String,
    #[sea_orm(unique)]
    pub token_index: String,
    pub status: String,
    pub expires_at: Option<i64>,
    pub rotated_at: Option<i64>,
    pub revoked_at: Option<i64>,
    pub last_used_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::families::Entity",
        from = "Column::FamilyId",
        to = "super::families::Column::Id"
    )]
    Family,
}

impl Related<super::families::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Family.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型（密文与索引不外泄）
impl Model {
    pub fn into_family_link(self) -> crate::models::family_links::entities::FamilyLink {
        use crate::models::family_links::entities::{FamilyLink, LinkStatus};
        use chrono::{DateTime, Utc};

        let ts = |v: i64| DateTime::<Utc>::from_timestamp(v, 0).unwrap_or_default();

        FamilyLink {
            id: self.id,
            family_id: self.family_id,
            label: self.label,
            status: self
                .status
                .parse::<LinkStatus>()
                .unwrap_or(LinkStatus::Revoked),
            expires_at: self.expires_at.map(ts),
            rotated_at: self.rotated_at.map(ts),
            revoked_at: self.revoked_at.map(ts),
            last_used_at: self.last_used_at.map(ts),
            created_at: ts(self.created_at),
            updated_at: ts(self.updated_at),
        }
    }
}
