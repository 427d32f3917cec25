use super::SeaOrmStorage;
use crate::entity::family_links::{ActiveModel, Column, Entity as FamilyLinks};
use crate::errors::{Result, TalkLearnError};
use crate::models::{
    PaginationInfo,
    family_links::{
        entities::{FamilyLink, LinkStatus},
        requests::LinkListQuery,
        responses::LinkListResponse,
    },
};
use crate::storage::NewLinkRecord;
use crate::utils::link_token::SealedToken;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建链接记录
    pub async fn create_family_link_impl(&self, record: NewLinkRecord) -> Result<FamilyLink> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            family_id: Set(record.family_id),
            label: Set(record.label),
            token_cipher: Set(record.sealed.cipher),
            token_index: Set(record.sealed.index),
            status: Set(LinkStatus::Active.to_string()),
            expires_at: Set(record.expires_at),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("创建链接失败: {e}")))?;

        Ok(result.into_family_link())
    }

    /// 通过 ID 获取链接
    pub async fn get_family_link_by_id_impl(&self, link_id: i64) -> Result<Option<FamilyLink>> {
        let result = FamilyLinks::find_by_id(link_id)
            .one(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询链接失败: {e}")))?;

        Ok(result.map(|m| m.into_family_link()))
    }

    /// 通过查找索引获取链接
    ///
    /// token 解析的唯一数据库入口：索引列唯一，等值查询一次命中。
    pub async fn get_family_link_by_index_impl(
        &self,
        token_index: &str,
    ) -> Result<Option<FamilyLink>> {
        let result = FamilyLinks::find()
            .filter(Column::TokenIndex.eq(token_index))
            .one(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询链接失败: {e}")))?;

        Ok(result.map(|m| m.into_family_link()))
    }

    /// 获取链接密文
    pub async fn get_link_cipher_by_id_impl(&self, link_id: i64) -> Result<Option<String>> {
        let result = FamilyLinks::find_by_id(link_id)
            .one(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询链接密文失败: {e}")))?;

        Ok(result.map(|m| m.token_cipher))
    }

    /// 获取链接查找索引
    pub async fn get_link_index_by_id_impl(&self, link_id: i64) -> Result<Option<String>> {
        let result = FamilyLinks::find_by_id(link_id)
            .one(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询链接索引失败: {e}")))?;

        Ok(result.map(|m| m.token_index))
    }

    /// 分页列出家庭的链接
    pub async fn list_family_links_with_pagination_impl(
        &self,
        family_id: i64,
        query: LinkListQuery,
    ) -> Result<LinkListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = FamilyLinks::find().filter(Column::FamilyId.eq(family_id));

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询链接总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询链接页数失败: {e}")))?;

        let links = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询链接列表失败: {e}")))?;

        Ok(LinkListResponse {
            items: links.into_iter().map(|m| m.into_family_link()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 原地轮换链接 token：写入新密文与新索引，旧 token 立即失效
    pub async fn rotate_family_link_impl(
        &self,
        link_id: i64,
        sealed: SealedToken,
    ) -> Result<Option<FamilyLink>> {
        let existing = self.get_family_link_by_id_impl(link_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(link_id),
            token_cipher: Set(sealed.cipher),
            token_index: Set(sealed.index),
            rotated_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("轮换链接失败: {e}")))?;

        self.get_family_link_by_id_impl(link_id).await
    }

    /// 吊销链接
    pub async fn revoke_family_link_impl(&self, link_id: i64) -> Result<Option<FamilyLink>> {
        let existing = self.get_family_link_by_id_impl(link_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(link_id),
            status: Set(LinkStatus::Revoked.to_string()),
            revoked_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("吊销链接失败: {e}")))?;

        self.get_family_link_by_id_impl(link_id).await
    }

    /// 更新链接最近使用时间
    pub async fn touch_family_link_impl(&self, link_id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = FamilyLinks::update_many()
            .col_expr(Column::LastUsedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(link_id))
            .exec(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("更新使用时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
