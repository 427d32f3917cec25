use super::SeaOrmStorage;
use crate::entity::families::{ActiveModel, Column, Entity as Families};
use crate::errors::{Result, TalkLearnError};
use crate::models::{
    PaginationInfo,
    families::{
        entities::Family,
        requests::{CreateFamilyRequest, FamilyListQuery, UpdateFamilyRequest},
        responses::FamilyListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建家庭
    pub async fn create_family_impl(&self, req: CreateFamilyRequest) -> Result<Family> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            family_name: Set(req.family_name),
            contact_email: Set(req.contact_email),
            notes: Set(req.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("创建家庭失败: {e}")))?;

        Ok(result.into_family())
    }

    /// 通过 ID 获取家庭
    pub async fn get_family_by_id_impl(&self, id: i64) -> Result<Option<Family>> {
        let result = Families::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询家庭失败: {e}")))?;

        Ok(result.map(|m| m.into_family()))
    }

    /// 分页列出家庭
    pub async fn list_families_with_pagination_impl(
        &self,
        query: FamilyListQuery,
    ) -> Result<FamilyListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Families::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::FamilyName.contains(&escaped))
                    .add(Column::ContactEmail.contains(&escaped)),
            );
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询家庭总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询家庭页数失败: {e}")))?;

        let families = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("查询家庭列表失败: {e}")))?;

        Ok(FamilyListResponse {
            items: families.into_iter().map(|m| m.into_family()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新家庭信息
    pub async fn update_family_impl(
        &self,
        id: i64,
        update: UpdateFamilyRequest,
    ) -> Result<Option<Family>> {
        // 先检查家庭是否存在
        let existing = self.get_family_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(family_name) = update.family_name {
            model.family_name = Set(family_name);
        }

        // 外层 Some 表示请求携带了该字段，内层 None 表示显式置空
        if let Some(contact_email) = update.contact_email {
            model.contact_email = Set(contact_email);
        }

        if let Some(notes) = update.notes {
            model.notes = Set(notes);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("更新家庭失败: {e}")))?;

        self.get_family_by_id_impl(id).await
    }

    /// 删除家庭
    pub async fn delete_family_impl(&self, id: i64) -> Result<bool> {
        let result = Families::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("删除家庭失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计家庭数量
    pub async fn count_families_impl(&self) -> Result<u64> {
        let count = Families::find()
            .count(&self.db)
            .await
            .map_err(|e| TalkLearnError::database_operation(format!("统计家庭数量失败: {e}")))?;

        Ok(count)
    }
}
