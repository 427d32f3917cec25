use std::sync::Arc;

use crate::models::{
    families::{
        entities::{Family, Student},
        requests::{AddStudentRequest, CreateFamilyRequest, FamilyListQuery, UpdateFamilyRequest},
        responses::FamilyListResponse,
    },
    family_links::{
        entities::FamilyLink,
        requests::LinkListQuery,
        responses::LinkListResponse,
    },
};
use crate::utils::link_token::SealedToken;

use crate::errors::Result;

pub mod sea_orm_storage;

/// 新链接的落库数据（由服务层封存 token 后构造）
#[derive(Debug, Clone)]
pub struct NewLinkRecord {
    pub family_id: i64,
    pub label: Option<String>,
    pub sealed: SealedToken,
    pub expires_at: Option<i64>,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 家庭管理方法
    // 创建家庭
    async fn create_family(&self, family: CreateFamilyRequest) -> Result<Family>;
    // 通过ID获取家庭信息
    async fn get_family_by_id(&self, id: i64) -> Result<Option<Family>>;
    // 分页列出家庭
    async fn list_families_with_pagination(
        &self,
        query: FamilyListQuery,
    ) -> Result<FamilyListResponse>;
    // 更新家庭信息
    async fn update_family(&self, id: i64, update: UpdateFamilyRequest)
    -> Result<Option<Family>>;
    // 删除家庭（级联删除学生与链接）
    async fn delete_family(&self, id: i64) -> Result<bool>;
    // 统计家庭数量
    async fn count_families(&self) -> Result<u64>;

    /// 学生管理方法
    // 向家庭添加学生
    async fn add_student(&self, family_id: i64, student: AddStudentRequest) -> Result<Student>;
    // 列出家庭的学生
    async fn list_students_by_family(&self, family_id: i64) -> Result<Vec<Student>>;
    // 从家庭移除学生
    async fn remove_student(&self, family_id: i64, student_id: i64) -> Result<bool>;

    /// 家庭链接管理方法
    // 创建链接记录
    async fn create_family_link(&self, record: NewLinkRecord) -> Result<FamilyLink>;
    // 通过ID获取链接
    async fn get_family_link_by_id(&self, link_id: i64) -> Result<Option<FamilyLink>>;
    // 通过查找索引获取链接（token 解析路径）
    async fn get_family_link_by_index(&self, token_index: &str) -> Result<Option<FamilyLink>>;
    // 获取链接密文（教务查看 token 用）
    async fn get_link_cipher_by_id(&self, link_id: i64) -> Result<Option<String>>;
    // 获取链接查找索引（吊销/轮换后清解析缓存用）
    async fn get_link_index_by_id(&self, link_id: i64) -> Result<Option<String>>;
    // 分页列出家庭的链接
    async fn list_family_links_with_pagination(
        &self,
        family_id: i64,
        query: LinkListQuery,
    ) -> Result<LinkListResponse>;
    // 原地轮换链接 token
    async fn rotate_family_link(
        &self,
        link_id: i64,
        sealed: SealedToken,
    ) -> Result<Option<FamilyLink>>;
    // 吊销链接
    async fn revoke_family_link(&self, link_id: i64) -> Result<Option<FamilyLink>>;
    // 更新链接最近使用时间
    async fn touch_family_link(&self, link_id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
