pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::families::requests::{
    AddStudentRequest, CreateFamilyRequest, FamilyQueryParams, UpdateFamilyRequest,
};
use crate::storage::Storage;

pub struct FamilyService {
    storage: Option<Arc<dyn Storage>>,
}

impl FamilyService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 获取家庭列表
    pub async fn list_families(
        &self,
        request: &HttpRequest,
        query: FamilyQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_families(self, request, query).await
    }

    // 创建家庭
    pub async fn create_family(
        &self,
        req: &HttpRequest,
        family_data: CreateFamilyRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_family(self, req, family_data).await
    }

    // 根据家庭 ID 获取家庭详情（含学生）
    pub async fn get_family(&self, req: &HttpRequest, family_id: i64) -> ActixResult<HttpResponse> {
        get::get_family(self, req, family_id).await
    }

    // 更新家庭信息
    pub async fn update_family(
        &self,
        req: &HttpRequest,
        family_id: i64,
        update_data: UpdateFamilyRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_family(self, req, family_id, update_data).await
    }

    // 删除家庭
    pub async fn delete_family(
        &self,
        req: &HttpRequest,
        family_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_family(self, req, family_id).await
    }

    // 向家庭添加学生
    pub async fn add_student(
        &self,
        req: &HttpRequest,
        family_id: i64,
        student_data: AddStudentRequest,
    ) -> ActixResult<HttpResponse> {
        students::add_student(self, req, family_id, student_data).await
    }

    // 从家庭移除学生
    pub async fn remove_student(
        &self,
        req: &HttpRequest,
        family_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        students::remove_student(self, req, family_id, student_id).await
    }
}
