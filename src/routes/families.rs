use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::families::requests::{
    AddStudentRequest, CreateFamilyRequest, FamilyQueryParams, UpdateFamilyRequest,
};
use crate::services::FamilyService;
use crate::utils::{SafeFamilyIdI64, SafeStudentIdI64};

// 懒加载的全局 FAMILY_SERVICE 实例
static FAMILY_SERVICE: Lazy<FamilyService> = Lazy::new(FamilyService::new_lazy);

// HTTP处理程序
pub async fn list_families(
    req: HttpRequest,
    query: web::Query<FamilyQueryParams>,
) -> ActixResult<HttpResponse> {
    FAMILY_SERVICE.list_families(&req, query.into_inner()).await
}

pub async fn create_family(
    req: HttpRequest,
    family_data: web::Json<CreateFamilyRequest>,
) -> ActixResult<HttpResponse> {
    FAMILY_SERVICE
        .create_family(&req, family_data.into_inner())
        .await
}

pub async fn get_family(req: HttpRequest, family_id: SafeFamilyIdI64) -> ActixResult<HttpResponse> {
    FAMILY_SERVICE.get_family(&req, family_id.0).await
}

pub async fn update_family(
    req: HttpRequest,
    family_id: SafeFamilyIdI64,
    update_data: web::Json<UpdateFamilyRequest>,
) -> ActixResult<HttpResponse> {
    FAMILY_SERVICE
        .update_family(&req, family_id.0, update_data.into_inner())
        .await
}

pub async fn delete_family(
    req: HttpRequest,
    family_id: SafeFamilyIdI64,
) -> ActixResult<HttpResponse> {
    FAMILY_SERVICE.delete_family(&req, family_id.0).await
}

pub async fn add_student(
    req: HttpRequest,
    family_id: SafeFamilyIdI64,
    student_data: web::Json<AddStudentRequest>,
) -> ActixResult<HttpResponse> {
    FAMILY_SERVICE
        .add_student(&req, family_id.0, student_data.into_inner())
        .await
}

pub async fn remove_student(
    req: HttpRequest,
    family_id: SafeFamilyIdI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    FAMILY_SERVICE
        .remove_student(&req, family_id.0, student_id.0)
        .await
}

// 配置路由（教务管理面，整体挂管理密钥校验）
pub fn configure_families_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/families")
            .wrap(middlewares::RequireAdminKey)
            .service(
                web::resource("")
                    .route(web::get().to(list_families))
                    .route(web::post().to(create_family)),
            )
            .service(
                web::resource("/{family_id}")
                    .route(web::get().to(get_family))
                    .route(web::put().to(update_family))
                    .route(web::delete().to(delete_family)),
            )
            .service(web::resource("/{family_id}/students").route(web::post().to(add_student)))
            .service(
                web::resource("/{family_id}/students/{student_id}")
                    .route(web::delete().to(remove_student)),
            ),
    );
}
