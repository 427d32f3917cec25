use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::family_links::requests::{IssueLinkRequest, LinkQueryParams};
use crate::services::FamilyLinkService;
use crate::utils::{SafeFamilyIdI64, SafeLinkIdI64};

// 懒加载的全局 FAMILY_LINK_SERVICE 实例
static FAMILY_LINK_SERVICE: Lazy<FamilyLinkService> = Lazy::new(FamilyLinkService::new_lazy);

// HTTP处理程序
pub async fn issue_link(
    req: HttpRequest,
    family_id: SafeFamilyIdI64,
    issue_data: web::Json<IssueLinkRequest>,
) -> ActixResult<HttpResponse> {
    FAMILY_LINK_SERVICE
        .issue_link(&req, family_id.0, issue_data.into_inner())
        .await
}

pub async fn list_links(
    req: HttpRequest,
    family_id: SafeFamilyIdI64,
    query: web::Query<LinkQueryParams>,
) -> ActixResult<HttpResponse> {
    FAMILY_LINK_SERVICE
        .list_links(&req, family_id.0, query.into_inner())
        .await
}

pub async fn reveal_link(
    req: HttpRequest,
    family_id: SafeFamilyIdI64,
    link_id: SafeLinkIdI64,
) -> ActixResult<HttpResponse> {
    FAMILY_LINK_SERVICE
        .reveal_link(&req, family_id.0, link_id.0)
        .await
}

pub async fn rotate_link(
    req: HttpRequest,
    family_id: SafeFamilyIdI64,
    link_id: SafeLinkIdI64,
) -> ActixResult<HttpResponse> {
    FAMILY_LINK_SERVICE
        .rotate_link(&req, family_id.0, link_id.0)
        .await
}

pub async fn revoke_link(
    req: HttpRequest,
    family_id: SafeFamilyIdI64,
    link_id: SafeLinkIdI64,
) -> ActixResult<HttpResponse> {
    FAMILY_LINK_SERVICE
        .revoke_link(&req, family_id.0, link_id.0)
        .await
}

// 配置路由（链接生命周期，教务管理面）
pub fn configure_family_links_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/families/{family_id}/links")
            .wrap(middlewares::RequireAdminKey)
            .service(
                web::resource("")
                    .route(web::get().to(list_links))
                    .route(web::post().to(issue_link)),
            )
            .service(web::resource("/{link_id}/token").route(web::get().to(reveal_link)))
            .service(web::resource("/{link_id}/rotate").route(web::post().to(rotate_link)))
            .service(web::resource("/{link_id}/revoke").route(web::post().to(revoke_link))),
    );
}
