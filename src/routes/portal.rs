use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::PortalService;

// 懒加载的全局 PORTAL_SERVICE 实例
static PORTAL_SERVICE: Lazy<PortalService> = Lazy::new(PortalService::new_lazy);

pub async fn overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    PORTAL_SERVICE.overview(&req).await
}

// 配置路由（家长门户，链接 token 认证）
pub fn configure_portal_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/portal")
            .wrap(middlewares::RequireLinkToken)
            .service(web::resource("/overview").route(web::get().to(overview))),
    );
}
