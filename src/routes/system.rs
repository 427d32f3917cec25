use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::SystemService;

// 懒加载的全局 SYSTEM_SERVICE 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn status(req: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.status(&req).await
}

// 配置路由（无需认证）
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/system").service(web::resource("/status").route(web::get().to(status))));
}
