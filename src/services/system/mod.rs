use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::config::AppConfig;
use crate::models::AppStartTime;
use crate::models::system::responses::StatusResponse;
use crate::models::ApiResponse;

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    // 系统运行状态
    pub async fn status(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let config = AppConfig::get();
        let start_time = request
            .app_data::<web::Data<AppStartTime>>()
            .map(|data| data.start_datetime)
            .unwrap_or_else(chrono::Utc::now);

        let response = StatusResponse {
            system_name: config.app.system_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: config.app.environment.clone(),
            start_time,
            uptime_seconds: (chrono::Utc::now() - start_time).num_seconds(),
        };

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "System status retrieved successfully",
        )))
    }
}
