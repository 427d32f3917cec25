use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::PortalService;
use crate::middlewares::RequireLinkToken;
use crate::models::portal::responses::PortalOverviewResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn overview(service: &PortalService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    // 中间件保证扩展里有解析结果
    let Some(resolved) = RequireLinkToken::extract_resolved(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Link authentication required",
        )));
    };

    let storage = service.get_storage(request);

    match storage.list_students_by_family(resolved.family.id).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PortalOverviewResponse::from_parts(resolved.family, students, &resolved.link),
            "Overview retrieved successfully",
        ))),
        Err(e) => {
            error!(
                "Failed to load students for family {}: {}",
                resolved.family.id, e
            );
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while loading overview",
                )),
            )
        }
    }
}
