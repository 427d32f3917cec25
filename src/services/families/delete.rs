use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, warn};

use super::FamilyService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_family(
    service: &FamilyService,
    request: &HttpRequest,
    family_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_family(family_id).await {
        Ok(true) => {
            // 学生与链接由外键级联删除
            warn!("Family {} deleted with its students and links", family_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Family deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FamilyNotFound,
            "Family not found",
        ))),
        Err(e) => {
            error!("Failed to delete family {}: {}", family_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while deleting family",
                )),
            )
        }
    }
}
