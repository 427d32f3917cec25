use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::FamilyService;
use crate::models::families::responses::FamilyDetailResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_family(
    service: &FamilyService,
    request: &HttpRequest,
    family_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let family = match storage.get_family_by_id(family_id).await {
        Ok(Some(family)) => family,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FamilyNotFound,
                "Family not found",
            )));
        }
        Err(e) => {
            error!("Failed to get family {}: {}", family_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while fetching family",
                )),
            );
        }
    };

    match storage.list_students_by_family(family_id).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FamilyDetailResponse { family, students },
            "Family retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list students of family {}: {}", family_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while fetching students",
                )),
            )
        }
    }
}
