use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::FamilyService;
use crate::models::families::requests::{FamilyListQuery, FamilyQueryParams};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_families(
    service: &FamilyService,
    request: &HttpRequest,
    query: FamilyQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = FamilyListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
    };

    match storage.list_families_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Families retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list families: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while listing families",
                )),
            )
        }
    }
}
