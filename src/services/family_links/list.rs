use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::FamilyLinkService;
use crate::models::family_links::requests::{LinkListQuery, LinkQueryParams};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_links(
    service: &FamilyLinkService,
    request: &HttpRequest,
    family_id: i64,
    query: LinkQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_family_by_id(family_id).await {
        Ok(Some(_)) => {}
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
    }

    let list_query = LinkListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        status: query.status,
    };

    match storage
        .list_family_links_with_pagination(family_id, list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Links retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list links of family {}: {}", family_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while listing links",
                )),
            )
        }
    }
}
