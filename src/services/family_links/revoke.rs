use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{FamilyLinkService, invalidate_link_cache, load_owned_link};
use crate::models::family_links::entities::LinkStatus;
use crate::models::{ApiResponse, ErrorCode};

pub async fn revoke_link(
    service: &FamilyLinkService,
    request: &HttpRequest,
    family_id: i64,
    link_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);

    let link = match load_owned_link(&storage, family_id, link_id).await {
        Ok(link) => link,
        Err(response) => return Ok(response),
    };

    // 吊销是幂等的终态操作
    if link.status == LinkStatus::Revoked {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            link,
            "Link was already revoked",
        )));
    }

    match storage.revoke_family_link(link_id).await {
        Ok(Some(link)) => {
            invalidate_link_cache(&storage, &cache, link_id).await;
            info!("Revoked link {} of family {}", link_id, family_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                link,
                "Link revoked successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::LinkNotFound,
            "Link not found",
        ))),
        Err(e) => {
            error!("Failed to revoke link {}: {}", link_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while revoking link",
                )),
            )
        }
    }
}
