use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::{FamilyLinkService, link_cache_key, load_owned_link};
use crate::models::family_links::entities::LinkStatus;
use crate::models::family_links::responses::IssuedLinkResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::link_token::LinkTokenCodec;

pub async fn rotate_link(
    service: &FamilyLinkService,
    request: &HttpRequest,
    family_id: i64,
    link_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let codec = service.get_codec(request);
    let cache = service.get_cache(request);

    let link = match load_owned_link(&storage, family_id, link_id).await {
        Ok(link) => link,
        Err(response) => return Ok(response),
    };

    // 吊销是终态,轮换只对在用链接有意义
    if link.status != LinkStatus::Active {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::LinkRevoked,
            "Cannot rotate a revoked link",
        )));
    }

    // 先取出旧 token 的缓存键,轮换落库后再清
    let old_cache_key = match storage.get_link_index_by_id(link_id).await {
        Ok(Some(index)) => Some(link_cache_key(&index)),
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to load old index of link {}: {}", link_id, e);
            None
        }
    };

    // 唯一索引撞车概率可忽略，但撞上时重试一次即可恢复
    let mut retried = false;
    loop {
        let token = LinkTokenCodec::generate_token();
        let sealed = match codec.seal(&token) {
            Ok(sealed) => sealed,
            Err(e) => {
                error!("Failed to seal rotated token for link {}: {}", link_id, e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::LinkIssueFailed,
                        "Failed to rotate link",
                    )),
                );
            }
        };

        match storage.rotate_family_link(link_id, sealed).await {
            Ok(Some(link)) => {
                if let Some(ref key) = old_cache_key {
                    cache.remove(key).await;
                }
                info!("Rotated link {} of family {}", link_id, family_id);
                return Ok(HttpResponse::Ok().json(ApiResponse::success(
                    IssuedLinkResponse { link, token },
                    "Link rotated successfully",
                )));
            }
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::LinkNotFound,
                    "Link not found",
                )));
            }
            Err(e) if e.to_string().contains("UNIQUE constraint failed") && !retried => {
                warn!("Link index collision while rotating link {}, retrying", link_id);
                retried = true;
            }
            Err(e) => {
                error!("Failed to rotate link {}: {}", link_id, e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        "Internal server error while rotating link",
                    )),
                );
            }
        }
    }
}
