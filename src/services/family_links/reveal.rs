use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{FamilyLinkService, load_owned_link};
use crate::models::family_links::entities::LinkStatus;
use crate::models::family_links::responses::RevealedLinkResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn reveal_link(
    service: &FamilyLinkService,
    request: &HttpRequest,
    family_id: i64,
    link_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let codec = service.get_codec(request);

    let link = match load_owned_link(&storage, family_id, link_id).await {
        Ok(link) => link,
        Err(response) => return Ok(response),
    };

    // 已吊销的链接没有可展示的 token
    if link.status != LinkStatus::Active {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::LinkRevoked,
            "Link has been revoked",
        )));
    }

    let cipher = match storage.get_link_cipher_by_id(link_id).await {
        Ok(Some(cipher)) => cipher,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::LinkNotFound,
                "Link not found",
            )));
        }
        Err(e) => {
            error!("Failed to load cipher for link {}: {}", link_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while revealing link",
                )),
            );
        }
    };

    match codec.open(&cipher) {
        Ok(token) => {
            info!("Revealed token of link {} for family {}", link_id, family_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                RevealedLinkResponse { token },
                "Link token revealed",
            )))
        }
        Err(e) => {
            // 密钥轮换后旧密文将无法解开,这类记录只能重新轮换
            error!("Failed to decrypt cipher of link {}: {}", link_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Stored token cannot be decrypted, rotate the link",
                )),
            )
        }
    }
}
