use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use super::FamilyLinkService;
use crate::config::AppConfig;
use crate::models::family_links::requests::IssueLinkRequest;
use crate::models::family_links::responses::IssuedLinkResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::NewLinkRecord;
use crate::utils::link_token::LinkTokenCodec;

pub async fn issue_link(
    service: &FamilyLinkService,
    request: &HttpRequest,
    family_id: i64,
    issue_data: IssueLinkRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let codec = service.get_codec(request);

    if let Some(ref label) = issue_data.label
        && let Err(msg) = crate::utils::validate::validate_link_label(label)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    // 过期策略：未填走配置默认值，0 表示不过期
    let days = issue_data
        .expires_in_days
        .unwrap_or(AppConfig::get().link.default_expiry_days);
    let expires_at = match expiry_from_days(days, Utc::now()) {
        Ok(expires_at) => expires_at,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
    };

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

    // 唯一索引撞车概率可忽略，但撞上时重试一次即可恢复
    let mut retried = false;
    loop {
        let token = LinkTokenCodec::generate_token();
        let sealed = match codec.seal(&token) {
            Ok(sealed) => sealed,
            Err(e) => {
                error!("Failed to seal link token: {}", e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::LinkIssueFailed,
                        "Failed to issue link",
                    )),
                );
            }
        };

        let record = NewLinkRecord {
            family_id,
            label: issue_data.label.clone(),
            sealed,
            expires_at,
        };

        match storage.create_family_link(record).await {
            Ok(link) => {
                info!("Issued link {} for family {}", link.id, family_id);
                return Ok(HttpResponse::Created().json(ApiResponse::success(
                    IssuedLinkResponse { link, token },
                    "Link issued successfully",
                )));
            }
            Err(e) if e.to_string().contains("UNIQUE constraint failed") && !retried => {
                warn!("Link index collision for family {}, retrying", family_id);
                retried = true;
            }
            Err(e) => {
                error!("Failed to issue link for family {}: {}", family_id, e);
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::LinkIssueFailed,
                        "Failed to issue link",
                    )),
                );
            }
        }
    }
}

/// 过期天数上限（约 100 年），再大视为非法输入
const MAX_EXPIRY_DAYS: i64 = 36_500;

/// 天数 → 过期时间戳；0 表示不过期，负数与溢出范围一律拒绝
fn expiry_from_days(days: i64, now: DateTime<Utc>) -> Result<Option<i64>, &'static str> {
    if days < 0 {
        return Err("expires_in_days must not be negative");
    }
    if days == 0 {
        return Ok(None);
    }
    if days > MAX_EXPIRY_DAYS {
        return Err("expires_in_days is too large");
    }
    let delta = Duration::try_days(days).ok_or("expires_in_days is too large")?;
    let when = now
        .checked_add_signed(delta)
        .ok_or("expires_in_days is too large")?;
    Ok(Some(when.timestamp()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_days_means_no_expiry() {
        assert_eq!(expiry_from_days(0, Utc::now()).unwrap(), None);
    }

    #[test]
    fn test_positive_days_yield_future_timestamp() {
        let now = Utc::now();
        let expires = expiry_from_days(7, now).unwrap().unwrap();
        assert_eq!(expires, (now + Duration::days(7)).timestamp());
    }

    #[test]
    fn test_negative_days_rejected() {
        assert!(expiry_from_days(-1, Utc::now()).is_err());
    }

    #[test]
    fn test_huge_days_rejected_without_panic() {
        // i64 天数远超 TimeDelta 可表示范围,必须走校验而不是 panic
        assert!(expiry_from_days(200_000_000_000, Utc::now()).is_err());
        assert!(expiry_from_days(i64::MAX, Utc::now()).is_err());
        assert!(expiry_from_days(MAX_EXPIRY_DAYS + 1, Utc::now()).is_err());
    }
}
