use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::FamilyService;
use crate::models::families::requests::CreateFamilyRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_email, validate_family_name};

pub async fn create_family(
    service: &FamilyService,
    request: &HttpRequest,
    family_data: CreateFamilyRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 输入校验
    if let Err(msg) = validate_family_name(&family_data.family_name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    if let Some(ref email) = family_data.contact_email
        && let Err(msg) = validate_email(email)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    // 创建家庭
    match storage.create_family(family_data).await {
        Ok(family) => {
            info!("Family {} created successfully", family.family_name);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(family, "Family created successfully")))
        }
        Err(e) => Ok(handle_family_create_error(&e.to_string())),
    }
}

/// 错误响应辅助函数
fn handle_family_create_error(e: &str) -> HttpResponse {
    let msg = format!("Family creation failed: {e}");
    error!("{}", msg);
    if msg.contains("UNIQUE constraint failed") {
        HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::FamilyAlreadyExists,
            "Family name already exists",
        ))
    } else {
        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            msg,
        ))
    }
}
