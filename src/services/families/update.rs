use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::FamilyService;
use crate::models::families::requests::UpdateFamilyRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_email, validate_family_name};

pub async fn update_family(
    service: &FamilyService,
    request: &HttpRequest,
    family_id: i64,
    update_data: UpdateFamilyRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 输入校验
    if let Some(ref name) = update_data.family_name
        && let Err(msg) = validate_family_name(name)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    if let Some(Some(ref email)) = update_data.contact_email
        && let Err(msg) = validate_email(email)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    match storage.update_family(family_id, update_data).await {
        Ok(Some(family)) => {
            info!("Family {} updated successfully", family_id);
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(family, "Family updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FamilyNotFound,
            "Family not found",
        ))),
        Err(e) => {
            let msg = format!("Family update failed: {e}");
            error!("{}", msg);
            if msg.contains("UNIQUE constraint failed") {
                Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::FamilyAlreadyExists,
                    "Family name already exists",
                )))
            } else {
                Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        msg,
                    )),
                )
            }
        }
    }
}
