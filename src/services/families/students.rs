use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::FamilyService;
use crate::models::families::requests::AddStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_student_name;

pub async fn add_student(
    service: &FamilyService,
    request: &HttpRequest,
    family_id: i64,
    student_data: AddStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_student_name(&student_data.display_name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    // 家庭必须存在,外键错误信息对调用方不友好
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

    match storage.add_student(family_id, student_data).await {
        Ok(student) => {
            info!(
                "Student {} added to family {}",
                student.display_name, family_id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(student, "Student added successfully")))
        }
        Err(e) => {
            error!("Failed to add student to family {}: {}", family_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while adding student",
                )),
            )
        }
    }
}

pub async fn remove_student(
    service: &FamilyService,
    request: &HttpRequest,
    family_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.remove_student(family_id, student_id).await {
        Ok(true) => {
            info!("Student {} removed from family {}", student_id, family_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Student removed successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found in this family",
        ))),
        Err(e) => {
            error!(
                "Failed to remove student {} from family {}: {}",
                student_id, family_id, e
            );
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while removing student",
                )),
            )
        }
    }
}
