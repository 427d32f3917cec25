//! 路径参数安全提取器
//!
//! 将路径中的 ID 解析为正整数，非法输入在进入处理程序前即被拒绝，
//! 并返回统一的 ApiResponse 错误结构。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

macro_rules! safe_i64_path_param {
    ($name:ident, $param:literal) => {
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                let raw = req.match_info().query($param);
                match raw.parse::<i64>() {
                    Ok(id) if id > 0 => ready(Ok($name(id))),
                    _ => {
                        let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::BadRequest,
                            concat!("Invalid ", $param, ": must be a positive integer"),
                        ));
                        ready(Err(InternalError::from_response(
                            concat!("Invalid ", $param),
                            response,
                        )
                        .into()))
                    }
                }
            }
        }
    };
}

safe_i64_path_param!(SafeFamilyIdI64, "family_id");
safe_i64_path_param!(SafeLinkIdI64, "link_id");
safe_i64_path_param!(SafeStudentIdI64, "student_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id_is_extracted() {
        let req = TestRequest::default()
            .param("family_id", "42")
            .to_http_request();
        let result = SafeFamilyIdI64::from_request(&req, &mut Payload::None).await;
        assert_eq!(result.unwrap().0, 42);
    }

    #[actix_web::test]
    async fn test_non_numeric_id_is_rejected() {
        let req = TestRequest::default()
            .param("family_id", "abc")
            .to_http_request();
        assert!(
            SafeFamilyIdI64::from_request(&req, &mut Payload::None)
                .await
                .is_err()
        );
    }

    #[actix_web::test]
    async fn test_non_positive_id_is_rejected() {
        let req = TestRequest::default()
            .param("link_id", "0")
            .to_http_request();
        assert!(
            SafeLinkIdI64::from_request(&req, &mut Payload::None)
                .await
                .is_err()
        );
    }
}
