/*!
 * 教务接口认证中间件
 *
 * 家庭/链接的管理接口只对内部教务系统开放，调用方在请求头携带
 * `X-Admin-Key: <key>`，与 `admin.api_key` 配置比对（常数时间比较）。
 *
 * 密钥未配置时所有管理请求一律拒绝。
 */

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use subtle::ConstantTimeEq;
use tracing::info;

const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

#[derive(Clone)]
pub struct RequireAdminKey;

// 辅助函数：创建错误响应
fn create_error_response(status: StatusCode, message: &str) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message)),
    }
}

// 辅助函数：校验管理密钥
fn validate_admin_key(req: &ServiceRequest) -> Result<(), String> {
    let configured = &AppConfig::get().admin.api_key;
    if configured.is_empty() {
        return Err("Admin API key is not configured".to_string());
    }

    let presented = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| format!("Missing {ADMIN_KEY_HEADER} header"))?;

    if presented.as_bytes().ct_eq(configured.as_bytes()).into() {
        Ok(())
    } else {
        Err("Invalid admin key".to_string())
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAdminKey
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAdminKeyMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAdminKeyMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAdminKeyMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAdminKeyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, "").map_into_right_body(),
                ));
            }

            match validate_admin_key(&req) {
                Ok(()) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "Admin key authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}
