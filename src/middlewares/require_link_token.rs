/*!
 * 家庭链接认证中间件
 *
 * 家长门户的唯一认证方式：请求携带链接 token
 * （`Authorization: Bearer <token>` 或查询参数 `?token=`）。
 *
 * ## 解析流程
 *
 * 1. 取出 token 文本，计算 HMAC 查找索引（格式非法直接 401，不触达数据库）
 * 2. 先查缓存（key 为 `link:{index}`），未命中再按索引等值查询数据库
 * 3. 校验链接状态与过期时间；通过后把 [`ResolvedLink`] 放入请求扩展
 * 4. 命中数据库时更新 last_used_at 并写入缓存；吊销/轮换会主动清缓存，
 *    因此缓存命中不会复活已失效的链接
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::models::family_links::entities::FamilyLink;
use crate::models::{ApiResponse, ErrorCode, families::entities::Family};
use crate::storage::Storage;
use crate::utils::link_token::LinkTokenCodec;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde::{Deserialize, Serialize};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";
const TOKEN_QUERY_PARAM: &str = "token";

/// 解析成功的链接：链接元数据 + 所属家庭
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub link: FamilyLink,
    pub family: Family,
}

#[derive(Clone)]
pub struct RequireLinkToken;

// 辅助函数：创建错误响应
fn create_error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::error_empty(code, message)),
    }
}

// 辅助函数：从请求中取出 token 文本
fn extract_token_text(req: &ServiceRequest) -> Option<String> {
    if let Some(token) = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
    {
        return Some(token.to_string());
    }

    // 查询参数兜底（token 是 base64url，不需要百分号解码）
    req.query_string().split('&').find_map(|pair| {
        pair.strip_prefix("token=")
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    })
}

// 辅助函数：解析并校验链接 token
async fn extract_and_resolve_link(
    req: &ServiceRequest,
) -> Result<ResolvedLink, (ErrorCode, String)> {
    let token = extract_token_text(req).ok_or((
        ErrorCode::Unauthorized,
        format!("Missing {AUTHORIZATION_HEADER} header or {TOKEN_QUERY_PARAM} parameter"),
    ))?;

    let codec = req
        .app_data::<actix_web::web::Data<Arc<LinkTokenCodec>>>()
        .expect("LinkTokenCodec not found in app data")
        .get_ref()
        .clone();

    let index = codec.index_of(&token).map_err(|err| {
        info!("Link token validation failed: {}", err);
        (ErrorCode::LinkTokenInvalid, "Invalid link token".to_string())
    })?;

    let now = chrono::Utc::now();

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();

    let cache_key = format!("link:{index}");

    // 从缓存中获取已解析的链接
    if let CacheResult::Found(json) = cache.get_raw(&cache_key).await {
        match serde_json::from_str::<ResolvedLink>(&json) {
            Ok(resolved) if resolved.link.is_usable_at(now) => return Ok(resolved),
            Ok(_) => {
                // 缓存窗口内过期，走数据库重新判定
                cache.remove(&cache_key).await;
            }
            Err(_) => {
                cache.remove(&cache_key).await;
                info!("Failed to deserialize resolved link from cache");
            }
        }
    }

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    let link = storage
        .get_family_link_by_index(&index)
        .await
        .map_err(|e| {
            info!("Failed to resolve link token: {}", e);
            (
                ErrorCode::InternalServerError,
                "Failed to resolve link".to_string(),
            )
        })?
        .ok_or((ErrorCode::LinkTokenInvalid, "Unknown link token".to_string()))?;

    if !link.is_usable_at(now) {
        let (code, msg) = if link.revoked_at.is_some() {
            (ErrorCode::LinkRevoked, "Link has been revoked")
        } else {
            (ErrorCode::LinkExpired, "Link has expired")
        };
        return Err((code, msg.to_string()));
    }

    let family = storage
        .get_family_by_id(link.family_id)
        .await
        .map_err(|e| {
            info!("Failed to load family for link {}: {}", link.id, e);
            (
                ErrorCode::InternalServerError,
                "Failed to resolve link".to_string(),
            )
        })?
        .ok_or((ErrorCode::LinkTokenInvalid, "Unknown link token".to_string()))?;

    // 尽力而为：缓存窗口内至多更新一次使用时间
    if let Err(e) = storage.touch_family_link(link.id).await {
        debug!("Failed to touch link {}: {}", link.id, e);
    }

    let resolved = ResolvedLink { link, family };

    // 将解析结果存入缓存
    if let Ok(json) = serde_json::to_string(&resolved) {
        cache.insert_raw(cache_key, json).await;
    }

    Ok(resolved)
}

impl<S, B> Transform<S, ServiceRequest> for RequireLinkToken
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireLinkTokenMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireLinkTokenMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireLinkTokenMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireLinkTokenMiddleware<S>
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
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_resolve_link(&req).await {
                Ok(resolved) => {
                    debug!(
                        "Link authentication successful for family {}",
                        resolved.family.id
                    );
                    req.extensions_mut().insert(resolved);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err((code, err)) => {
                    info!(
                        "Link authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    let status = if code == ErrorCode::InternalServerError {
                        StatusCode::INTERNAL_SERVER_ERROR
                    } else {
                        StatusCode::UNAUTHORIZED
                    };
                    Ok(req.into_response(
                        create_error_response(status, code, &err).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取解析结果
impl RequireLinkToken {
    /// 从请求扩展中提取解析后的链接
    /// 此函数应该在应用了RequireLinkToken中间件的路由处理程序中使用
    pub fn extract_resolved(req: &actix_web::HttpRequest) -> Option<ResolvedLink> {
        req.extensions().get::<ResolvedLink>().cloned()
    }

    /// 从请求扩展中提取家庭ID
    pub fn extract_family_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions()
            .get::<ResolvedLink>()
            .map(|resolved| resolved.family.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result;
    use crate::models::families::requests::{
        AddStudentRequest, CreateFamilyRequest, FamilyListQuery, UpdateFamilyRequest,
    };
    use crate::models::families::responses::FamilyListResponse;
    use crate::models::families::entities::Student;
    use crate::models::family_links::entities::LinkStatus;
    use crate::models::family_links::requests::LinkListQuery;
    use crate::models::family_links::responses::LinkListResponse;
    use crate::services::family_links::invalidate_link_cache;
    use crate::storage::NewLinkRecord;
    use crate::utils::link_token::SealedToken;
    use actix_web::{App, HttpRequest, test, web};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 单链接的内存存储，吊销直接改内部状态
    struct StubStorage {
        link: Mutex<FamilyLink>,
        index: String,
        family: Family,
    }

    impl StubStorage {
        fn revoke(&self) {
            let mut link = self.link.lock().unwrap();
            link.status = LinkStatus::Revoked;
            link.revoked_at = Some(chrono::Utc::now());
        }
    }

    #[async_trait::async_trait]
    impl Storage for StubStorage {
        async fn create_family(&self, _family: CreateFamilyRequest) -> Result<Family> {
            unimplemented!()
        }

        async fn get_family_by_id(&self, id: i64) -> Result<Option<Family>> {
            Ok((id == self.family.id).then(|| self.family.clone()))
        }

        async fn list_families_with_pagination(
            &self,
            _query: FamilyListQuery,
        ) -> Result<FamilyListResponse> {
            unimplemented!()
        }

        async fn update_family(
            &self,
            _id: i64,
            _update: UpdateFamilyRequest,
        ) -> Result<Option<Family>> {
            unimplemented!()
        }

        async fn delete_family(&self, _id: i64) -> Result<bool> {
            unimplemented!()
        }

        async fn count_families(&self) -> Result<u64> {
            unimplemented!()
        }

        async fn add_student(
            &self,
            _family_id: i64,
            _student: AddStudentRequest,
        ) -> Result<Student> {
            unimplemented!()
        }

        async fn list_students_by_family(&self, _family_id: i64) -> Result<Vec<Student>> {
            unimplemented!()
        }

        async fn remove_student(&self, _family_id: i64, _student_id: i64) -> Result<bool> {
            unimplemented!()
        }

        async fn create_family_link(&self, _record: NewLinkRecord) -> Result<FamilyLink> {
            unimplemented!()
        }

        async fn get_family_link_by_id(&self, link_id: i64) -> Result<Option<FamilyLink>> {
            let link = self.link.lock().unwrap();
            Ok((link.id == link_id).then(|| link.clone()))
        }

        async fn get_family_link_by_index(&self, token_index: &str) -> Result<Option<FamilyLink>> {
            let link = self.link.lock().unwrap();
            Ok((self.index == token_index).then(|| link.clone()))
        }

        async fn get_link_cipher_by_id(&self, _link_id: i64) -> Result<Option<String>> {
            unimplemented!()
        }

        async fn get_link_index_by_id(&self, link_id: i64) -> Result<Option<String>> {
            let link = self.link.lock().unwrap();
            Ok((link.id == link_id).then(|| self.index.clone()))
        }

        async fn list_family_links_with_pagination(
            &self,
            _family_id: i64,
            _query: LinkListQuery,
        ) -> Result<LinkListResponse> {
            unimplemented!()
        }

        async fn rotate_family_link(
            &self,
            _link_id: i64,
            _sealed: SealedToken,
        ) -> Result<Option<FamilyLink>> {
            unimplemented!()
        }

        async fn revoke_family_link(&self, _link_id: i64) -> Result<Option<FamilyLink>> {
            unimplemented!()
        }

        async fn touch_family_link(&self, link_id: i64) -> Result<bool> {
            let mut link = self.link.lock().unwrap();
            if link.id == link_id {
                link.last_used_at = Some(chrono::Utc::now());
                return Ok(true);
            }
            Ok(false)
        }
    }

    /// 无淘汰的内存缓存
    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait::async_trait]
    impl ObjectCache for MapCache {
        async fn get_raw(&self, key: &str) -> CacheResult<String> {
            match self.entries.lock().unwrap().get(key) {
                Some(value) => CacheResult::Found(value.clone()),
                None => CacheResult::NotFound,
            }
        }

        async fn insert_raw(&self, key: String, value: String) {
            self.entries.lock().unwrap().insert(key, value);
        }

        async fn remove(&self, key: &str) {
            self.entries.lock().unwrap().remove(key);
        }

        async fn invalidate_all(&self) {
            self.entries.lock().unwrap().clear();
        }
    }

    fn test_codec() -> LinkTokenCodec {
        let enc = STANDARD.encode([0x01u8; 32]);
        let idx = STANDARD.encode([0x02u8; 32]);
        LinkTokenCodec::from_parts(&enc, &idx).unwrap()
    }

    fn stub_storage(index: String) -> StubStorage {
        let now = chrono::Utc::now();
        StubStorage {
            link: Mutex::new(FamilyLink {
                id: 7,
                family_id: 3,
                label: None,
                status: LinkStatus::Active,
                expires_at: None,
                rotated_at: None,
                revoked_at: None,
                last_used_at: None,
                created_at: now,
                updated_at: now,
            }),
            index,
            family: Family {
                id: 3,
                family_name: "小明同学家庭".to_string(),
                contact_email: None,
                notes: None,
                created_at: now,
                updated_at: now,
            },
        }
    }

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match RequireLinkToken::extract_family_id(&req) {
            Some(family_id) => HttpResponse::Ok().json(ApiResponse::success(family_id, "ok")),
            None => HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::InternalServerError, "no link")),
        }
    }

    #[actix_web::test]
    async fn test_resolution_cache_cleared_on_revocation() {
        let codec = Arc::new(test_codec());
        let token = LinkTokenCodec::generate_token();
        let index = codec.index_of(&token).unwrap();

        let stub = Arc::new(stub_storage(index));
        let storage: Arc<dyn Storage> = stub.clone();
        let cache: Arc<dyn ObjectCache> = Arc::new(MapCache::default());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(cache.clone()))
                .app_data(web::Data::new(codec.clone()))
                .service(
                    web::scope("/portal")
                        .wrap(RequireLinkToken)
                        .route("/whoami", web::get().to(whoami)),
                ),
        )
        .await;

        // 首次解析命中数据库并写入缓存
        let req = test::TestRequest::get()
            .uri("/portal/whoami")
            .insert_header((AUTHORIZATION_HEADER, format!("{BEARER_PREFIX}{token}")))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"], 3);

        // 只改存储不清缓存：缓存窗口内旧结果仍然有效
        stub.revoke();
        let req = test::TestRequest::get()
            .uri("/portal/whoami")
            .insert_header((AUTHORIZATION_HEADER, format!("{BEARER_PREFIX}{token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // 吊销路径会清缓存，旧 token 立即被拒
        invalidate_link_cache(&storage, &cache, 7).await;
        let req = test::TestRequest::get()
            .uri("/portal/whoami")
            .insert_header((AUTHORIZATION_HEADER, format!("{BEARER_PREFIX}{token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::LinkRevoked as i32);
    }

    #[actix_web::test]
    async fn test_token_accepted_from_query_parameter() {
        let codec = Arc::new(test_codec());
        let token = LinkTokenCodec::generate_token();
        let index = codec.index_of(&token).unwrap();

        let storage: Arc<dyn Storage> = Arc::new(stub_storage(index));
        let cache: Arc<dyn ObjectCache> = Arc::new(MapCache::default());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(cache))
                .app_data(web::Data::new(codec))
                .service(
                    web::scope("/portal")
                        .wrap(RequireLinkToken)
                        .route("/whoami", web::get().to(whoami)),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/portal/whoami?token={token}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/portal/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
