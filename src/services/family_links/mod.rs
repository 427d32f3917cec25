pub mod issue;
pub mod list;
pub mod reveal;
pub mod revoke;
pub mod rotate;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::debug;

use crate::cache::ObjectCache;
use crate::models::family_links::entities::FamilyLink;
use crate::models::family_links::requests::{IssueLinkRequest, LinkQueryParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::link_token::LinkTokenCodec;

pub struct FamilyLinkService {
    storage: Option<Arc<dyn Storage>>,
}

impl FamilyLinkService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_codec(&self, request: &HttpRequest) -> Arc<LinkTokenCodec> {
        request
            .app_data::<actix_web::web::Data<Arc<LinkTokenCodec>>>()
            .expect("LinkTokenCodec not found in app data")
            .get_ref()
            .clone()
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone()
    }

    // 为家庭签发新链接
    pub async fn issue_link(
        &self,
        req: &HttpRequest,
        family_id: i64,
        issue_data: IssueLinkRequest,
    ) -> ActixResult<HttpResponse> {
        issue::issue_link(self, req, family_id, issue_data).await
    }

    // 列出家庭的链接
    pub async fn list_links(
        &self,
        req: &HttpRequest,
        family_id: i64,
        query: LinkQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_links(self, req, family_id, query).await
    }

    // 查看链接 token 明文
    pub async fn reveal_link(
        &self,
        req: &HttpRequest,
        family_id: i64,
        link_id: i64,
    ) -> ActixResult<HttpResponse> {
        reveal::reveal_link(self, req, family_id, link_id).await
    }

    // 轮换链接 token
    pub async fn rotate_link(
        &self,
        req: &HttpRequest,
        family_id: i64,
        link_id: i64,
    ) -> ActixResult<HttpResponse> {
        rotate::rotate_link(self, req, family_id, link_id).await
    }

    // 吊销链接
    pub async fn revoke_link(
        &self,
        req: &HttpRequest,
        family_id: i64,
        link_id: i64,
    ) -> ActixResult<HttpResponse> {
        revoke::revoke_link(self, req, family_id, link_id).await
    }
}

/// 取出链接并校验家庭归属；归属不符时按不存在处理
pub(crate) async fn load_owned_link(
    storage: &Arc<dyn Storage>,
    family_id: i64,
    link_id: i64,
) -> Result<FamilyLink, HttpResponse> {
    match storage.get_family_link_by_id(link_id).await {
        Ok(Some(link)) if link.family_id == family_id => Ok(link),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::LinkNotFound,
            "Link not found",
        ))),
        Err(e) => {
            tracing::error!("Failed to get link {}: {}", link_id, e);
            Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Internal server error while fetching link",
                )),
            )
        }
    }
}

/// 清掉链接的解析缓存（吊销/轮换后旧 token 必须立即失效）
pub(crate) async fn invalidate_link_cache(
    storage: &Arc<dyn Storage>,
    cache: &Arc<dyn ObjectCache>,
    link_id: i64,
) {
    match storage.get_link_index_by_id(link_id).await {
        Ok(Some(index)) => {
            cache.remove(&link_cache_key(&index)).await;
            debug!("Invalidated resolution cache for link {}", link_id);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!("Failed to load index of link {} for cache cleanup: {}", link_id, e);
        }
    }
}

/// 链接解析缓存的键
pub(crate) fn link_cache_key(index: &str) -> String {
    format!("link:{index}")
}
