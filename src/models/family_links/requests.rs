use crate::models::common::pagination::PaginationQuery;
use serde::Deserialize;

// 签发链接请求
//
// # expires_in_days 字段说明
// - 不填写：使用 link.default_expiry_days 配置（0 表示不过期）
// - 填写 0：显式不过期
// - 填写正数：从签发时刻起的有效天数
#[derive(Debug, Deserialize)]
pub struct IssueLinkRequest {
    pub label: Option<String>,
    pub expires_in_days: Option<i64>,
}

// 链接列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct LinkQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<super::entities::LinkStatus>,
}

// 链接列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct LinkListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<super::entities::LinkStatus>,
}
