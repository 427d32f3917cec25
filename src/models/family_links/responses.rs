use serde::{Deserialize, Serialize};

use super::entities::FamilyLink;
use crate::models::PaginationInfo;

// 签发/轮换响应：token 明文只在这里出现一次
#[derive(Debug, Serialize, Deserialize)]
pub struct IssuedLinkResponse {
    #[serde(flatten)]
    pub link: FamilyLink,
    pub token: String,
}

// 查看 token 明文响应
#[derive(Debug, Serialize, Deserialize)]
pub struct RevealedLinkResponse {
    pub token: String,
}

// 链接列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub items: Vec<FamilyLink>,
    pub pagination: PaginationInfo,
}
