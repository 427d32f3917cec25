use serde::{Deserialize, Serialize};

use super::entities::{Family, Student};
use crate::models::PaginationInfo;

// 家庭列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct FamilyListResponse {
    pub items: Vec<Family>,
    pub pagination: PaginationInfo,
}

// 家庭详情响应（含学生）
#[derive(Debug, Serialize, Deserialize)]
pub struct FamilyDetailResponse {
    #[serde(flatten)]
    pub family: Family,
    pub students: Vec<Student>,
}
