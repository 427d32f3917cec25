//! 业务数据模型
//!
//! 与 entity 模块的数据库实体分离：storage 层做 CRUD 后转换为这里的业务实体。

pub mod common;
pub mod families;
pub mod family_links;
pub mod portal;
pub mod system;

pub use common::error_code::ErrorCode;
pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

use serde::{Deserialize, Serialize};

/// 程序启动时间，用于 status 接口计算运行时长
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
