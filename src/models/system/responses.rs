use serde::{Deserialize, Serialize};

// 系统状态响应
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub system_name: String,
    pub version: String,
    pub environment: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub uptime_seconds: i64,
}
