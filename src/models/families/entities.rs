use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    // 家庭ID
    pub id: i64,
    // 家庭名称（通常为 "X 同学家庭"）
    pub family_name: String,
    // 联系邮箱
    pub contact_email: Option<String>,
    // 内部备注（仅教务可见）
    pub notes: Option<String>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    // 学生ID
    pub id: i64,
    // 所属家庭ID
    pub family_id: i64,
    // 学生姓名
    pub display_name: String,
    // 入学时间
    pub enrolled_at: Option<chrono::DateTime<chrono::Utc>>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
