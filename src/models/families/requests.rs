use crate::models::common::pagination::PaginationQuery;
use serde::Deserialize;

// 家庭查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct FamilyQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 创建家庭请求
#[derive(Debug, Deserialize)]
pub struct CreateFamilyRequest {
    pub family_name: String,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

// 更新家庭请求
// contact_email 与 notes 用双层 Option 区分「未提供」与「显式置空」
#[derive(Debug, Deserialize)]
pub struct UpdateFamilyRequest {
    pub family_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

// 字段出现即为 Some(...)，缺省由 #[serde(default)] 落成 None
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Option::<String>::deserialize(deserializer).map(Some)
}

// 添加学生请求
#[derive(Debug, Deserialize)]
pub struct AddStudentRequest {
    pub display_name: String,
    pub enrolled_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 家庭列表查询参数（用于存储层）
#[derive(Debug, Clone, Deserialize)]
pub struct FamilyListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_absent_fields_stay_untouched() {
        let req: UpdateFamilyRequest = serde_json::from_str(r#"{"family_name": "新名字"}"#).unwrap();
        assert_eq!(req.family_name.as_deref(), Some("新名字"));
        assert_eq!(req.contact_email, None);
        assert_eq!(req.notes, None);
    }

    #[test]
    fn test_update_request_explicit_null_clears_field() {
        let req: UpdateFamilyRequest =
            serde_json::from_str(r#"{"contact_email": null, "notes": null}"#).unwrap();
        assert_eq!(req.contact_email, Some(None));
        assert_eq!(req.notes, Some(None));
    }

    #[test]
    fn test_update_request_value_sets_field() {
        let req: UpdateFamilyRequest =
            serde_json::from_str(r#"{"contact_email": "mom@example.com"}"#).unwrap();
        assert_eq!(req.contact_email, Some(Some("mom@example.com".to_string())));
        assert_eq!(req.notes, None);
    }
}
