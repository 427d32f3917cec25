//! 家长门户视图模型
//!
//! 门户响应是家庭数据的裁剪视图：不包含内部备注，也不包含链接的
//! 密文或索引相关字段。

use serde::{Deserialize, Serialize};

use crate::models::families::entities::{Family, Student};
use crate::models::family_links::entities::FamilyLink;

#[derive(Debug, Serialize, Deserialize)]
pub struct PortalFamily {
    pub family_name: String,
    pub contact_email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PortalStudent {
    pub display_name: String,
    pub enrolled_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PortalLinkInfo {
    pub label: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PortalOverviewResponse {
    pub family: PortalFamily,
    pub students: Vec<PortalStudent>,
    pub link: PortalLinkInfo,
}

impl PortalOverviewResponse {
    /// 由完整业务实体裁剪出门户视图
    pub fn from_parts(family: Family, students: Vec<Student>, link: &FamilyLink) -> Self {
        Self {
            family: PortalFamily {
                family_name: family.family_name,
                contact_email: family.contact_email,
            },
            students: students
                .into_iter()
                .map(|s| PortalStudent {
                    display_name: s.display_name,
                    enrolled_at: s.enrolled_at,
                })
                .collect(),
            link: PortalLinkInfo {
                label: link.label.clone(),
                expires_at: link.expires_at,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::family_links::entities::LinkStatus;
    use chrono::Utc;

    #[test]
    fn test_portal_view_hides_internal_fields() {
        let now = Utc::now();
        let family = Family {
            id: 7,
            family_name: "李同学家庭".to_string(),
            contact_email: Some("li@example.com".to_string()),
            notes: Some("欠费提醒".to_string()),
            created_at: now,
            updated_at: now,
        };
        let link = FamilyLink {
            id: 3,
            family_id: 7,
            label: Some("爸爸的平板".to_string()),
            status: LinkStatus::Active,
            expires_at: None,
            rotated_at: None,
            revoked_at: None,
            last_used_at: None,
            created_at: now,
            updated_at: now,
        };

        let view = PortalOverviewResponse::from_parts(family, vec![], &link);
        let json = serde_json::to_value(&view).unwrap();

        // 内部备注与各类 ID 不应出现在门户响应中
        assert!(json["family"].get("notes").is_none());
        assert!(json["family"].get("id").is_none());
        assert_eq!(json["link"]["label"], "爸爸的平板");
    }
}
