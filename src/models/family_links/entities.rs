use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 家庭链接状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Active,
    Revoked,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Active => write!(f, "active"),
            LinkStatus::Revoked => write!(f, "revoked"),
        }
    }
}

impl FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(LinkStatus::Active),
            "revoked" => Ok(LinkStatus::Revoked),
            other => Err(format!("unknown link status: {other}")),
        }
    }
}

/// 家庭链接（对外模型，绝不携带 token 明文或密文）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyLink {
    // 链接ID
    pub id: i64,
    // 所属家庭ID
    pub family_id: i64,
    // 备注标签（如 "妈妈的手机"）
    pub label: Option<String>,
    // 状态
    pub status: LinkStatus,
    // 过期时间（None 表示不过期）
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    // 最近一次轮换时间
    pub rotated_at: Option<chrono::DateTime<chrono::Utc>>,
    // 吊销时间
    pub revoked_at: Option<chrono::DateTime<chrono::Utc>>,
    // 最近使用时间（尽力而为，受缓存窗口影响）
    pub last_used_at: Option<chrono::DateTime<chrono::Utc>>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl FamilyLink {
    /// 链接当前是否可用于解析
    pub fn is_usable_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        if self.status != LinkStatus::Active {
            return false;
        }
        match self.expires_at {
            Some(exp) => now < exp,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample_link(status: LinkStatus, expires_at: Option<chrono::DateTime<Utc>>) -> FamilyLink {
        FamilyLink {
            id: 1,
            family_id: 1,
            label: None,
            status,
            expires_at,
            rotated_at: None,
            revoked_at: None,
            last_used_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_roundtrip() {
        assert_eq!("active".parse::<LinkStatus>().unwrap(), LinkStatus::Active);
        assert_eq!(LinkStatus::Revoked.to_string(), "revoked");
        assert!("deleted".parse::<LinkStatus>().is_err());
    }

    #[test]
    fn test_active_link_without_expiry_is_usable() {
        let link = sample_link(LinkStatus::Active, None);
        assert!(link.is_usable_at(Utc::now()));
    }

    #[test]
    fn test_expired_link_is_not_usable() {
        let link = sample_link(LinkStatus::Active, Some(Utc::now() - Duration::hours(1)));
        assert!(!link.is_usable_at(Utc::now()));
    }

    #[test]
    fn test_revoked_link_is_not_usable() {
        let link = sample_link(LinkStatus::Revoked, None);
        assert!(!link.is_usable_at(Utc::now()));
    }
}
