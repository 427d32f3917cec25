use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_family_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Family name must not be empty");
    }
    if trimmed.chars().count() > 64 {
        return Err("Family name must be at most 64 characters");
    }
    Ok(())
}

pub fn validate_link_label(label: &str) -> Result<(), &'static str> {
    if label.chars().count() > 64 {
        return Err("Link label must be at most 64 characters");
    }
    Ok(())
}

pub fn validate_student_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Student name must not be empty");
    }
    if trimmed.chars().count() > 64 {
        return Err("Student name must be at most 64 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("parent@example.com").is_ok());
        assert!(validate_email("mom.and.dad+ttl@school.edu.cn").is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_family_name_bounds() {
        assert!(validate_family_name("王小明家庭").is_ok());
        assert!(validate_family_name("  ").is_err());
        assert!(validate_family_name(&"名".repeat(65)).is_err());
    }

    #[test]
    fn test_link_label_bounds() {
        assert!(validate_link_label("妈妈的手机").is_ok());
        assert!(validate_link_label("").is_ok()); // 空标签等同于未设置
        assert!(validate_link_label(&"x".repeat(65)).is_err());
    }
}
