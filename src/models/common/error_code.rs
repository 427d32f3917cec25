//! API 业务错误码
//!
//! 与 HTTP 状态码分离：前四位跟随 HTTP 语义，尾位区分具体业务场景。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 4xx
    BadRequest = 40000,
    ValidationFailed = 40001,
    Unauthorized = 40100,
    LinkTokenInvalid = 40101,
    LinkRevoked = 40102,
    LinkExpired = 40103,
    Forbidden = 40300,
    NotFound = 40400,
    FamilyNotFound = 40401,
    StudentNotFound = 40402,
    LinkNotFound = 40403,
    Conflict = 40900,
    FamilyAlreadyExists = 40901,

    // 5xx
    InternalServerError = 50000,
    LinkIssueFailed = 50001,
}
