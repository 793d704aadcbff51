// 各公开表单的字段规则表
//
// 字段名与前端提交的 JSON 保持一致（camelCase）

use super::{FieldRule, FormSchema};
use once_cell::sync::Lazy;

static MEMBERSHIP_APPLICATION: Lazy<FormSchema> = Lazy::new(|| {
    FormSchema::new(
        "membership_application",
        vec![
            FieldRule::text("firstName").required().max_len(100),
            FieldRule::text("lastName").required().max_len(100),
            FieldRule::email("email").required().max_len(254),
            FieldRule::text("institution").max_len(200),
            FieldRule::text("membershipType").max_len(40),
        ],
    )
});

static AWARD_NOMINATION: Lazy<FormSchema> = Lazy::new(|| {
    FormSchema::new(
        "award_nomination",
        vec![
            FieldRule::text("award").required().max_len(80),
            FieldRule::text("nomineeName").required().max_len(100),
            FieldRule::email("nomineeEmail").max_len(254),
            FieldRule::text("nominatorName").required().max_len(100),
            FieldRule::email("nominatorEmail").required().max_len(254),
            FieldRule::text("statement").required().max_len(2000),
        ],
    )
});

static CONFERENCE_REGISTRATION: Lazy<FormSchema> = Lazy::new(|| {
    FormSchema::new(
        "conference_registration",
        vec![
            FieldRule::text("fullName").required().max_len(100),
            FieldRule::email("email").required().max_len(254),
            FieldRule::text("institution").max_len(200),
            FieldRule::number("conferenceYear").required(),
        ],
    )
});

static NEWSLETTER_SIGNUP: Lazy<FormSchema> = Lazy::new(|| {
    FormSchema::new(
        "newsletter_signup",
        vec![
            FieldRule::email("email").required().max_len(254),
            FieldRule::text("name").max_len(100),
        ],
    )
});

/// 会员申请表
pub fn membership_application() -> &'static FormSchema {
    &MEMBERSHIP_APPLICATION
}

/// 奖项提名表
pub fn award_nomination() -> &'static FormSchema {
    &AWARD_NOMINATION
}

/// 年会报名表
pub fn conference_registration() -> &'static FormSchema {
    &CONFERENCE_REGISTRATION
}

/// 通讯订阅表
pub fn newsletter_signup() -> &'static FormSchema {
    &NEWSLETTER_SIGNUP
}
