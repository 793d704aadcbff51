//! 声明式表单校验
//!
//! 用字段规则表描述各个公开表单的约束（必填、长度、格式），
//! `validate` 一次性收集全部问题而不是遇错即停，
//! 方便把完整的错误列表回显给填表人。
//!
//! # 使用示例
//!
//! ```rust
//! use crate::services::validation::schemas;
//!
//! let data = serde_json::json!({"email": "reader@example.com"});
//! if let Err(issues) = schemas::newsletter_signup().validate(&data) {
//!     for issue in issues {
//!         println!("{issue}");
//!     }
//! }
//! ```

pub mod schemas;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// 邮箱格式（宽松：本地部分@域名.后缀）
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("邮箱正则编译失败"));

/// 字段取值类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 任意文本
    Text,
    /// 邮箱格式文本
    Email,
    /// 数值
    Number,
}

/// 单个字段的约束
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// 文本最大长度（字符数）
    pub max_len: Option<usize>,
}

impl FieldRule {
    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
            max_len: None,
        }
    }

    pub fn email(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Email,
            required: false,
            max_len: None,
        }
    }

    pub fn number(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Number,
            required: false,
            max_len: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }
}

/// 校验问题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// 一个表单的字段规则表
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub name: &'static str,
    pub rules: Vec<FieldRule>,
}

impl FormSchema {
    pub fn new(name: &'static str, rules: Vec<FieldRule>) -> Self {
        Self { name, rules }
    }

    /// 校验一份表单数据
    ///
    /// 收集所有问题后一次返回；规则表之外的多余字段不报错。
    pub fn validate(&self, data: &Value) -> Result<(), Vec<ValidationIssue>> {
        let obj = match data.as_object() {
            Some(obj) => obj,
            None => {
                return Err(vec![ValidationIssue {
                    field: self.name.to_string(),
                    message: "表单数据必须是对象".to_string(),
                }])
            }
        };

        let mut issues = Vec::new();

        for rule in &self.rules {
            let value = match obj.get(rule.name) {
                Some(Value::Null) | None => {
                    if rule.required {
                        issues.push(ValidationIssue {
                            field: rule.name.to_string(),
                            message: "必填字段缺失".to_string(),
                        });
                    }
                    continue;
                }
                Some(value) => value,
            };

            match rule.kind {
                FieldKind::Text | FieldKind::Email => {
                    let text = match value.as_str() {
                        Some(text) => text,
                        None => {
                            issues.push(ValidationIssue {
                                field: rule.name.to_string(),
                                message: "必须是字符串".to_string(),
                            });
                            continue;
                        }
                    };

                    if rule.required && text.trim().is_empty() {
                        issues.push(ValidationIssue {
                            field: rule.name.to_string(),
                            message: "必填字段不能为空".to_string(),
                        });
                        continue;
                    }

                    if let Some(max_len) = rule.max_len {
                        if text.chars().count() > max_len {
                            issues.push(ValidationIssue {
                                field: rule.name.to_string(),
                                message: format!("长度超过上限 {max_len}"),
                            });
                        }
                    }

                    if rule.kind == FieldKind::Email
                        && !text.trim().is_empty()
                        && !EMAIL_RE.is_match(text)
                    {
                        issues.push(ValidationIssue {
                            field: rule.name.to_string(),
                            message: "邮箱格式无效".to_string(),
                        });
                    }
                }
                FieldKind::Number => {
                    if !value.is_number() {
                        issues.push(ValidationIssue {
                            field: rule.name.to_string(),
                            message: "必须是数值".to_string(),
                        });
                    }
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}
