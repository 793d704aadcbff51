// 文本处理辅助函数

/// 生成适合做文档 ID 的 slug
///
/// 小写化，字母数字以外的字符折叠为单个 `-`，去掉首尾 `-`。
/// 空输入返回 `"unnamed"`，保证结果总能作为文件名。
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && !slug.is_empty() {
            slug.push('-');
            last_was_dash = true;
        }
    }

    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}
