use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, Condition};

/// 转义 LIKE 模式中的通配符，转义符为 `\`
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `column LIKE '%input%' ESCAPE '\'`，input 中的通配符按字面量匹配
pub fn like_contains<C: ColumnTrait>(column: C, input: &str) -> Condition {
    let pattern = format!("%{}%", escape_like_pattern(input));
    Condition::all().add(column.like(LikeExpr::new(pattern).escape('\\')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("abc"), "abc");
        assert_eq!(escape_like_pattern("50%"), "50\\%");
        assert_eq!(escape_like_pattern("a_b"), "a\\_b");
        assert_eq!(escape_like_pattern("c:\\dir"), "c:\\\\dir");
    }
}
