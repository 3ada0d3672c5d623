use rusqlite::types::Value;

use crate::taxonomy::{Format, KeySignature};

/// A resolved, conjunctive filter over compositions joined with composers.
///
/// Every populated field narrows the result; an empty predicate matches
/// every composition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionPredicate {
    /// Case-insensitive substring of the composition name.
    pub name_contains: Option<String>,

    /// Each entry must equal the composition's key signature.
    pub key_signatures: Vec<KeySignature>,

    pub format: Option<Format>,

    /// Case-insensitive substring of the composer name.
    pub composer_name_contains: Option<String>,
}

impl CompositionPredicate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name_contains.is_none()
            && self.key_signatures.is_empty()
            && self.format.is_none()
            && self.composer_name_contains.is_none()
    }

    /// Render as a `WHERE` clause (empty when unconstrained) and its
    /// positional parameters. Assumes `c` aliases compositions and `p`
    /// aliases composers.
    pub(crate) fn to_sql(&self) -> (String, Vec<Value>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        if let Some(name) = &self.name_contains {
            clauses.push(r"c.name LIKE ? ESCAPE '\'");
            params.push(Value::Text(like_pattern(name)));
        }
        for key in &self.key_signatures {
            clauses.push("c.key_signature = ?");
            params.push(Value::Integer(key.code()));
        }
        if let Some(format) = self.format {
            clauses.push("c.format = ?");
            params.push(Value::Integer(format.code()));
        }
        if let Some(name) = &self.composer_name_contains {
            clauses.push(r"p.name LIKE ? ESCAPE '\'");
            params.push(Value::Text(like_pattern(name)));
        }

        if clauses.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", clauses.join(" AND ")), params)
        }
    }
}

/// Build a `LIKE` pattern matching `text` anywhere, with wildcards in
/// `text` itself taken literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_predicate_has_no_where_clause() {
        let (sql, params) = CompositionPredicate::default().to_sql();
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_clauses_are_joined_with_and() {
        let predicate = CompositionPredicate {
            name_contains: Some("sym".to_string()),
            key_signatures: vec![KeySignature::CMinor],
            format: Some(Format::Symphony),
            composer_name_contains: Some("beet".to_string()),
        };
        let (sql, params) = predicate.to_sql();
        assert_eq!(sql.matches(" AND ").count(), 3);
        assert_eq!(params.len(), 4);
        assert_eq!(params[1], Value::Integer(21));
        assert_eq!(params[2], Value::Integer(1));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("No. 5"), "%No. 5%");
        assert_eq!(like_pattern("100%_"), r"%100\%\_%");
    }
}
