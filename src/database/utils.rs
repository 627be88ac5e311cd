use regex::Regex;

/// Collapse whitespace and rewrite `?` placeholders to Postgres `$n`
/// parameters, so queries can be written in the portable style.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let re = Regex::new(r"\?").unwrap();
    let mut param_index = 1;
    let mut result = cleaned;
    while let Some(mat) = re.find(&result) {
        let replacement = format!("${}", param_index);
        result.replace_range(mat.range(), &replacement);
        param_index += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::sql;

    #[test]
    fn rewrites_placeholders_in_order() {
        assert_eq!(
            sql("SELECT * FROM worklogs WHERE id = ? AND worker_id = ?"),
            "SELECT * FROM worklogs WHERE id = $1 AND worker_id = $2"
        );
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sql("SELECT\n    id\nFROM\n    tasks"), "SELECT id FROM tasks");
    }
}
