use crate::model::FilterSpec;

/// Parse a filter query into a [`FilterSpec`].
///
/// Tokens are split on whitespace outside double quotes. Each token is
/// classified as a reserved `key:value` predicate (`label`, `assignee`,
/// `status`, `iteration`, `group`), an arbitrary field predicate
/// (`Field Name:value`), a relative iteration keyword (`@current`, `next`,
/// ...), or free text. Free-text tokens are rejoined with single spaces.
pub fn parse_filter(input: &str) -> FilterSpec {
    let mut spec = FilterSpec {
        raw: input.to_string(),
        ..Default::default()
    };
    let mut free_text: Vec<String> = Vec::new();

    for token in tokenize(input) {
        if apply_key_value(&mut spec, &token) {
            continue;
        }
        if is_iteration_keyword(&token) {
            spec.iterations.push(token);
            continue;
        }
        free_text.push(unquote(&token).to_string());
    }

    spec.query = free_text.join(" ");
    spec
}

/// Rewrite `raw` so its iteration predicates are exactly `iterations`.
/// Every other token is kept as typed, after the iteration tokens.
pub fn with_iterations(raw: &str, iterations: &[String]) -> FilterSpec {
    let mut tokens: Vec<String> = iterations
        .iter()
        .map(|it| {
            if it.contains(char::is_whitespace) {
                format!("iteration:\"{}\"", it)
            } else {
                format!("iteration:{}", it)
            }
        })
        .collect();
    tokens.extend(
        tokenize(raw)
            .into_iter()
            .filter(|token| parse_filter(token).iterations.is_empty()),
    );
    parse_filter(&tokens.join(" "))
}

/// Try to interpret `token` as a `key:value` predicate. Returns false when the
/// token should fall through to keyword / free-text handling.
fn apply_key_value(spec: &mut FilterSpec, token: &str) -> bool {
    let Some((raw_key, raw_value)) = split_key_value(token) else {
        return false;
    };
    let key = unquote(raw_key).trim();
    let value = unquote(raw_value).trim();
    if key.is_empty() || value.is_empty() {
        return false;
    }

    let lowered = key.to_lowercase();
    if matches!(lowered.as_str(), "group" | "group-by" | "groupby") {
        spec.group_by = Some(value.to_lowercase());
        return true;
    }

    let values = split_values(value);
    if values.is_empty() {
        return false;
    }
    match lowered.as_str() {
        "label" | "labels" => spec.labels.extend(values),
        "assignee" | "assignees" => spec.assignees.extend(values),
        "status" => spec.statuses.extend(values),
        "iteration" => spec.iterations.extend(values),
        _ => spec
            .field_filters
            .entry(key.to_string())
            .or_default()
            .extend(values),
    }
    true
}

/// Split on whitespace outside double-quoted spans. Quotes are kept in the
/// token so keys and values can be unquoted independently.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
            current.push(c);
        } else if c.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Split at the first `:` that is not inside quotes
fn split_key_value(token: &str) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    for (i, c) in token.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some((&token[..i], &token[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Strip one pair of surrounding double quotes
fn unquote(s: &str) -> &str {
    let trimmed = s.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Comma/semicolon separated values, trimmed, empties dropped
fn split_values(value: &str) -> Vec<String> {
    value
        .split([',', ';'])
        .map(|v| unquote(v).trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

fn is_iteration_keyword(token: &str) -> bool {
    if token.len() > 1 && token.starts_with('@') {
        return true;
    }
    ["current", "next", "previous"]
        .iter()
        .any(|k| token.eq_ignore_ascii_case(k))
}

/// Normalise user-supplied iteration filters: strip an `iteration:` prefix,
/// turn bare `current`/`next`/`previous` into their `@` form, drop blanks and
/// duplicates (first occurrence wins).
pub fn normalize_iteration_filters<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in raw.iter().flat_map(|v| split_values(v.as_ref())) {
        let value = match value.split_once(':') {
            Some((key, rest)) if key.trim().eq_ignore_ascii_case("iteration") => rest.trim().to_string(),
            _ => value.clone(),
        };
        let value = match value.to_lowercase().as_str() {
            "current" | "next" | "previous" => format!("@{}", value.to_lowercase()),
            _ => value,
        };
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relative_iteration_keywords() {
        let spec = parse_filter("@current next previous");
        assert_eq!(spec.iterations, vec!["@current", "next", "previous"]);
        assert_eq!(spec.query, "");
    }

    #[test]
    fn keywords_are_case_insensitive_but_kept_as_typed() {
        let spec = parse_filter("Current NEXT");
        assert_eq!(spec.iterations, vec!["Current", "NEXT"]);
    }

    #[test]
    fn group_and_label() {
        let spec = parse_filter("group:iteration label:bug");
        assert_eq!(spec.group_by.as_deref(), Some("iteration"));
        assert_eq!(spec.labels, vec!["bug"]);
        assert_eq!(spec.query, "");
    }

    #[test]
    fn last_group_wins() {
        let spec = parse_filter("group:status groupby:assignee");
        assert_eq!(spec.group_by.as_deref(), Some("assignee"));
    }

    #[test]
    fn arbitrary_field_predicate() {
        let spec = parse_filter("Sprint:Q1 labels:bug");
        assert_eq!(spec.field_filters["Sprint"], vec!["Q1"]);
        assert_eq!(spec.labels, vec!["bug"]);
    }

    #[test]
    fn quoted_field_name_and_value() {
        let spec = parse_filter("\"Iteration Name\":\"Q1 Sprint\"");
        assert_eq!(spec.field_filters.len(), 1);
        assert_eq!(spec.field_filters["Iteration Name"], vec!["Q1 Sprint"]);
        assert_eq!(spec.query, "");
    }

    #[test]
    fn multi_value_separators() {
        let spec = parse_filter("label:bug,ui;docs assignee:alice,bob status:Todo");
        assert_eq!(spec.labels, vec!["bug", "ui", "docs"]);
        assert_eq!(spec.assignees, vec!["alice", "bob"]);
        assert_eq!(spec.statuses, vec!["Todo"]);
    }

    #[test]
    fn iteration_values_kept_literally() {
        let spec = parse_filter("iteration:@current,Sprint 4");
        // "4" is a separate whitespace token
        assert_eq!(spec.iterations, vec!["@current", "Sprint"]);
        assert_eq!(spec.query, "4");
    }

    #[test]
    fn free_text_is_rejoined_in_order() {
        let spec = parse_filter("fix   login label:bug  page");
        assert_eq!(spec.query, "fix login page");
        assert_eq!(spec.labels, vec!["bug"]);
    }

    #[test]
    fn empty_value_falls_back_to_free_text() {
        let spec = parse_filter("label: status:  :orphan");
        assert!(spec.labels.is_empty());
        assert!(spec.statuses.is_empty());
        assert!(spec.field_filters.is_empty());
        assert_eq!(spec.query, "label: status: :orphan");
    }

    #[test]
    fn quoted_phrase_is_one_free_text_token() {
        let spec = parse_filter("\"login page\" crash");
        assert_eq!(spec.query, "login page crash");
    }

    #[test]
    fn colon_inside_quotes_is_not_a_separator() {
        let spec = parse_filter("\"a:b\"");
        assert!(spec.field_filters.is_empty());
        assert_eq!(spec.query, "a:b");
    }

    #[test]
    fn reserved_keys_match_case_insensitively() {
        let spec = parse_filter("Status:Done LABEL:bug");
        assert_eq!(spec.statuses, vec!["Done"]);
        assert_eq!(spec.labels, vec!["bug"]);
        assert!(spec.field_filters.is_empty());
    }

    #[test]
    fn repeated_field_predicates_accumulate() {
        let spec = parse_filter("Team:web Team:api");
        assert_eq!(spec.field_filters["Team"], vec!["web", "api"]);
    }

    #[test]
    fn raw_is_preserved() {
        let q = "label:bug  \"x y\"";
        assert_eq!(parse_filter(q).raw, q);
    }

    #[test]
    fn empty_input() {
        let spec = parse_filter("   ");
        assert!(spec.is_empty());
        assert_eq!(spec.group_by, None);
    }

    #[test]
    fn iteration_tokens_snapshot() {
        let spec = parse_filter("iteration:@next,\"Sprint 9\" @previous");
        insta::assert_debug_snapshot!(spec.iterations, @r###"
        [
            "@next",
            "Sprint 9",
            "@previous",
        ]
        "###);
    }

    #[test]
    fn iteration_filters_are_normalised() {
        let raw = ["iteration:current", "next", "@next", "Sprint 4, previous", " "];
        assert_eq!(
            normalize_iteration_filters(&raw),
            vec!["@current", "@next", "Sprint 4", "@previous"]
        );
    }

    #[test]
    fn iterations_replaced_other_tokens_kept() {
        let spec = with_iterations("label:bug @next login group:status", &["@current".into(), "Sprint 4".into()]);
        assert_eq!(spec.raw, "iteration:@current iteration:\"Sprint 4\" label:bug login group:status");
        assert_eq!(spec.iterations, vec!["@current", "Sprint 4"]);
        assert_eq!(spec.labels, vec!["bug"]);
        assert_eq!(spec.query, "login");
        assert_eq!(spec.group_by.as_deref(), Some("status"));

        let cleared = with_iterations("iteration:@current crash", &[]);
        assert_eq!(cleared.raw, "crash");
        assert!(cleared.iterations.is_empty());
    }
}
