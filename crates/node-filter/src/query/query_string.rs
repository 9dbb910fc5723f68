//! Conversion between filter sets and URL query strings.

use super::filter_set::{FilterSet, SELECTION_KEY};

/// Converts a URL query string (`?status=new,deployed&q=moon`) into filters.
///
/// Parameters without a value are ignored. Values are split on commas,
/// free text included.
pub fn query_string_to_filters(query: &str) -> FilterSet {
    let mut filters = FilterSet::new();
    let query = query.strip_prefix('?').unwrap_or(query);

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (raw_name, raw_values) = pair.split_once('=').unwrap_or((pair, ""));
        let name = decode_component(raw_name);
        let values = decode_component(raw_values);
        if name.is_empty() || values.is_empty() {
            continue;
        }

        filters.set_terms(name, values.split(',').map(str::to_string).collect());
    }

    filters
}

/// Converts filters into a URL query string, starting with `?`.
///
/// Empty keys are skipped and so is the selection key, since selection is
/// not kept across navigations.
pub fn filters_to_query_string(filters: &FilterSet) -> String {
    let params = filters
        .active()
        .filter(|(key, _)| *key != SELECTION_KEY)
        .map(|(key, terms)| {
            format!(
                "{}={}",
                encode_component(key),
                encode_component(&terms.join(","))
            )
        })
        .collect::<Vec<_>>();
    format!("?{}", params.join("&"))
}

/// Form-urlencodes a component, writing spaces as `+`.
fn encode_component(raw: &str) -> String {
    urlencoding::encode(raw).replace("%20", "+")
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FilterSet {
        let mut filters = FilterSet::new();
        filters.push_free_text("moon");
        filters.push_free_text("sun");
        filters.set_terms(
            "status",
            vec!["new".to_string(), "failed comissioning".to_string()],
        );
        filters.set_terms("zone", vec!["!south".to_string()]);
        filters
    }

    #[test]
    fn converts_query_string_to_filters() {
        let filters = query_string_to_filters(
            "?q=moon%2Csun&status=new,failed+comissioning&zone=!south&hostname=",
        );
        assert_eq!(filters, sample());
        assert!(!filters.contains_key("hostname"));
    }

    #[test]
    fn converts_filters_to_query_string() {
        assert_eq!(
            filters_to_query_string(&sample()),
            "?q=moon%2Csun&status=new%2Cfailed+comissioning&zone=%21south"
        );
    }

    #[test]
    fn query_string_round_trips() {
        let query = "?q=moon%2Csun&status=new%2Cfailed+comissioning&zone=%21south";
        assert_eq!(filters_to_query_string(&query_string_to_filters(query)), query);
        assert_eq!(query_string_to_filters(&filters_to_query_string(&sample())), sample());
    }

    #[test]
    fn free_text_is_comma_separated() {
        let filters = query_string_to_filters("?q=moon%2Csun");
        assert_eq!(filters.free_text(), &["moon".to_string(), "sun".to_string()]);

        let mut filters = FilterSet::new();
        filters.push_free_text("moon");
        filters.push_free_text("sun");
        assert_eq!(filters_to_query_string(&filters), "?q=moon%2Csun");
    }

    #[test]
    fn free_text_keeps_spaces_inside_a_term() {
        let filters = query_string_to_filters("?q=moon+sun");
        assert_eq!(filters.free_text(), &["moon sun".to_string()]);
    }

    #[test]
    fn selection_is_not_persisted() {
        let mut filters = FilterSet::new();
        filters.push_free_text("moon");
        filters.push_free_text("sun");
        filters.set_terms(SELECTION_KEY, vec!["selected".to_string()]);
        assert_eq!(filters_to_query_string(&filters), "?q=moon%2Csun");
    }

    #[test]
    fn empty_filters_give_bare_marker() {
        assert_eq!(filters_to_query_string(&FilterSet::new()), "?");
        assert_eq!(query_string_to_filters("?"), FilterSet::new());
        assert_eq!(query_string_to_filters(""), FilterSet::new());
    }

    #[test]
    fn malformed_escapes_are_kept_verbatim() {
        let filters = query_string_to_filters("tags=%zz");
        assert_eq!(filters.terms("tags"), Some(&["%zz".to_string()][..]));
    }
}
