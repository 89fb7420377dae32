//! External search suggestions for queries the table cannot answer.

use crate::constants::SEARCH_BASE_URL;
use crate::Symptom;

/// Builds a web-search URL for `symptoms`, optionally followed by `suffix`.
///
/// Terms are form-encoded, so they appear in the query joined by `+`:
/// `fever, body aches` with suffix `symptoms` gives `?q=fever+body+aches+symptoms`.
pub fn search_url(symptoms: &[Symptom], suffix: Option<&str>) -> String {
    let mut terms: Vec<&str> = symptoms.iter().map(Symptom::as_str).collect();
    if let Some(suffix) = suffix {
        terms.push(suffix);
    }
    let query = terms.join(" ");

    match reqwest::Url::parse_with_params(SEARCH_BASE_URL, [("q", query.as_str())]) {
        Ok(url) => url.into(),
        Err(e) => {
            tracing::warn!("failed to build search url: {e}");
            SEARCH_BASE_URL.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_terms_with_plus_and_appends_suffix() {
        let symptoms = Symptom::parse_list("fever, body aches");
        assert_eq!(
            search_url(&symptoms, Some("symptoms")),
            "https://www.google.com/search?q=fever+body+aches+symptoms"
        );
    }

    #[test]
    fn escapes_reserved_characters() {
        let symptoms = Symptom::parse_list("aches & pains");
        let url = search_url(&symptoms, None);
        assert_eq!(url, "https://www.google.com/search?q=aches+%26+pains");
    }
}
