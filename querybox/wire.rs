//! Request and response bodies for the two server calls the engine makes.
//!
//! Field names mirror the HTTP contract exactly; these types are the
//! contract and nothing in the engine reinterprets them.

use querybox_core::{
  Diagnostic,
  QueryCompilationError,
  Span,
};
use serde::{
  Deserialize,
  Serialize,
};

/// Request body for `POST analyze-query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
  /// Character offset of the cursor inside `query`. Omitted when the input
  /// surface cannot determine it (e.g. submission without focus); the
  /// server then treats the cursor as end-of-string or declines
  /// location-specific suggestions.
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub cursor_pos: Option<usize>,
  pub query:      String,
  pub scope:      String,
}

/// Response body for `POST analyze-query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
  /// Set when the query does not compile at all; on the suggestion path
  /// this is not rendered, it simply means fewer (or no) suggestions.
  #[serde(default)]
  pub error:       Option<QueryCompilationError>,
  #[serde(default)]
  pub suggestions: Vec<Suggestion>,
}

/// Classifies a suggestion (tag, field, keyword, ...); `prefix` is what the
/// widget shows in front of `display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionType {
  pub name:   String,
  pub prefix: String,
}

/// One autocomplete candidate.
///
/// `target_location` addresses the query string that was current when the
/// analysis request was issued (inclusive `end`, see
/// [`Span`](querybox_core::Span)). A suggestion is single-use: once the
/// buffer changes, including by accepting this or any other suggestion, the
/// offsets no longer line up and the whole list must be discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
  /// Replacement text spliced over `target_location`.
  pub text:            String,
  /// Human-readable label for the dropdown.
  pub display:         String,
  pub target_location: Span,
  pub suggestion_type: SuggestionType,
}

/// Outbound search submission: the full query plus routing and paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
  pub query:   String,
  pub scope:   String,
  pub page:    u32,
  pub limit:   u32,
  /// Scope-specific parameters (e.g. the collection id for collection-item
  /// search), passed through untouched.
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub filters: Vec<(String, String)>,
}

impl SearchRequest {
  pub fn new(query: impl Into<String>, scope: impl Into<String>) -> Self {
    Self {
      query:   query.into(),
      scope:   scope.into(),
      page:    1,
      limit:   25,
      filters: Vec::new(),
    }
  }
}

/// Successful search response. Result rows stay opaque to the engine; only
/// the pagination metadata is typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
  pub full_count: u64,
  pub pages:      u64,
  pub page:       u32,
  #[serde(default)]
  pub items:      Vec<serde_json::Value>,
}

/// Error body of a failed search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFailurePayload {
  pub message:            String,
  /// Present when the failure was a query compilation error; offsets index
  /// into the submitted query string.
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub compilation_errors: Option<Vec<Diagnostic>>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn analysis_request_omits_an_unknown_cursor() {
    let with = AnalysisRequest {
      cursor_pos: Some(4),
      query:      "tag:".into(),
      scope:      "posts".into(),
    };
    assert_eq!(
      serde_json::to_value(&with).unwrap(),
      json!({ "cursor_pos": 4, "query": "tag:", "scope": "posts" })
    );

    let without = AnalysisRequest {
      cursor_pos: None,
      ..with
    };
    assert_eq!(
      serde_json::to_value(&without).unwrap(),
      json!({ "query": "tag:", "scope": "posts" })
    );
  }

  #[test]
  fn analysis_response_parses_the_server_shape() {
    let response: AnalysisResponse = serde_json::from_value(json!({
      "error": null,
      "suggestions": [{
        "text": "category:",
        "display": "category",
        "target_location": { "start": 0, "end": 3 },
        "suggestion_type": { "name": "field", "prefix": ":" },
      }],
    }))
    .unwrap();

    assert!(response.error.is_none());
    assert_eq!(response.suggestions.len(), 1);
    let suggestion = &response.suggestions[0];
    assert_eq!(suggestion.text, "category:");
    assert_eq!(suggestion.target_location, Span::new(0, 3));
    assert_eq!(suggestion.suggestion_type.name, "field");
  }

  #[test]
  fn failure_payload_with_and_without_diagnostics() {
    let rejected: SearchFailurePayload = serde_json::from_value(json!({
      "message": "query failed to compile",
      "compilation_errors": [
        { "location": { "start": 2, "end": 5 }, "msg": "unknown field" },
      ],
    }))
    .unwrap();
    assert_eq!(rejected.compilation_errors.as_ref().unwrap().len(), 1);

    let plain: SearchFailurePayload =
      serde_json::from_value(json!({ "message": "internal error" })).unwrap();
    assert!(plain.compilation_errors.is_none());
  }

  #[test]
  fn search_request_defaults_and_filters() {
    let mut request = SearchRequest::new("sky", "collection-items");
    request.filters.push(("collection".into(), "7".into()));

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 25);
    assert_eq!(json["filters"][0][0], "collection");

    let plain = serde_json::to_value(SearchRequest::new("sky", "posts")).unwrap();
    assert!(plain.get("filters").is_none());
  }
}
