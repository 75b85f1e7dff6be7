//! Utilities for extracting structured data from LLM responses.
//!
//! Models often wrap JSON in markdown code blocks or surround it with
//! explanatory text. Two strategies are tried, in order:
//! 1. Markdown code blocks: ```json ... ```
//! 2. The first balanced `{ ... }` object
//!
//! Nothing else is repaired; a truncated or malformed document fails to parse.

use branchtale_error::StoryError;

/// Extract a JSON object from a response that may contain markdown or extra text.
///
/// # Errors
///
/// Returns a validation error if no JSON object is found.
///
/// # Examples
///
/// ```
/// use branchtale_narrative::extract_json;
///
/// let response = "Here's your story:\n\
///     \n\
///     ```json\n\
///     {\"title\": \"The Lighthouse\"}\n\
///     ```\n";
///
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"title\": \"The Lighthouse\"}");
/// ```
pub fn extract_json(response: &str) -> Result<String, StoryError> {
    if let Some(json) = extract_from_code_block(response, "json") {
        return Ok(json);
    }

    if let Some(json) = extract_balanced(response, '{', '}') {
        return Ok(json);
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON object found in LLM response"
    );

    Err(StoryError::validation(format!(
        "No JSON object found in response (length: {})",
        response.len()
    )))
}

/// Extract content from markdown code blocks.
///
/// Looks for patterns like:
/// - ```language\n...\n```
/// - ``` ... ``` (no language specified)
///
/// A block without a closing fence yields everything after the opening fence.
fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let pattern = format!("```{}", language);

    if let Some(start) = response.find(&pattern) {
        let content_start = start + pattern.len();
        let content = match response[content_start..].find("```") {
            Some(end) => &response[content_start..content_start + end],
            None => &response[content_start..],
        };
        return Some(content.trim().to_string());
    }

    if let Some(start) = response.find("```") {
        let content_start = start + 3;
        // Skip a language tag on the fence line
        let skip_to = response[content_start..]
            .find('\n')
            .map(|n| content_start + n + 1)
            .unwrap_or(content_start);

        let content = match response[skip_to..].find("```") {
            Some(end) => &response[skip_to..skip_to + end],
            None => &response[skip_to..],
        };
        let content = content.trim();
        if content.starts_with('{') {
            return Some(content.to_string());
        }
    }

    None
}

/// Extract content between balanced delimiters.
///
/// Finds the first occurrence of `open` and extracts content up to
/// the matching `close`, ignoring delimiters inside string literals.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse a JSON document into `T`.
///
/// # Errors
///
/// Returns a validation error carrying serde's message and a short preview of
/// the document.
pub fn parse_json<T>(json_str: &str) -> Result<T, StoryError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json_str).map_err(|e| {
        let preview = json_str.chars().take(100).collect::<String>();

        tracing::error!(
            error = %e,
            json_preview = %preview,
            "JSON parsing failed"
        );

        StoryError::validation(format!("Failed to parse JSON: {} (JSON: {}...)", e, preview))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_code_block() {
        let response = r#"
Here's the story you requested:

```json
{
  "title": "Test",
  "rootNode": {}
}
```

Enjoy!
"#;
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.contains("\"title\": \"Test\""));
    }

    #[test]
    fn test_extract_json_unlabeled_fence() {
        let response = "```\n{\"title\": \"x\"}\n```";
        assert_eq!(extract_json(response).unwrap(), "{\"title\": \"x\"}");
    }

    #[test]
    fn test_extract_json_balanced_braces() {
        let response = r#"Sure! Here it is: {"id": 456, "nested": {"value": "test"}} and more text"#;
        let json = extract_json(response).unwrap();
        assert_eq!(json, r#"{"id": 456, "nested": {"value": "test"}}"#);
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let response = r#"{"text": "a } brace and a \" quote", "n": 1} trailing"#;
        let json = extract_json(response).unwrap();
        assert!(json.ends_with("\"n\": 1}"));
    }

    #[test]
    fn test_unclosed_object_is_not_found() {
        assert!(extract_json(r#"{"title": "cut off"#).is_err());
    }

    #[test]
    fn test_no_json_found() {
        let response = "This is just plain text with no JSON";
        assert!(extract_json(response).is_err());
    }

    #[test]
    fn test_parse_json_reports_serde_error() {
        #[derive(serde::Deserialize, Debug)]
        struct Data {
            #[allow(dead_code)]
            id: i32,
        }
        let err = parse_json::<Data>(r#"{"id": "nope"}"#).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
