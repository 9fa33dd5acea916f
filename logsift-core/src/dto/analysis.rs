//! Analysis service DTOs

use serde::{Deserialize, Serialize};

use crate::domain::summary::Summary;

/// Instruction placed before the log text in every analysis request
pub const ANALYSIS_PREAMBLE: &str = "Provide only a summary of the root cause of the job failure. Print the file name, line number and code exactly where job failed:\n\n";

/// Separator used to reassemble chunks into one document
pub const CHUNK_SEPARATOR: &str = "\n";

/// Chat-style request sent to the analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ChatRequest {
    /// Builds the single-message request for a set of log chunks
    ///
    /// The chunks are joined back into one document, so the request is not
    /// bounded by the chunk size.
    pub fn for_chunks(chunks: &[String]) -> Self {
        let document = chunks.join(CHUNK_SEPARATOR);
        Self {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![ContentPart {
                    kind: "text".to_string(),
                    text: format!("{}{}", ANALYSIS_PREAMBLE, document),
                }],
            }],
        }
    }
}

/// Response of the analysis service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if present
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
    }
}

impl Summary {
    /// Extracts the summary from a decoded response body
    ///
    /// Any shape other than `choices[0].message.content` as a string yields
    /// the fallback summary.
    pub fn from_response(body: serde_json::Value) -> Self {
        match serde_json::from_value::<ChatResponse>(body) {
            Ok(response) => match response.first_content() {
                Some(content) => Summary::extracted(content),
                None => Summary::fallback(),
            },
            Err(_) => Summary::fallback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::FALLBACK_SUMMARY;
    use serde_json::json;

    #[test]
    fn test_request_joins_chunks_after_preamble() {
        let request = ChatRequest::for_chunks(&["first".to_string(), "second".to_string()]);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"][0]["type"], "text");
        assert_eq!(
            body["messages"][0]["content"][0]["text"],
            format!("{}first\nsecond", ANALYSIS_PREAMBLE)
        );
    }

    #[test]
    fn test_request_with_no_chunks_carries_preamble_only() {
        let request = ChatRequest::for_chunks(&[]);
        assert_eq!(request.messages[0].content[0].text, ANALYSIS_PREAMBLE);
    }

    #[test]
    fn test_summary_extracted() {
        let summary = Summary::from_response(json!({
            "choices": [{"message": {"role": "assistant", "content": "src/main.rs:10 panicked"}}]
        }));
        assert_eq!(summary, Summary::extracted("src/main.rs:10 panicked"));
    }

    #[test]
    fn test_summary_fallback_on_missing_fields() {
        for body in [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{}]}),
            json!({"choices": [{"message": {}}]}),
            json!({"choices": [{"message": {"content": null}}]}),
        ] {
            let summary = Summary::from_response(body);
            assert!(summary.is_fallback());
            assert_eq!(summary.text, FALLBACK_SUMMARY);
        }
    }

    #[test]
    fn test_summary_fallback_on_wrong_types() {
        for body in [
            json!({"choices": "nope"}),
            json!({"choices": [{"message": {"content": 42}}]}),
            json!([1, 2, 3]),
            json!("plain string"),
        ] {
            assert!(Summary::from_response(body).is_fallback());
        }
    }
}
