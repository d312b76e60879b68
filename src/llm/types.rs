//! Conversation and tool-declaration types shared between the loop, the
//! registry, and the wire client.
//!
//! `Message` and `Part` serialize directly to the Gemini `Content`/`Part`
//! wire shapes (camelCase, externally tagged parts), so the client can send
//! the conversation history verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who produced a message. The Gemini protocol only distinguishes the user
/// side (which also carries function responses) from the model side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A function call issued by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Argument mapping as supplied by the model. Never contains the
    /// working directory; the dispatcher injects it.
    #[serde(default)]
    pub args: Value,
}

/// The outcome of a function call, addressed back to the tool that ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    /// `{"result": ...}` on success, `{"error": ...}` on failure.
    pub response: Value,
}

/// One element of a message. Exhaustive: a part is text, a call, or a
/// call's response - anything else is a protocol bug, not a silent skip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    FunctionCall(FunctionCall),
    FunctionResponse(FunctionResponse),
}

impl Part {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        match self {
            Part::FunctionCall(c) => Some(c),
            _ => None,
        }
    }
}

/// One turn of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Message {
    /// A user turn carrying plain text.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// A user turn carrying the function responses for one dispatch round.
    pub fn function_responses(parts: Vec<Part>) -> Self {
        Self {
            role: Role::User,
            parts,
        }
    }
}

/// A tool schema advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Token accounting reported by the model service.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub response_tokens: u64,
}

/// A model reply, already unwrapped from the wire envelope.
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    /// Candidate contents in the order the service returned them. All of
    /// them are appended to history before the reply is inspected.
    pub candidates: Vec<Message>,
    pub usage: Option<TokenUsage>,
}

impl ModelResponse {
    /// The final textual answer, if the reply carries one. Text parts
    /// across candidates are concatenated; an all-whitespace result counts
    /// as no text.
    pub fn final_text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .iter()
            .flat_map(|m| m.parts.iter())
            .filter_map(Part::as_text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Every function call in the reply, in request order.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.candidates
            .iter()
            .flat_map(|m| m.parts.iter())
            .filter_map(Part::as_function_call)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn part_serializes_to_wire_shape() {
        let text = serde_json::to_value(Part::Text("hi".to_string())).unwrap();
        assert_eq!(text, json!({"text": "hi"}));

        let call = serde_json::to_value(Part::FunctionCall(FunctionCall {
            name: "read_file".to_string(),
            args: json!({"file_path": "main.py"}),
        }))
        .unwrap();
        assert_eq!(
            call,
            json!({"functionCall": {"name": "read_file", "args": {"file_path": "main.py"}}})
        );
    }

    #[test]
    fn part_deserializes_from_wire_shape() {
        let part: Part = serde_json::from_value(json!({
            "functionCall": {"name": "list_files", "args": {}}
        }))
        .unwrap();
        let call = part.as_function_call().expect("function call part");
        assert_eq!(call.name, "list_files");
    }

    #[test]
    fn final_text_ignores_whitespace_only_replies() {
        let response = ModelResponse {
            candidates: vec![Message {
                role: Role::Model,
                parts: vec![Part::Text("  \n".to_string())],
            }],
            usage: None,
        };
        assert_eq!(response.final_text(), None);
    }

    #[test]
    fn function_calls_preserve_request_order() {
        let response = ModelResponse {
            candidates: vec![Message {
                role: Role::Model,
                parts: vec![
                    Part::FunctionCall(FunctionCall {
                        name: "first".to_string(),
                        args: json!({}),
                    }),
                    Part::FunctionCall(FunctionCall {
                        name: "second".to_string(),
                        args: json!({}),
                    }),
                ],
            }],
            usage: None,
        };
        let names: Vec<_> = response.function_calls().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
