use serde::{Deserialize, Serialize};

/// One chapter of document text submitted for analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterRequest {
    pub content: String,
    pub chapter_title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub error_type: String,
}

// OpenAI-style chat-completion wire types, shared by both providers.

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_request_title_is_optional() {
        let req: ChapterRequest =
            serde_json::from_str(r#"{"content": "这是正文。"}"#).expect("deserialize");
        assert_eq!(req.content, "这是正文。");
        assert!(req.chapter_title.is_none());

        let req: ChapterRequest =
            serde_json::from_str(r#"{"content": "这是正文。", "chapter_title": "第一章"}"#)
                .expect("deserialize");
        assert_eq!(req.chapter_title.as_deref(), Some("第一章"));
    }

    #[test]
    fn chat_response_parses_first_choice() {
        let raw = r###"{
            "id": "cmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "## 总体概述"}}
            ],
            "usage": {"total_tokens": 12}
        }"###;
        let parsed: ChatResponse = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(parsed.choices[0].message.content, "## 总体概述");
    }
}
