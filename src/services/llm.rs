use tracing::info;

use crate::error::{ApiError, classify};
use crate::models::{ChatMessage, ChatRequest, ChatResponse};
use crate::services::provider::Connection;

/// Fixed analysis instructions sent as the system role. `{}` is replaced
/// with either 《章节标题》 or 本章 — the only per-request variation.
const SYSTEM_PROMPT: &str = "你是一个专业的文章分析助手，你能够准确地找到文章的重点，同时又不遗漏原文的细节，你的讲述富有故事性。请使用 Markdown 格式按照以下结构对{}内容进行分析：

## 总体概述

用2-3句话概括本章的主要内容和中心思想。

## 核心观点

针对每个核心观点，请按以下结构分析，把重点放在原文的支撑依据上，观点之间避免重复：

### 观点 1：[观点标题]
- **核心内容**：清晰说明观点的具体内容
- **支撑依据**：如果有相关的案例、故事或个人经历，请详细描述，体现原文的故事性，请务必包含故事的起因经过结果和人物，人物需要包含该人物身份和姓名的介绍。并引用发人深省的原文语句作为支撑。如果作者对某概念做了解释，请详细描述该概念的定义和解释。
- **论证分析**：解释这些例证如何支持该观点
- **可视化**：根据观点内容的性质，使用以下一种或多种 Mermaid 图形进行可视化：

1. 流程图(graph TD): 用于表示步骤或决策过程
2. 思维导图(mindmap): 用于表示概念层级关系
3. 饼图(pie): 用于表示数据占比或分布情况
4. 状态图(stateDiagram-v2): 用于表示状态转换或并行处理

注意：
1. 使用中文描述节点和关系
2. 图形逻辑清晰，层次分明
3. 避免过于复杂的图形结构
4. 确保每个图形都有明确的起点和终点
5. 必须使用三个反引号加 mermaid 标记来包裹图形代码";

/// Thin client around the provider's chat-completion endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
}

impl LlmClient {
    pub fn new() -> Self {
        LlmClient {
            client: reqwest::Client::new(),
        }
    }

    /// One chat-completion call. The returned summary is whatever Markdown
    /// the backend produced; nothing is validated or post-processed here.
    pub async fn summarize(
        &self,
        conn: &Connection,
        chapter_title: Option<&str>,
        content: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ApiError> {
        let addressed = match chapter_title {
            Some(title) => format!("《{title}》"),
            None => "本章".to_string(),
        };

        let body = ChatRequest {
            model: conn.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.replace("{}", &addressed),
                },
                ChatMessage {
                    role: "user",
                    content: format!("请分析以下内容：\n\n{content}"),
                },
            ],
            temperature,
            max_tokens,
        };

        info!(provider = %conn.provider, model = %conn.model, "正在调用 {} API 进行总结...", conn.provider);

        let response = self
            .client
            .post(format!("{}/chat/completions", conn.base_url))
            .bearer_auth(&conn.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify(conn.provider, e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| classify(conn.provider, e.to_string()))?;

        if !status.is_success() {
            return Err(classify(conn.provider, text));
        }

        let completion: ChatResponse =
            serde_json::from_str(&text).map_err(|e| classify(conn.provider, e.to_string()))?;

        let summary = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| classify(conn.provider, "后端未返回任何结果".to_string()))?;

        info!(provider = %conn.provider, "{} API 调用完成", conn.provider);
        Ok(summary)
    }
}

impl Default for LlmClient {
    fn default() -> Self {
        Self::new()
    }
}
