//! Reading requests.
//!
//! Builds the fixed system instruction and the per-request prompt, sends
//! them to a [`TextProvider`] and turns the answer into a [`FortuneResult`].
//! Provider failures are logged in full and surfaced as one message.

use std::sync::Arc;

use thiserror::Error;

use crate::models::{FortuneResult, InputError, UserInput};
use crate::provider::{GenerationRequest, ProviderError, TextProvider};

pub const TEMPERATURE: f32 = 0.8;
pub const TOP_P: f32 = 0.95;

/// Returned as the reading when the provider answers with no text.
pub const FALLBACK_TEXT: &str = "天机蒙蔽，请稍后再试。";

/// The only thing a user is told when the provider call fails.
pub const OBSTRUCTED_MESSAGE: &str = "占卜过程受阻，请检查网络或诚心再试。";

pub const SYSTEM_INSTRUCTION: &str = r#"你是一位精通中国传统命理的风水大师，专研生肖流年运势。
语言庄重典雅、富有仪式感，善用"此乃……之象""紫气东来""五行相生"等命理术语。

你的任务：
根据用户提供的【生日】和【咨询方向（事业/感情/财运）】，结合2026丙午马年的流年五行（天干丙火，地支午火，纯阳之火）与生肖运势，给出个性化的运势测算。

输出结构要求（严格按此顺序，总字数控制在250字以内）：
1. 开篇定势（1-2句）：点明该生肖在2026马年的整体气场与吉凶大势。
2. 专项解析（3-4句）：针对用户选择的咨询方向，结合马年流年具体分析。
3. 化解与开运（2-3句）：给出具体可操作的建议，包含吉色、方位、佩戴物或时机选择。

重要规则：
- 始终保持命理师口吻，禁止出现"根据您的信息""AI分析"等现代语。
- 逻辑须符合传统：如虎马狗三合、羊马六合、鼠马相冲、马马自刑、牛马相害。
- 建议必须具体，不可泛泛而谈。"#;

#[derive(Debug, Error)]
pub enum FortuneError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    /// Display is always [`OBSTRUCTED_MESSAGE`]; the cause is kept as the source.
    #[error("占卜过程受阻，请检查网络或诚心再试。")]
    Obstructed(#[source] ProviderError),
}

impl FortuneError {
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Obstructed(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

/// Per-request prompt: the literal birth date and topic.
pub fn build_prompt(input: &UserInput) -> String {
    format!(
        "求测者生日：{}\n咨询方向：{}\n请大师批注2026丙午流年运势。",
        input.birthday,
        input.direction.label()
    )
}

/// Assemble the provider request for one submission.
pub fn build_request(input: &UserInput, model: &str) -> GenerationRequest {
    GenerationRequest {
        model: model.to_string(),
        contents: build_prompt(input),
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        temperature: TEMPERATURE,
        top_p: TOP_P,
    }
}

#[derive(Clone)]
pub struct Oracle {
    provider: Arc<dyn TextProvider>,
    model: String,
}

impl Oracle {
    pub fn new(provider: Arc<dyn TextProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the provider for a reading.
    ///
    /// Invalid input is rejected before any request is made. Empty provider
    /// text is not an error: the reading becomes [`FALLBACK_TEXT`].
    pub async fn divine(&self, input: &UserInput) -> Result<FortuneResult, FortuneError> {
        let zodiac = input.zodiac()?;
        let request = build_request(input, &self.model);

        tracing::info!(
            zodiac = zodiac.english_name(),
            direction = input.direction.as_str(),
            "requesting reading"
        );

        let response = self
            .provider
            .generate_content(&request)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "provider call failed");
                FortuneError::Obstructed(e)
            })?;

        let content = match response.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                tracing::warn!("provider returned no text, using fallback");
                FALLBACK_TEXT.to_string()
            }
        };

        Ok(FortuneResult {
            content,
            zodiac: zodiac.label().to_string(),
        })
    }
}
