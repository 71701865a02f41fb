//! 채팅 모델 모듈 - Bedrock Converse API
//!
//! 컨텍스트가 포함된 프롬프트를 단일 user 턴으로 전송하고 응답 텍스트를 반환합니다.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ConverseOutput, InferenceConfiguration, Message,
};

use crate::bedrock::{describe_sdk_error, BedrockTarget};

/// 답변 생성 온도
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
/// 응답 최대 토큰 수
pub const DEFAULT_MAX_TOKENS: i32 = 800;

// ============================================================================
// ChatModel Trait
// ============================================================================

/// 호스팅 채팅 모델 트레이트
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// 프롬프트 하나를 보내고 응답 텍스트를 그대로 반환
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// 모델 이름
    fn name(&self) -> &str;
}

// ============================================================================
// Chat Settings
// ============================================================================

/// 추론 설정
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatSettings {
    pub temperature: f32,
    pub max_tokens: i32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

// ============================================================================
// BedrockChat
// ============================================================================

/// Bedrock Converse 채팅 모델
#[derive(Debug, Clone)]
pub struct BedrockChat {
    client: aws_sdk_bedrockruntime::Client,
    model_id: String,
    settings: ChatSettings,
}

impl BedrockChat {
    pub fn new(
        client: aws_sdk_bedrockruntime::Client,
        model_id: impl Into<String>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            settings,
        }
    }

    /// 리전/프로필 설정으로 클라이언트를 만들어 생성
    pub async fn connect(target: &BedrockTarget, model_id: impl Into<String>) -> Self {
        Self::new(target.client().await, model_id, ChatSettings::default())
    }
}

#[async_trait]
impl ChatModel for BedrockChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .context("Failed to build converse message")?;

        let inference = InferenceConfiguration::builder()
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens)
            .build();

        tracing::debug!(
            "Converse request: model={}, prompt={} chars",
            self.model_id,
            prompt.len()
        );

        let output = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(message)
            .inference_config(inference)
            .send()
            .await
            .map_err(|e| anyhow!(describe_sdk_error(&e)))?;

        tracing::debug!("Converse stop reason: {:?}", output.stop_reason());

        match output.output() {
            Some(ConverseOutput::Message(reply)) => Ok(collect_text(reply.content())),
            _ => anyhow::bail!("Model {} returned no message", self.model_id),
        }
    }

    fn name(&self) -> &str {
        &self.model_id
    }
}

/// 응답의 텍스트 블록만 이어붙임
fn collect_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(|block| block.as_text().ok())
        .map(String::as_str)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
