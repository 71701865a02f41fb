//! 임베딩 모듈 - Amazon Bedrock을 통한 텍스트 벡터화
//!
//! 텍스트를 벡터로 변환하는 임베딩 프로바이더입니다.
//! 패시지 인덱싱과 질문 검색 양쪽에서 같은 프로바이더를 사용해야 합니다.
//!
//! ## 사용법
//! ```rust,ignore
//! let target = BedrockTarget::new("us-west-2", "default");
//! let embedder = BedrockEmbedding::connect(&target, "amazon.titan-embed-text-v1").await;
//! let embedding = embedder.embed("How many paid leave days?").await?;
//! ```

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::primitives::Blob;
use serde::{Deserialize, Serialize};

use crate::bedrock::{describe_sdk_error, BedrockTarget};

// ============================================================================
// EmbeddingProvider Trait
// ============================================================================

/// 임베딩 프로바이더 트레이트
///
/// 텍스트를 고정 차원 벡터로 변환하는 인터페이스입니다.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// 단일 텍스트 임베딩
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// 배치 임베딩 (기본 구현: 순차 호출)
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// 프로바이더 이름
    fn name(&self) -> &str;
}

// ============================================================================
// Bedrock Titan Embedding
// ============================================================================

/// Titan 텍스트 임베딩 요청 본문
#[derive(Debug, Serialize)]
struct TitanEmbedRequest<'a> {
    #[serde(rename = "inputText")]
    input_text: &'a str,
}

/// Titan 텍스트 임베딩 응답
#[derive(Debug, Deserialize)]
struct TitanEmbedResponse {
    embedding: Vec<f32>,
    #[serde(rename = "inputTextTokenCount", default)]
    input_text_token_count: Option<u32>,
}

/// Bedrock 호스팅 임베딩 모델 (InvokeModel)
///
/// 캐시나 재시도 없이 매 호출마다 원격 모델을 호출합니다.
#[derive(Debug, Clone)]
pub struct BedrockEmbedding {
    client: aws_sdk_bedrockruntime::Client,
    model_id: String,
}

impl BedrockEmbedding {
    /// 기존 클라이언트로 생성
    pub fn new(client: aws_sdk_bedrockruntime::Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    /// 리전/프로필 설정으로 클라이언트를 만들어 생성
    pub async fn connect(target: &BedrockTarget, model_id: impl Into<String>) -> Self {
        Self::new(target.client().await, model_id)
    }
}

#[async_trait]
impl EmbeddingProvider for BedrockEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::to_vec(&TitanEmbedRequest { input_text: text })
            .context("Failed to encode embedding request")?;

        let output = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                anyhow!(
                    "Embedding request to {} failed: {}",
                    self.model_id,
                    describe_sdk_error(&e)
                )
            })?;

        let response: TitanEmbedResponse = serde_json::from_slice(output.body().as_ref())
            .context("Failed to parse embedding response")?;

        tracing::trace!(
            "Embedded {} chars ({:?} tokens) -> {} dims",
            text.len(),
            response.input_text_token_count,
            response.embedding.len()
        );

        if response.embedding.is_empty() {
            anyhow::bail!("Embedding model {} returned an empty vector", self.model_id);
        }

        Ok(response.embedding)
    }

    fn name(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Tests
// ============================================================================
