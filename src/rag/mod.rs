//! RAG 파이프라인 - 인덱스 구축 및 답변 생성
//!
//! 인덱스는 `build_index`로 프로세스당 한 번 구축하고, 질문마다
//! `AnswerGenerator::answer`에 같은 핸들을 빌려줍니다.
//!
//! 질문 처리 상태:
//! `Idle → ValidatingInput → {RejectedEmpty | Retrieving → Generating → {Answered | Failed}}`

pub mod prompt;

use std::fmt;

use anyhow::{Context, Result};

use crate::acquire::DocumentAcquirer;
use crate::bedrock::BedrockTarget;
use crate::config::RagConfig;
use crate::embedding::{BedrockEmbedding, EmbeddingProvider};
use crate::extractor::{self, Document};
use crate::knowledge::{Chunker, RagIndex, RecursiveSplitter};
use crate::llm::{BedrockChat, ChatModel};

use self::prompt::{build_hr_prompt, format_context};

/// 빈 질문에 대한 고정 응답
pub const EMPTY_QUESTION_MESSAGE: &str = "Ask a non-empty question.";
/// 백엔드 오류 응답 접두어
pub const BACKEND_ERROR_PREFIX: &str = "Bedrock error";

// ============================================================================
// Answer
// ============================================================================

/// 질문 처리 결과
///
/// 어떤 경우에도 화면에 그대로 표시할 수 있는 문자열을 제공합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// 빈 질문 (검색/모델 호출 없음)
    Rejected,
    /// 모델 응답 원문
    Answered(String),
    /// 검색 또는 모델 호출 실패
    BackendError(String),
}

impl Answer {
    /// 표시용 문자열
    pub fn text(&self) -> String {
        self.to_string()
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Answer::Answered(_))
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Rejected => f.write_str(EMPTY_QUESTION_MESSAGE),
            Answer::Answered(text) => f.write_str(text),
            Answer::BackendError(message) => write!(f, "{}: {}", BACKEND_ERROR_PREFIX, message),
        }
    }
}

// ============================================================================
// AnswerGenerator
// ============================================================================

/// 검색 + 채팅 모델로 답변 생성
pub struct AnswerGenerator {
    chat: Box<dyn ChatModel>,
    top_k: usize,
}

impl AnswerGenerator {
    pub fn new(chat: Box<dyn ChatModel>, top_k: usize) -> Self {
        Self { chat, top_k }
    }

    /// 설정의 리전/프로필/모델로 Bedrock 채팅 모델 연결
    pub async fn from_config(config: &RagConfig) -> Self {
        let target = BedrockTarget::new(&config.region, &config.profile);
        let chat = BedrockChat::connect(&target, &config.llm_model_id).await;
        Self::new(Box::new(chat), config.top_k)
    }

    /// 질문에 답변
    ///
    /// 오류를 반환하지 않으며, 실패는 `Answer::BackendError`로 변환됩니다.
    pub async fn answer(&self, index: &RagIndex, question: &str) -> Answer {
        tracing::debug!("ValidatingInput");
        let question = question.trim();
        if question.is_empty() {
            tracing::debug!("RejectedEmpty");
            return Answer::Rejected;
        }

        match self.generate(index, question).await {
            Ok(text) => {
                tracing::debug!("Answered ({} chars)", text.len());
                Answer::Answered(text)
            }
            Err(e) => {
                tracing::warn!("Answer generation failed: {:#}", e);
                Answer::BackendError(format!("{:#}", e))
            }
        }
    }

    /// 검색된 컨텍스트로 프롬프트 구성 (검색까지만 수행)
    pub async fn compose_prompt(&self, index: &RagIndex, question: &str) -> Result<String> {
        tracing::debug!("Retrieving top {} passages", self.top_k);
        let results = index.similarity_search(question, self.top_k).await?;
        let context = format_context(results.iter().map(|r| r.passage.text.as_str()));
        Ok(build_hr_prompt(question, &context))
    }

    async fn generate(&self, index: &RagIndex, question: &str) -> Result<String> {
        let prompt = self.compose_prompt(index, question).await?;

        tracing::debug!("Generating with {}", self.chat.name());
        self.chat.complete(&prompt).await
    }
}

// ============================================================================
// Index Construction
// ============================================================================

/// 설정으로부터 인덱스 구축: 다운로드 → 로드 → 분할 → 임베딩
///
/// 모든 실패는 호출자에게 전파됩니다.
pub async fn build_index(config: &RagConfig) -> Result<RagIndex> {
    config.validate()?;

    let acquirer = DocumentAcquirer::new()?;
    let path = acquirer
        .acquire(&config.pdf_url, &config.pdf_path)
        .await
        .context("Failed to acquire source document")?;

    let document = extractor::load_pdf(&path)
        .await
        .context("Failed to load source document")?;

    let target = BedrockTarget::new(&config.region, &config.profile);
    let embedder = BedrockEmbedding::connect(&target, &config.embed_model_id).await;

    build_index_from_document(&document, config, Box::new(embedder)).await
}

/// 로드된 문서로부터 인덱스 구축
pub async fn build_index_from_document(
    document: &Document,
    config: &RagConfig,
    embedder: Box<dyn EmbeddingProvider>,
) -> Result<RagIndex> {
    let splitter = RecursiveSplitter::new(config.chunk_config())?;
    let passages = splitter.split_document(document);

    tracing::info!(
        "Split {:?} ({} pages, {} chars) into {} passages (size={}, overlap={})",
        document.source,
        document.pages.len(),
        document.char_count(),
        passages.len(),
        config.chunk_size,
        config.chunk_overlap
    );

    RagIndex::build(passages, embedder)
        .await
        .context("Failed to build similarity index")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::extractor::Page;
    use crate::knowledge::{Passage, SimilarityIndex, VectorEntry};
    use crate::testing::{FailingChat, KeywordEmbedding, RecordingChat};

    const LEAVE_SENTENCE: &str = "Employees are entitled to 18 days of paid leave annually.";

    fn policy_document() -> Document {
        Document {
            source: PathBuf::from("Leave-Policy-India.pdf"),
            pages: vec![
                Page {
                    number: 1,
                    text: "Scope. This policy covers permanent staff across all Indian offices.\n\n\
                           Working hours are nine to six from Monday through Friday.\n\n\
                           Holiday calendar is published by the corporate office each December."
                        .to_string(),
                },
                Page {
                    number: 2,
                    text: format!(
                        "Sick absence beyond two consecutive working dates needs a medical certificate.\n\n\
                         {} Unused balance may be carried forward.\n\n\
                         Travel claims must be submitted within thirty calendar weeks.",
                        LEAVE_SENTENCE
                    ),
                },
                Page {
                    number: 3,
                    text: "Maternity benefits follow the statutory act.\n\n\
                           Grievances should be raised with the regional manager in writing.\n\n\
                           This document is reviewed yearly by the compliance team."
                        .to_string(),
                },
            ],
        }
    }

    fn small_chunks() -> RagConfig {
        RagConfig {
            chunk_size: 120,
            chunk_overlap: 30,
            ..RagConfig::default()
        }
    }

    async fn policy_index() -> RagIndex {
        build_index_from_document(
            &policy_document(),
            &small_chunks(),
            Box::new(KeywordEmbedding::default()),
        )
        .await
        .unwrap()
    }

    /// 임베딩 호출 수를 외부에서 확인할 수 있도록 공유
    struct SharedEmbedding(Arc<KeywordEmbedding>);

    #[async_trait]
    impl EmbeddingProvider for SharedEmbedding {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.0.embed(text).await
        }

        fn name(&self) -> &str {
            self.0.name()
        }
    }

    #[test]
    fn test_answer_display() {
        assert_eq!(Answer::Rejected.text(), "Ask a non-empty question.");
        assert_eq!(Answer::Answered("18 days".into()).text(), "18 days");
        assert_eq!(
            Answer::BackendError("model not enabled".into()).text(),
            "Bedrock error: model not enabled"
        );
        assert!(Answer::Answered(String::new()).is_answered());
        assert!(!Answer::Rejected.is_answered());
    }

    #[tokio::test]
    async fn test_end_to_end_paid_leave() {
        let index = policy_index().await;
        assert!(index.index().len() > 4);

        let results = index
            .similarity_search("How many paid leave days do employees get?", 4)
            .await
            .unwrap();
        assert!(results
            .iter()
            .any(|r| r.passage.text.contains(LEAVE_SENTENCE)));

        let chat = Arc::new(RecordingChat::new("Employees get 18 days of paid leave per year."));
        let generator = AnswerGenerator::new(Box::new(ArcChat(chat.clone())), 4);

        let answer = generator
            .answer(&index, "  How many paid leave days do employees get?\n")
            .await;
        assert_eq!(
            answer,
            Answer::Answered("Employees get 18 days of paid leave per year.".into())
        );

        let prompts = chat.prompts();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        let context = prompt
            .split_once("Context:\n")
            .and_then(|(_, rest)| rest.split_once("\n\nQuestion: "))
            .map(|(context, _)| context)
            .unwrap();
        assert!(context.contains(LEAVE_SENTENCE));
        assert!(prompt.ends_with("Question: How many paid leave days do employees get?"));
        assert!(prompt.contains("using ONLY the context"));
        assert!(prompt.contains("don't have enough information"));
    }

    #[tokio::test]
    async fn test_empty_question_skips_retrieval_and_model() {
        let embedder = Arc::new(KeywordEmbedding::default());
        let index = build_index_from_document(
            &policy_document(),
            &small_chunks(),
            Box::new(SharedEmbedding(embedder.clone())),
        )
        .await
        .unwrap();
        let calls_after_build = embedder.calls();

        let chat = Arc::new(RecordingChat::new("unused"));
        let generator = AnswerGenerator::new(Box::new(ArcChat(chat.clone())), 4);

        for question in ["", "   ", "\n\t"] {
            let answer = generator.answer(&index, question).await;
            assert_eq!(answer, Answer::Rejected);
            assert_eq!(answer.text(), EMPTY_QUESTION_MESSAGE);
        }

        assert_eq!(embedder.calls(), calls_after_build);
        assert!(chat.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_chat_failure_is_contained() {
        let index = policy_index().await;
        let generator = AnswerGenerator::new(Box::new(FailingChat), 4);

        let answer = generator.answer(&index, "How many paid leave days?").await;
        match &answer {
            Answer::BackendError(message) => assert!(message.contains("AccessDeniedException")),
            other => panic!("expected backend error, got {:?}", other),
        }
        assert!(answer.text().starts_with("Bedrock error: "));
    }

    #[tokio::test]
    async fn test_retrieval_failure_is_contained() {
        // 인덱스 차원(3)과 다른 질문 임베딩을 만들어 검색 실패를 유도
        let index = RagIndex::new(
            SimilarityIndex::from_entries(vec![VectorEntry {
                passage: Passage {
                    index: 0,
                    page: 1,
                    start: 0,
                    end: 4,
                    text: "text".to_string(),
                },
                embedding: vec![1.0, 0.0, 0.0],
            }])
            .unwrap(),
            Box::new(KeywordEmbedding::default()),
        );

        let chat = Arc::new(RecordingChat::new("unused"));
        let generator = AnswerGenerator::new(Box::new(ArcChat(chat.clone())), 4);

        let answer = generator.answer(&index, "anything").await;
        assert!(matches!(answer, Answer::BackendError(_)));
        assert!(answer.text().contains("dimension"));
        assert!(chat.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_index_is_reused_across_questions() {
        let embedder = Arc::new(KeywordEmbedding::default());
        let index = build_index_from_document(
            &policy_document(),
            &small_chunks(),
            Box::new(SharedEmbedding(embedder.clone())),
        )
        .await
        .unwrap();
        let passages = index.index().len();
        assert_eq!(embedder.calls(), passages);

        let generator = AnswerGenerator::new(Box::new(RecordingChat::new("ok")), 2);
        for _ in 0..3 {
            assert!(generator.answer(&index, "working hours").await.is_answered());
        }

        // 질문마다 질문 임베딩 1회만 추가
        assert_eq!(embedder.calls(), passages + 3);
    }

    #[tokio::test]
    async fn test_compose_prompt_respects_top_k() {
        let index = policy_index().await;
        let generator = AnswerGenerator::new(Box::new(RecordingChat::new("ok")), 1);
        let question = "How many paid leave days do employees get?";

        let prompt = generator.compose_prompt(&index, question).await.unwrap();
        let top = index.similarity_search(question, 1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(prompt, build_hr_prompt(question, &top[0].passage.text));
        assert!(top[0].passage.text.contains(LEAVE_SENTENCE));
    }

    #[tokio::test]
    async fn test_empty_document_fails_to_build() {
        let document = Document {
            source: PathBuf::from("scan.pdf"),
            pages: vec![Page {
                number: 1,
                text: String::new(),
            }],
        };
        let result = build_index_from_document(
            &document,
            &RagConfig::default(),
            Box::new(KeywordEmbedding::default()),
        )
        .await;
        assert!(result.is_err());
    }

    /// 테스트에서 기록을 확인하기 위한 Arc 래퍼
    struct ArcChat(Arc<RecordingChat>);

    #[async_trait]
    impl ChatModel for ArcChat {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.0.complete(prompt).await
        }

        fn name(&self) -> &str {
            self.0.name()
        }
    }
}
