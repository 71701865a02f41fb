//! hr-rag - PDF 기반 HR 정책 질의응답 RAG
//!
//! PDF 다운로드 → 패시지 분할 → Bedrock 임베딩 → 인메모리 인덱스 →
//! 상위 K개 검색 → Bedrock 채팅 모델 답변 생성

pub mod acquire;
pub mod bedrock;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod extractor;
pub mod knowledge;
pub mod llm;
pub mod rag;

#[cfg(test)]
mod testing;

// Re-exports
pub use acquire::DocumentAcquirer;
pub use bedrock::BedrockTarget;
pub use config::{ConfigError, RagConfig};
pub use embedding::{BedrockEmbedding, EmbeddingProvider};
pub use extractor::{load_pdf, Document, Page};
pub use knowledge::{
    cosine_similarity, ChunkConfig, Chunker, Passage, RagIndex, RecursiveSplitter, SearchResult,
    SimilarityIndex, VectorEntry,
};
pub use llm::{BedrockChat, ChatModel, ChatSettings};
pub use rag::{build_index, build_index_from_document, Answer, AnswerGenerator};
