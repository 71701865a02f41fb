//! Knowledge 모듈 - 패시지 분할 및 인메모리 유사도 인덱스
//!
//! - Splitter: 문단/줄/공백/문자 순서의 재귀 분할
//! - Vector: 벡터 엔트리와 코사인 유사도
//! - Index: 한 번 구축 후 불변인 검색 인덱스

mod index;
mod splitter;
mod vector;

// Re-exports
pub use index::{RagIndex, SimilarityIndex};
pub use splitter::{ChunkConfig, Chunker, Passage, RecursiveSplitter};
pub use vector::{cosine_similarity, SearchResult, VectorEntry};
