//! Similarity Index - 인메모리 벡터 인덱스
//!
//! 모든 패시지 벡터를 메모리에 보관하고 코사인 유사도로 전수 비교합니다.
//! 한 번 구축된 뒤에는 변경되지 않습니다.

use anyhow::{Context, Result};

use crate::embedding::EmbeddingProvider;

use super::splitter::Passage;
use super::vector::{cosine_similarity, SearchResult, VectorEntry};

// ============================================================================
// SimilarityIndex
// ============================================================================

/// 불변 인메모리 유사도 인덱스
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    entries: Vec<VectorEntry>,
    dimension: usize,
}

impl SimilarityIndex {
    /// 패시지 전체를 `embed_batch` 한 번으로 임베딩하여 인덱스 구축
    pub async fn build(passages: Vec<Passage>, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        if passages.is_empty() {
            anyhow::bail!("Cannot build an index without passages");
        }

        tracing::debug!("Embedding {} passages with {}", passages.len(), embedder.name());

        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let embeddings = embedder
            .embed_batch(&texts)
            .await
            .context("Failed to embed passages")?;

        if embeddings.len() != passages.len() {
            anyhow::bail!(
                "Embedding provider returned {} vectors for {} passages",
                embeddings.len(),
                passages.len()
            );
        }

        let entries: Vec<VectorEntry> = passages
            .into_iter()
            .zip(embeddings)
            .map(|(passage, embedding)| VectorEntry { passage, embedding })
            .collect();

        let index = Self::from_entries(entries)?;
        tracing::info!(
            "Built similarity index: {} passages, {} dims ({})",
            index.len(),
            index.dimension(),
            embedder.name()
        );
        Ok(index)
    }

    /// 미리 계산된 엔트리로 인덱스 생성
    ///
    /// 모든 벡터의 차원이 같아야 합니다.
    pub fn from_entries(entries: Vec<VectorEntry>) -> Result<Self> {
        let dimension = match entries.first() {
            Some(entry) => entry.embedding.len(),
            None => anyhow::bail!("Cannot build an index without passages"),
        };

        if dimension == 0 {
            anyhow::bail!("Embedding vectors must not be empty");
        }

        if let Some(bad) = entries.iter().find(|e| e.embedding.len() != dimension) {
            anyhow::bail!(
                "Embedding dimension mismatch: passage {} has {} dims, expected {}",
                bad.passage.index,
                bad.embedding.len(),
                dimension
            );
        }

        Ok(Self { entries, dimension })
    }

    /// 쿼리 벡터와 가장 가까운 k개 패시지 (유사도 내림차순)
    ///
    /// 동점이면 삽입 순서를 유지합니다.
    pub fn query(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchResult<'_>>> {
        if query_embedding.len() != self.dimension {
            anyhow::bail!(
                "Query dimension {} does not match index dimension {}",
                query_embedding.len(),
                self.dimension
            );
        }

        let mut results: Vec<SearchResult<'_>> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                passage: &entry.passage,
                similarity: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        // sort_by는 안정 정렬
        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        results.truncate(k);

        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// 저장된 패시지 (삽입 순서)
    pub fn passages(&self) -> impl Iterator<Item = &Passage> {
        self.entries.iter().map(|e| &e.passage)
    }
}

// ============================================================================
// RagIndex
// ============================================================================

/// 질문 검색용 핸들 (인덱스 + 같은 임베딩 프로바이더)
///
/// 프로세스 수명 동안 한 번 구축하고 모든 질문에 재사용합니다.
pub struct RagIndex {
    index: SimilarityIndex,
    embedder: Box<dyn EmbeddingProvider>,
}

impl RagIndex {
    pub fn new(index: SimilarityIndex, embedder: Box<dyn EmbeddingProvider>) -> Self {
        Self { index, embedder }
    }

    /// 패시지를 임베딩하여 구축
    pub async fn build(passages: Vec<Passage>, embedder: Box<dyn EmbeddingProvider>) -> Result<Self> {
        let index = SimilarityIndex::build(passages, embedder.as_ref()).await?;
        Ok(Self::new(index, embedder))
    }

    /// 질문을 임베딩하여 상위 k개 패시지 검색
    pub async fn similarity_search(&self, question: &str, k: usize) -> Result<Vec<SearchResult<'_>>> {
        let query_embedding = self
            .embedder
            .embed(question)
            .await
            .context("Failed to embed question")?;
        self.index.query(&query_embedding, k)
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }
}

// ============================================================================
// Tests
// ============================================================================
