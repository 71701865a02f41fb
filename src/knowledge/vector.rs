//! Vector 유틸리티 - 벡터 엔트리, 검색 결과, 코사인 유사도

use super::splitter::Passage;

// ============================================================================
// Types
// ============================================================================

/// 인덱스 엔트리 (패시지 + 임베딩)
#[derive(Debug, Clone)]
pub struct VectorEntry {
    pub passage: Passage,
    pub embedding: Vec<f32>,
}

/// 검색 결과
///
/// 인덱스가 소유한 패시지를 빌려옵니다.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult<'a> {
    pub passage: &'a Passage,
    /// 코사인 유사도 (-1.0 ~ 1.0)
    pub similarity: f32,
}

// ============================================================================
// Utility Functions
// ============================================================================

/// 코사인 유사도 계산
///
/// 한 번의 순회로 내적과 두 노름을 함께 누적합니다.
/// 길이가 다르거나 영벡터가 포함되면 0.0, 그 외에는 [-1.0, 1.0] 범위의 값을 반환합니다.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let (dot, sq_a, sq_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, sq_a, sq_b), (&x, &y)| {
            (dot + x * y, sq_a + x * x, sq_b + y * y)
        });

    let denominator = (sq_a * sq_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    // 부동소수점 오차로 범위를 벗어나지 않도록 고정
    (dot / denominator).clamp(-1.0, 1.0)
}

// ============================================================================
// Tests
// ============================================================================
