//! Passage Splitter
//!
//! 페이지 텍스트를 겹치는 고정 크기 패시지로 분할합니다.
//! 문단 → 줄 → 공백 → 문자 순서로 구분자를 적용하여
//! 가능한 한 문서 구조를 존중합니다.

use std::collections::VecDeque;
use std::ops::Range;

use crate::config::ConfigError;
use crate::extractor::Document;

/// 구분자 우선순위 (빈 문자열 = 문자 단위)
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

// ============================================================================
// Chunk Configuration
// ============================================================================

/// 청킹 설정 (길이 단위: 유니코드 문자)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// 패시지 최대 길이
    pub chunk_size: usize,
    /// 이웃 패시지와의 최대 오버랩
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 150,
        }
    }
}

impl ChunkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::InvalidChunking {
                size: self.chunk_size,
                overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Passage
// ============================================================================

/// 검색 단위가 되는 문서 구간
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    /// 문서 전체에서의 순서 (0-based)
    pub index: usize,
    /// 페이지 번호 (1-based)
    pub page: usize,
    /// 페이지 텍스트 내 바이트 범위
    pub start: usize,
    pub end: usize,
    /// 패시지 텍스트 (앞뒤 공백 제거됨)
    pub text: String,
}

// ============================================================================
// Chunker Trait
// ============================================================================

/// 텍스트 분할 전략 트레이트
pub trait Chunker: Send + Sync {
    /// 텍스트를 패시지 바이트 범위 목록으로 분할
    fn split_text(&self, text: &str) -> Vec<Range<usize>>;

    /// 분할기 이름
    fn name(&self) -> &'static str;

    /// 문서 전체를 페이지별로 분할
    ///
    /// 패시지는 페이지 경계를 넘지 않으며, 문서 순서대로 번호가 매겨집니다.
    fn split_document(&self, document: &Document) -> Vec<Passage> {
        let mut passages = Vec::new();

        for page in &document.pages {
            for range in self.split_text(&page.text) {
                passages.push(Passage {
                    index: passages.len(),
                    page: page.number,
                    text: page.text[range.clone()].to_string(),
                    start: range.start,
                    end: range.end,
                });
            }
        }

        tracing::debug!(
            "{} produced {} passages from {} pages",
            self.name(),
            passages.len(),
            document.pages.len()
        );

        passages
    }
}

// ============================================================================
// RecursiveSplitter
// ============================================================================

/// 재귀 구분자 분할기
///
/// 현재 구간에 존재하는 첫 번째 구분자로 조각을 나누고(구분자는 다음 조각의
/// 앞에 붙음), `chunk_size`보다 짧은 조각은 탐욕적으로 병합합니다.
/// `chunk_size` 이상인 조각은 남은 구분자로 다시 분할합니다.
pub struct RecursiveSplitter {
    config: ChunkConfig,
}

impl RecursiveSplitter {
    /// 검증된 설정으로 생성
    pub fn new(config: ChunkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// `range` 구간을 `separators`로 재귀 분할
    fn split_range(
        &self,
        text: &str,
        range: Range<usize>,
        separators: &[&str],
        out: &mut Vec<Range<usize>>,
    ) {
        let segment = &text[range.clone()];

        // 구간에 존재하는 첫 번째 구분자 선택
        let (separator, remaining) = match separators
            .iter()
            .position(|sep| sep.is_empty() || segment.contains(sep))
        {
            Some(i) => (separators[i], &separators[i + 1..]),
            None => ("", &[][..]),
        };

        let pieces = split_keep_separator(segment, separator, range.start);

        let mut good: Vec<Range<usize>> = Vec::new();
        for piece in pieces {
            if char_len(text, &piece) < self.config.chunk_size {
                good.push(piece);
                continue;
            }

            if !good.is_empty() {
                self.merge_pieces(text, &good, out);
                good.clear();
            }

            if remaining.is_empty() {
                out.push(piece);
            } else {
                self.split_range(text, piece, remaining, out);
            }
        }

        if !good.is_empty() {
            self.merge_pieces(text, &good, out);
        }
    }

    /// 연속된 작은 조각들을 오버랩을 유지하며 패시지로 병합
    fn merge_pieces(&self, text: &str, pieces: &[Range<usize>], out: &mut Vec<Range<usize>>) {
        let ChunkConfig {
            chunk_size,
            chunk_overlap,
        } = self.config;

        let mut current: VecDeque<(Range<usize>, usize)> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(text, piece);

            if total + len > chunk_size && !current.is_empty() {
                push_trimmed(text, span(&current), out);

                // 오버랩 이하가 되고 다음 조각이 들어갈 때까지 앞쪽 조각 제거
                while total > chunk_overlap || (total + len > chunk_size && total > 0) {
                    match current.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            current.push_back((piece.clone(), len));
            total += len;
        }

        if !current.is_empty() {
            push_trimmed(text, span(&current), out);
        }
    }
}

impl Chunker for RecursiveSplitter {
    fn split_text(&self, text: &str) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        if text.trim().is_empty() {
            return out;
        }
        self.split_range(text, 0..text.len(), &SEPARATORS, &mut out);
        out
    }

    fn name(&self) -> &'static str {
        "RecursiveSplitter"
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 구분자로 나누되 구분자를 다음 조각의 시작에 유지 (빈 조각 제외)
///
/// 빈 구분자는 문자 단위 분할을 의미합니다. 반환 범위는 `base` 기준 절대 오프셋입니다.
fn split_keep_separator(segment: &str, separator: &str, base: usize) -> Vec<Range<usize>> {
    if separator.is_empty() {
        return segment
            .char_indices()
            .map(|(i, c)| base + i..base + i + c.len_utf8())
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (pos, _) in segment.match_indices(separator) {
        if pos > start {
            pieces.push(base + start..base + pos);
        }
        start = pos;
    }
    if segment.len() > start {
        pieces.push(base + start..base + segment.len());
    }
    pieces
}

#[inline]
fn char_len(text: &str, range: &Range<usize>) -> usize {
    text[range.clone()].chars().count()
}

/// 연속 조각들의 전체 범위
fn span(current: &VecDeque<(Range<usize>, usize)>) -> Range<usize> {
    match (current.front(), current.back()) {
        (Some((first, _)), Some((last, _))) => first.start..last.end,
        _ => 0..0,
    }
}

/// 앞뒤 공백을 제거한 범위를 추가 (비어있으면 무시)
fn push_trimmed(text: &str, range: Range<usize>, out: &mut Vec<Range<usize>>) {
    let slice = &text[range.clone()];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let start = range.start + (slice.len() - slice.trim_start().len());
    out.push(start..start + trimmed.len());
}

// ============================================================================
// Tests
// ============================================================================
