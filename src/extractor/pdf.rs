//! PDF 텍스트 추출 모듈
//!
//! pdf-extract 크레이트로 페이지 단위 텍스트를 추출합니다.

use std::path::Path;

use anyhow::{Context, Result};

use super::Page;

/// PDF에서 페이지 목록 추출 (동기)
///
/// 페이지 번호는 1부터 시작하며, 텍스트가 없는 페이지도 번호를 유지합니다.
pub fn extract_pages(path: &Path) -> Result<Vec<Page>> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read PDF: {:?}", path))?;

    let pages: Vec<Page> = pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .with_context(|| format!("Failed to extract text from PDF: {:?}", path))?
        .into_iter()
        .enumerate()
        .map(|(i, text)| Page { number: i + 1, text })
        .collect();

    if pages.iter().all(|p| p.text.trim().is_empty()) {
        tracing::warn!(
            "No text extracted from PDF: {:?}. It might be a scanned document.",
            path
        );
    }

    Ok(pages)
}

// ============================================================================
// Tests
// ============================================================================
