//! 문서 로딩 모듈
//!
//! 캐시된 PDF 파일을 페이지별 텍스트로 읽어들입니다.

pub mod pdf;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

// ============================================================================
// Document
// ============================================================================

/// 로드된 문서 (생성 후 불변)
#[derive(Debug, Clone)]
pub struct Document {
    /// 원본 파일 경로
    pub source: PathBuf,
    /// 페이지 목록 (문서 순서)
    pub pages: Vec<Page>,
}

/// 단일 페이지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 페이지 번호 (1부터 시작)
    pub number: usize,
    pub text: String,
}

impl Document {
    /// 전체 텍스트 길이 (문자 수)
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}

// ============================================================================
// Loader
// ============================================================================

/// PDF 파일을 문서로 로드
pub async fn load_pdf(path: &Path) -> Result<Document> {
    // PDF 추출은 CPU 바운드이므로 spawn_blocking 사용
    let owned = path.to_path_buf();
    let pages = tokio::task::spawn_blocking(move || pdf::extract_pages(&owned))
        .await
        .context("PDF extraction task failed")??;

    tracing::info!("Loaded {:?}: {} pages", path, pages.len());

    Ok(Document {
        source: path.to_path_buf(),
        pages,
    })
}

// ============================================================================
// Tests
// ============================================================================
