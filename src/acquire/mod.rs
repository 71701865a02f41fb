//! Document Acquirer - 원본 PDF 다운로드 및 로컬 캐시
//!
//! 로컬 경로에 파일이 이미 있으면 네트워크 접근 없이 그대로 사용합니다.
//! 체크섬 검증, 재시도, 실패 시 부분 파일 정리는 하지 않습니다.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// 문서 다운로더
#[derive(Debug, Clone)]
pub struct DocumentAcquirer {
    client: reqwest::Client,
}

impl DocumentAcquirer {
    /// 기본 HTTP 클라이언트로 생성
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hr-rag/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("HTTP 클라이언트 생성 실패")?;

        Ok(Self::with_client(client))
    }

    /// 지정된 HTTP 클라이언트로 생성
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// `path`에 문서가 존재하도록 보장
    ///
    /// 파일이 없을 때만 `url`에서 내려받아 저장합니다.
    pub async fn acquire(&self, url: &str, path: &Path) -> Result<PathBuf> {
        let cached = tokio::fs::try_exists(path)
            .await
            .with_context(|| format!("Failed to check cached document {:?}", path))?;
        if cached {
            tracing::debug!("Using cached document: {:?}", path);
            return Ok(path.to_path_buf());
        }

        tracing::info!("Downloading {} -> {:?}", url, path);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", url))?
            .error_for_status()
            .with_context(|| format!("Download of {} returned an error status", url))?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }

        tokio::fs::write(path, &bytes)
            .await
            .with_context(|| format!("Failed to write {:?}", path))?;

        tracing::info!("Saved {} bytes to {:?}", bytes.len(), path);
        Ok(path.to_path_buf())
    }
}

// ============================================================================
// Tests
// ============================================================================
