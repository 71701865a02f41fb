//! 설정 모듈 - 환경변수 기반 파이프라인 설정
//!
//! 모든 값은 선택 사항이며, 설정되지 않으면 기본값을 사용합니다.

use std::path::PathBuf;

use thiserror::Error;

use crate::knowledge::ChunkConfig;

// ============================================================================
// Defaults
// ============================================================================

/// 기본 문서 URL (UPL 인도 휴가 정책)
pub const DEFAULT_PDF_URL: &str =
    "https://www.upl-ltd.com/images/people/downloads/Leave-Policy-India.pdf";
/// 기본 로컬 캐시 경로
pub const DEFAULT_PDF_PATH: &str = "Leave-Policy-India.pdf";
pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_PROFILE: &str = "default";
/// Converse API를 지원하는 cross-region inference profile
pub const DEFAULT_LLM_MODEL_ID: &str = "us.anthropic.claude-3-5-sonnet-20240620-v1:0";
pub const DEFAULT_EMBED_MODEL_ID: &str = "amazon.titan-embed-text-v1";
pub const DEFAULT_TOP_K: usize = 4;

/// 환경변수 키
pub mod keys {
    pub const PDF_URL: &str = "HR_PDF_URL";
    pub const PDF_PATH: &str = "HR_PDF_PATH";
    pub const REGION: &str = "AWS_REGION";
    pub const PROFILE: &str = "AWS_PROFILE";
    pub const LLM_MODEL_ID: &str = "LLM_MODEL_ID";
    pub const EMBED_MODEL_ID: &str = "EMBED_MODEL_ID";
    pub const CHUNK_SIZE: &str = "CHUNK_SIZE";
    pub const CHUNK_OVERLAP: &str = "CHUNK_OVERLAP";
    pub const TOP_K: &str = "TOP_K";
}

// ============================================================================
// Errors
// ============================================================================

/// 설정 오류
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("invalid document URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({size})")]
    InvalidChunking { size: usize, overlap: usize },

    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("top-k must be at least 1")]
    ZeroTopK,
}

// ============================================================================
// RagConfig
// ============================================================================

/// 파이프라인 설정
#[derive(Debug, Clone, PartialEq)]
pub struct RagConfig {
    /// 원본 PDF URL
    pub pdf_url: String,
    /// 로컬 캐시 경로
    pub pdf_path: PathBuf,
    /// Bedrock 리전
    pub region: String,
    /// AWS 자격증명 프로필
    pub profile: String,
    /// 답변 생성 모델 ID
    pub llm_model_id: String,
    /// 임베딩 모델 ID
    pub embed_model_id: String,
    /// 청크 크기 (문자 수)
    pub chunk_size: usize,
    /// 청크 오버랩 (문자 수)
    pub chunk_overlap: usize,
    /// 질문당 검색할 패시지 수
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        let chunking = ChunkConfig::default();
        Self {
            pdf_url: DEFAULT_PDF_URL.to_string(),
            pdf_path: PathBuf::from(DEFAULT_PDF_PATH),
            region: DEFAULT_REGION.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            llm_model_id: DEFAULT_LLM_MODEL_ID.to_string(),
            embed_model_id: DEFAULT_EMBED_MODEL_ID.to_string(),
            chunk_size: chunking.chunk_size,
            chunk_overlap: chunking.chunk_overlap,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RagConfig {
    /// 프로세스 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 key → value 조회 함수로 설정 로드
    ///
    /// 빈 문자열은 미설정으로 취급합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            pdf_url: get(keys::PDF_URL).unwrap_or(defaults.pdf_url),
            pdf_path: get(keys::PDF_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.pdf_path),
            region: get(keys::REGION).unwrap_or(defaults.region),
            profile: get(keys::PROFILE).unwrap_or(defaults.profile),
            llm_model_id: get(keys::LLM_MODEL_ID).unwrap_or(defaults.llm_model_id),
            embed_model_id: get(keys::EMBED_MODEL_ID).unwrap_or(defaults.embed_model_id),
            chunk_size: parse_number(keys::CHUNK_SIZE, get(keys::CHUNK_SIZE))?
                .unwrap_or(defaults.chunk_size),
            chunk_overlap: parse_number(keys::CHUNK_OVERLAP, get(keys::CHUNK_OVERLAP))?
                .unwrap_or(defaults.chunk_overlap),
            top_k: parse_number(keys::TOP_K, get(keys::TOP_K))?.unwrap_or(defaults.top_k),
        };

        config.validate()?;
        Ok(config)
    }

    /// 설정 값 검증
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.pdf_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.pdf_url.clone(),
            source,
        })?;

        self.chunk_config().validate()?;

        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }

        Ok(())
    }

    /// 청킹 설정 추출
    pub fn chunk_config(&self) -> ChunkConfig {
        ChunkConfig {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
        }
    }
}

fn parse_number(key: &'static str, value: Option<String>) -> Result<Option<usize>, ConfigError> {
    value
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidNumber { key, value: v })
        })
        .transpose()
}

// ============================================================================
// Tests
// ============================================================================
