//! CLI 모듈
//!
//! hr-rag 명령어 정의 및 구현. 인덱스는 명령당 한 번만 구축하고
//! 모든 질문에 같은 핸들을 넘깁니다.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::RagConfig;
use crate::knowledge::RagIndex;
use crate::rag::{build_index, AnswerGenerator};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "hr-rag")]
#[command(version, about = "HR 정책 PDF 질의응답 (Bedrock RAG)", long_about = None)]
pub struct Cli {
    /// 원본 PDF URL (HR_PDF_URL 대신)
    #[arg(long, global = true)]
    pub pdf_url: Option<String>,

    /// 로컬 PDF 캐시 경로 (HR_PDF_PATH 대신)
    #[arg(long, global = true)]
    pub pdf_path: Option<PathBuf>,

    /// 질문당 검색할 패시지 수 (TOP_K 대신)
    #[arg(long, global = true)]
    pub top_k: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 질문 하나에 답변
    Ask {
        /// 질문
        question: String,
    },

    /// 대화형 질의응답 (인덱스는 최초 1회만 구축)
    Chat,

    /// 관련 패시지 검색
    Search {
        /// 검색 쿼리
        query: String,

        /// 결과 개수 제한
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// 설정 및 캐시 상태 확인
    Status,
}

impl Cli {
    /// 환경변수 설정에 CLI 옵션을 덮어써서 최종 설정 생성
    pub fn resolve_config(&self) -> Result<RagConfig> {
        let mut config = RagConfig::from_env().context("설정 로드 실패")?;

        if let Some(ref url) = self.pdf_url {
            config.pdf_url = url.clone();
        }
        if let Some(ref path) = self.pdf_path {
            config.pdf_path = path.clone();
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }

        config.validate().context("잘못된 설정")?;
        Ok(config)
    }
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    match cli.command {
        Commands::Ask { ref question } => cmd_ask(&config, question).await,
        Commands::Chat => cmd_chat(&config).await,
        Commands::Search { ref query, limit } => {
            cmd_search(&config, query, limit.unwrap_or(config.top_k)).await
        }
        Commands::Status => cmd_status(&config),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 인덱스 구축 (실패 시 치명적)
async fn build(config: &RagConfig) -> Result<RagIndex> {
    println!("[*] 벡터 데이터베이스 구축 중 (최초 1회)...");
    let index = build_index(config).await.context("인덱스 구축 실패")?;
    println!(
        "[OK] {} 패시지 인덱싱 완료 ({} 차원)",
        index.index().len(),
        index.index().dimension()
    );
    Ok(index)
}

/// 단일 질문 명령어 (ask)
async fn cmd_ask(config: &RagConfig, question: &str) -> Result<()> {
    let index = build(config).await?;
    let generator = AnswerGenerator::from_config(config).await;

    let answer = generator.answer(&index, question).await;
    println!();
    println!("{}", answer);

    Ok(())
}

/// 대화형 명령어 (chat)
///
/// 빈 입력은 백엔드 호출 없이 경고만 표시합니다.
async fn cmd_chat(config: &RagConfig) -> Result<()> {
    let index = build(config).await?;
    let generator = AnswerGenerator::from_config(config).await;

    println!("PDF → 패시지 → Titan 임베딩 → 인메모리 인덱스 → 검색 → Claude (Bedrock Converse)");
    println!("휴가 정책에 대해 질문하세요. 종료: exit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\n> ");
        std::io::stdout().flush().context("stdout flush 실패")?;

        let Some(line) = lines.next_line().await.context("입력 읽기 실패")? else {
            break;
        };

        let question = line.trim();
        if matches!(question, "exit" | "quit") {
            break;
        }
        if question.is_empty() {
            println!("[!] 질문을 먼저 입력하세요.");
            continue;
        }

        let answer = generator.answer(&index, question).await;
        println!("{}", answer);
    }

    Ok(())
}

/// 검색 명령어 (search)
async fn cmd_search(config: &RagConfig, query: &str, limit: usize) -> Result<()> {
    let index = build(config).await?;

    println!("[*] 검색 중: \"{}\"", query);
    let results = index
        .similarity_search(query, limit)
        .await
        .context("검색 실패")?;

    if results.is_empty() {
        println!("\n[!] 검색 결과가 없습니다.");
        return Ok(());
    }

    println!("\n[OK] 검색 결과 ({} 건):\n", results.len());

    for (i, result) in results.iter().enumerate() {
        println!(
            "{}. [유사도: {:.4}] Page {} / Passage #{}",
            i + 1,
            result.similarity,
            result.passage.page,
            result.passage.index
        );
        println!("   내용: {}", truncate_text(&result.passage.text, 200));
        println!();
    }

    Ok(())
}

/// 상태 명령어 (status)
fn cmd_status(config: &RagConfig) -> Result<()> {
    println!("hr-rag v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("[*] 문서 URL: {}", config.pdf_url);
    if config.pdf_path.exists() {
        println!("[OK] 로컬 캐시: {} (있음)", config.pdf_path.display());
    } else {
        println!("[!] 로컬 캐시: {} (없음, 최초 실행 시 다운로드)", config.pdf_path.display());
    }

    println!("[*] 리전: {} / 프로필: {}", config.region, config.profile);
    println!("[*] 채팅 모델: {}", config.llm_model_id);
    println!("[*] 임베딩 모델: {}", config.embed_model_id);
    println!(
        "[*] 청크: {} / 오버랩: {} / top-k: {}",
        config.chunk_size, config.chunk_overlap, config.top_k
    );

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 공백을 한 칸으로 접고 글자 수 기준으로 자르기 (UTF-8 안전)
fn truncate_text(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");

    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

// ============================================================================
// Tests
// ============================================================================
