//! hr-rag CLI 진입점

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // 로깅 초기화
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // CLI 실행
    let cli = hr_rag::cli::Cli::parse();

    // 모든 호출은 순차 실행되므로 단일 스레드 런타임 사용
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(hr_rag::cli::run(cli))
}
