//! 테스트용 인프로세스 프로바이더

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::llm::ChatModel;

const BUCKETS: usize = 256;

/// 단어 해시 기반 결정적 임베딩 (bag-of-words)
#[derive(Debug, Default)]
pub struct KeywordEmbedding {
    calls: AtomicUsize,
}

impl KeywordEmbedding {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn fnv1a(word: &str) -> usize {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in word.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    (hash % BUCKETS as u64) as usize
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut vector = vec![0.0; BUCKETS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            vector[fnv1a(&word.to_lowercase())] += 1.0;
        }
        Ok(vector)
    }

    fn name(&self) -> &str {
        "keyword-hash"
    }
}

/// 항상 실패하는 임베딩
#[derive(Debug, Default)]
pub struct FailingEmbedding;

#[async_trait]
impl EmbeddingProvider for FailingEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        anyhow::bail!("ExpiredTokenException: the security token included in the request is expired")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// 받은 프롬프트를 기록하고 고정 답변을 반환하는 채팅 모델
#[derive(Debug)]
pub struct RecordingChat {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingChat {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for RecordingChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// 항상 실패하는 채팅 모델
#[derive(Debug, Default)]
pub struct FailingChat;

#[async_trait]
impl ChatModel for FailingChat {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("AccessDeniedException: You don't have access to the model with the specified model ID")
    }

    fn name(&self) -> &str {
        "failing"
    }
}
