//! Amazon Bedrock 공통 설정
//!
//! 리전과 자격증명 프로필로 AWS SDK 설정을 로드합니다.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_bedrockruntime::error::DisplayErrorContext;

/// Bedrock 접속 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedrockTarget {
    pub region: String,
    pub profile: String,
}

impl BedrockTarget {
    pub fn new(region: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            profile: profile.into(),
        }
    }

    /// AWS SDK 설정 로드
    ///
    /// 자격증명은 `~/.aws/credentials`의 지정 프로필에서 읽습니다.
    pub async fn load_sdk_config(&self) -> SdkConfig {
        tracing::debug!(
            "Loading AWS config (region={}, profile={})",
            self.region,
            self.profile
        );

        aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .profile_name(&self.profile)
            .load()
            .await
    }

    /// Bedrock Runtime 클라이언트 생성
    pub async fn client(&self) -> aws_sdk_bedrockruntime::Client {
        aws_sdk_bedrockruntime::Client::new(&self.load_sdk_config().await)
    }
}

/// SDK 오류를 원인 체인 전체를 포함한 문자열로 변환
pub(crate) fn describe_sdk_error<E: std::error::Error>(err: &E) -> String {
    DisplayErrorContext(err).to_string()
}
