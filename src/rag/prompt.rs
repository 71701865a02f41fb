//! 답변 생성 프롬프트

/// 검색된 패시지를 빈 줄로 구분하여 컨텍스트로 결합 (검색 순서 유지)
pub fn format_context<'a, I>(passages: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    passages.into_iter().collect::<Vec<_>>().join("\n\n")
}

/// HR 정책 질의 프롬프트
///
/// 컨텍스트에만 근거하여 답하고, 없으면 정보가 부족하다고 말하도록 지시합니다.
pub fn build_hr_prompt(question: &str, context: &str) -> String {
    format!(
        "You are an HR policy assistant.\n\
         Answer the question using ONLY the context. \
         If the answer is not in the context, say you don't have enough information.\n\n\
         Context:\n{}\n\n\
         Question: {}",
        context, question
    )
}
