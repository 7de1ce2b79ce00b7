//! Prompt templates.
//!
//! Every act prompt embeds its context blocks, then the optional steering
//! instruction, then five requirements: the character-count window,
//! continuity with what came before, and three lines describing the act's
//! narrative function.

use storyarc_core::{ActLabel, Adjustment, TargetWindow};

/// Words of Setup carried into the Twist prompt.
pub const SETUP_SUMMARY_WORDS: usize = 100;

/// Analysis request for a submitted script.
pub fn analysis(script: &str) -> String {
    format!(
        "아래 대본을 분석해주세요:\n\
         1. 등장인물 목록과 특징\n\
         2. 스토리의 기승전결 구조\n\
         3. 주요 내러티브와 테마\n\
         \n\
         대본:\n\
         {script}\n\
         \n\
         분석 결과는 마크다운 형식으로 깔끔하게 정리해주세요."
    )
}

/// Revised story proposal from the analysis and user feedback.
pub fn revision(analysis: &str, feedback: &str) -> String {
    format!(
        "원본 분석:\n\
         {analysis}\n\
         \n\
         사용자 제안사항:\n\
         {feedback}\n\
         \n\
         위 내용을 바탕으로 수정된 이야기를 제안해주세요.\n\
         결과는 마크다운 형식으로 깔끔하게 정리해주세요."
    )
}

/// First `words` whitespace-separated words of `text`, followed by `...`.
///
/// ```
/// use storyarc_narrative::prompts::opening_summary;
///
/// assert_eq!(opening_summary("하나 둘\n셋 넷", 3), "하나 둘 셋...");
/// assert_eq!(opening_summary("", 3), "");
/// ```
pub fn opening_summary(text: &str, words: usize) -> String {
    let opening: Vec<&str> = text.split_whitespace().take(words).collect();
    if opening.is_empty() {
        return String::new();
    }
    format!("{}...", opening.join(" "))
}

/// Context an act prompt draws from.
///
/// Each act reads only the fields it needs; see [`act`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ActContext<'a> {
    /// Script analysis
    pub analysis: &'a str,
    /// Revised story proposal
    pub revision: &'a str,
    /// Setup content
    pub setup: &'a str,
    /// Development content
    pub development: &'a str,
    /// Twist content
    pub twist: &'a str,
    /// Steering instruction, possibly empty
    pub steering: &'a str,
}

/// Prompt for generating `label` within `window`.
///
/// | Act | Context |
/// |---|---|
/// | Setup | analysis, revision |
/// | Development | analysis, revision, Setup |
/// | Twist | opening of Setup, Development |
/// | Resolution | Twist |
pub fn act(label: ActLabel, context: &ActContext<'_>, window: TargetWindow) -> String {
    let blocks = match label {
        ActLabel::Setup => vec![
            ("원본 대본 분석", context.analysis.to_string()),
            ("수정된 스토리 제안", context.revision.to_string()),
        ],
        ActLabel::Development => vec![
            ("원본 대본 분석", context.analysis.to_string()),
            ("수정된 스토리 제안", context.revision.to_string()),
            ("기 파트 내용", context.setup.to_string()),
        ],
        ActLabel::Twist => vec![
            (
                "기 파트 내용 요약",
                opening_summary(context.setup, SETUP_SUMMARY_WORDS),
            ),
            ("승 파트 내용", context.development.to_string()),
        ],
        ActLabel::Resolution => vec![("전 파트 내용", context.twist.to_string())],
    };

    let mut prompt = blocks
        .iter()
        .map(|(heading, body)| format!("{heading}:\n{body}"))
        .collect::<Vec<_>>()
        .join("\n\n");

    if !context.steering.trim().is_empty() {
        prompt.push_str(&format!("\n\n추가 지시사항:\n{}", context.steering));
    }

    let name = label.korean();
    prompt.push_str(&format!(
        "\n\n위 내용을 바탕으로 이야기의 '{name}' 부분을 작성해주세요.\n\n요구사항:\n"
    ));
    for (index, requirement) in requirements(label, window).iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", index + 1, requirement));
    }
    prompt.push_str(&format!("\n'{name}' 파트를 작성해주세요."));
    prompt
}

fn requirements(label: ActLabel, window: TargetWindow) -> [String; 5] {
    let length = format!(
        "한글 기준 {}-{}자 (공백, 특수문자 제외)",
        window.lower(),
        window.upper()
    );
    let [continuity, a, b, c] = match label {
        ActLabel::Setup => [
            "원본 분석과 수정된 스토리 제안을 반영하여 작성",
            "인물, 배경, 세계관 소개",
            "상황과 문제 제시",
            "독자의 관심을 끄는 도입부",
        ],
        ActLabel::Development => [
            "기 파트의 내용과 자연스럽게 연결",
            "갈등과 문제의 심화",
            "인물들의 행동과 반응",
            "긴장감 조성",
        ],
        ActLabel::Twist => [
            "승 파트의 내용과 자연스럽게 연결",
            "극적인 반전이나 전환점 포함",
            "인물의 중요한 결정이나 깨달음",
            "이야기의 방향 전환",
        ],
        ActLabel::Resolution => [
            "전 파트의 내용과 자연스럽게 연결",
            "모든 갈등과 문제의 해결",
            "캐릭터 아크의 완성",
            "이야기의 주제와 메시지를 강조하는 마무리",
        ],
    };
    [
        length,
        continuity.to_string(),
        a.to_string(),
        b.to_string(),
        c.to_string(),
    ]
}

/// Follow-up asking the model to resize `content` into `window`.
pub fn correction(
    adjustment: Adjustment,
    count: usize,
    window: TargetWindow,
    content: &str,
) -> String {
    format!(
        "이전 내용을 {} 정확히 {}-{}자 사이로 조정해주세요.\n\
         현재 글자수: {}\n\
         목표 글자수: {}\n\
         \n\
         내용:\n\
         {}",
        adjustment.instruction(),
        window.lower(),
        window.upper(),
        count,
        window.target(),
        content
    )
}
