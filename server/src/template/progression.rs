use crate::progression::{BossRankingsSection, ProgressionView};
use askama::Template;

#[derive(Debug, Template)]
#[template(path = "progression.html")]
pub struct ProgressionTemplate {
    /// 길드 프로필 조회 실패 시 None
    pub view: Option<ProgressionView>,
    pub error: Option<&'static str>,
}

impl ProgressionTemplate {
    pub fn ready(view: ProgressionView) -> Self {
        Self {
            view: Some(view),
            error: None,
        }
    }

    pub fn failed(message: &'static str) -> Self {
        Self {
            view: None,
            error: Some(message),
        }
    }
}
