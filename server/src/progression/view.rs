//! 페이지 렌더링용 뷰 모델
//!
//! 요청마다 새로 만들고 렌더링 후 버립니다.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::format::{rank_label, UNAVAILABLE_LABEL};
use crate::raiderio::Difficulty;

#[derive(Debug, Clone, Serialize)]
pub struct ProgressionView {
    pub guild: GuildIdentity,
    /// 진행도 목록의 첫 번째 레이드
    pub current_raid: Option<RaidSummary>,
    pub raid_history: Vec<RaidSummary>,
    pub raid_rankings: Vec<RaidRankingRow>,
    pub boss_rankings: BossRankingsSection,
    pub latest_kill: Option<LatestKill>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuildIdentity {
    pub name: String,
    pub realm: String,
    pub region: String,
    /// Raider.IO 마지막 수집일 (표시용)
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RaidSummary {
    pub slug: String,
    pub name: String,
    pub summary: String,
    pub total_bosses: u32,
    pub progress: Vec<DifficultyProgress>,
    pub bosses: Vec<BossStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DifficultyProgress {
    pub difficulty: Difficulty,
    pub killed: u32,
    pub total: u32,
}

impl DifficultyProgress {
    pub fn label(&self) -> String {
        format!("{}/{} {}", self.killed, self.total, self.difficulty.label())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BossStatus {
    pub name: String,
    pub slug: String,
    pub killed: bool,
    /// 마지막 처치일 (표시용)
    pub last_kill: Option<String>,
}

/// 레이드별 난이도 순위 표 한 줄
#[derive(Debug, Clone, Serialize)]
pub struct RaidRankingRow {
    pub slug: String,
    pub name: String,
    pub cells: Vec<RankingLabels>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingLabels {
    pub difficulty: Difficulty,
    pub world: String,
    pub region: String,
    pub realm: String,
}

/// 보스 랭킹 영역 상태
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BossRankingsSection {
    /// access key 미설정. 랭킹 요청 자체를 하지 않음
    ConfigurationMissing,
    /// static-data 조회 실패 또는 레이드 slug 없음
    Unavailable,
    Ready(BossRankingsTable),
}

#[cfg(test)]
impl BossRankingsSection {
    pub fn table(&self) -> Option<&BossRankingsTable> {
        match self {
            BossRankingsSection::Ready(table) => Some(table),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BossRankingsTable {
    pub raid_slug: String,
    pub raid_name: String,
    pub bosses: Vec<BossRankingRow>,
}

#[cfg(test)]
impl BossRankingsTable {
    pub fn cells(&self) -> impl Iterator<Item = &RankingCell> {
        self.bosses
            .iter()
            .flat_map(|boss| boss.difficulties.iter())
            .flat_map(|ranking| [&ranking.world_scope, &ranking.realm_scope])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BossRankingRow {
    pub slug: String,
    pub name: String,
    pub difficulties: Vec<BossDifficultyRanking>,
}

/// 보스 x 난이도 한 칸. 월드 범위 조회(world/region 순위)와 서버 범위 조회(realm 순위)를 따로 기록합니다.
#[derive(Debug, Clone, Serialize)]
pub struct BossDifficultyRanking {
    pub difficulty: Difficulty,
    pub world_scope: RankingCell,
    pub realm_scope: RankingCell,
}

impl BossDifficultyRanking {
    pub fn world_label(&self) -> String {
        self.world_scope.label(|rank, _| rank)
    }

    pub fn region_label(&self) -> String {
        self.world_scope.label(|_, region_rank| region_rank)
    }

    pub fn realm_label(&self) -> String {
        self.realm_scope.label(|rank, _| rank)
    }
}

/// 랭킹 조회 한 건의 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RankingCell {
    /// 리더보드에 길드가 있음
    Ranked { rank: u32, region_rank: u32 },
    /// 조회는 성공했지만 길드가 없음
    Unranked,
    /// 조회 실패
    Unavailable,
}

impl RankingCell {
    #[cfg(test)]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, RankingCell::Unavailable)
    }

    fn label(&self, pick: impl Fn(u32, u32) -> u32) -> String {
        match *self {
            RankingCell::Ranked { rank, region_rank } => rank_label(pick(rank, region_rank)),
            RankingCell::Unranked => rank_label(0),
            RankingCell::Unavailable => UNAVAILABLE_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LatestKill {
    pub boss_slug: String,
    pub boss_name: String,
    pub difficulty: Difficulty,
    pub defeated_at: DateTime<Utc>,
    /// 표시용 날짜
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::UNRANKED_PLACEHOLDER;

    #[test]
    fn cell_labels_per_scope() {
        let ranking = BossDifficultyRanking {
            difficulty: Difficulty::Mythic,
            world_scope: RankingCell::Ranked { rank: 120, region_rank: 45 },
            realm_scope: RankingCell::Unavailable,
        };

        assert_eq!(ranking.world_label(), "#120");
        assert_eq!(ranking.region_label(), "#45");
        assert_eq!(ranking.realm_label(), UNAVAILABLE_LABEL);
    }

    #[test]
    fn unranked_and_zero_rank_use_placeholder() {
        let ranking = BossDifficultyRanking {
            difficulty: Difficulty::Normal,
            world_scope: RankingCell::Ranked { rank: 0, region_rank: 0 },
            realm_scope: RankingCell::Unranked,
        };

        assert_eq!(ranking.world_label(), UNRANKED_PLACEHOLDER);
        assert_eq!(ranking.region_label(), UNRANKED_PLACEHOLDER);
        assert_eq!(ranking.realm_label(), UNRANKED_PLACEHOLDER);
    }

    #[test]
    fn section_serializes_with_status_tag() {
        let json = serde_json::to_value(BossRankingsSection::ConfigurationMissing).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "configuration_missing" }));

        let json = serde_json::to_value(RankingCell::Ranked { rank: 3, region_rank: 1 }).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "ranked", "rank": 3, "region_rank": 1 }));
    }
}
