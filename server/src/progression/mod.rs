//! 길드 진행도 집계
//!
//! 길드 프로필, 레이드 static-data, 보스별 랭킹 조회 결과를 하나의 [`ProgressionView`]로 합칩니다.
//! 프로필 조회 실패만 전체 실패이고, 나머지는 해당 영역만 "데이터 없음"으로 표시합니다.

use chrono::{DateTime, Utc};
use futures_util::future::{join, join_all};
use std::sync::Arc;
use thiserror::Error;

use crate::format::{format_raid_slug, format_unix_date, rank_label, raid_display_name};
use crate::raiderio::model::{BossRankingsResponse, RaidEncounter, RaidProgression, RaidRankings, RaidStatic};
use crate::raiderio::{BossRankingsQuery, Difficulty, RaiderIoClient, RaiderIoError};

pub mod view;

pub use view::{
    BossDifficultyRanking, BossRankingRow, BossRankingsSection, BossRankingsTable, BossStatus, DifficultyProgress,
    GuildIdentity, LatestKill, ProgressionView, RaidRankingRow, RaidSummary, RankingCell, RankingLabels,
};

/// 화면에 보여줄 일반 오류 메시지
pub const GENERIC_ERROR_MESSAGE: &str = "Raid progression is unavailable right now. Please try again later.";

#[derive(Debug, Error)]
pub enum ProgressionError {
    #[error("could not load guild profile")]
    GuildProfile(#[source] RaiderIoError),
}

impl ProgressionError {
    pub fn user_message(&self) -> &'static str {
        GENERIC_ERROR_MESSAGE
    }
}

/// 집계 대상 길드/레이드 설정
#[derive(Debug, Clone)]
pub struct ProgressionSettings {
    pub region: String,
    pub realm: String,
    pub guild: String,
    pub expansion_id: u32,
    pub raid_slug: String,
    pub revalidate_seconds: u64,
}

pub struct ProgressionAggregator {
    client: Arc<RaiderIoClient>,
    settings: ProgressionSettings,
    access_key: Option<String>,
}

/// 보스 x 난이도 한 칸의 원본 조회 결과
struct CellFetch<'a> {
    encounter: &'a RaidEncounter,
    difficulty: Difficulty,
    world: Result<BossRankingsResponse, RaiderIoError>,
    realm: Result<BossRankingsResponse, RaiderIoError>,
}

impl ProgressionAggregator {
    pub fn new(client: Arc<RaiderIoClient>, settings: ProgressionSettings, access_key: Option<String>) -> Self {
        // 빈 문자열은 미설정과 같음
        let access_key = access_key.filter(|key| !key.trim().is_empty());
        Self {
            client,
            settings,
            access_key,
        }
    }

    pub fn settings(&self) -> &ProgressionSettings {
        &self.settings
    }

    pub fn has_access_key(&self) -> bool {
        self.access_key.is_some()
    }

    /// 뷰 생성. 길드 프로필 조회가 실패하면 전체 실패
    pub async fn build_view(&self) -> Result<ProgressionView, ProgressionError> {
        let settings = &self.settings;

        let profile = self
            .client
            .get_guild_raid_progression(
                &settings.region,
                &settings.realm,
                &settings.guild,
                settings.revalidate_seconds,
            )
            .await
            .map_err(ProgressionError::GuildProfile)?;

        let mut summaries = profile
            .raid_progression
            .iter()
            .map(|(slug, progression)| raid_summary(slug, progression));
        let current_raid = summaries.next();
        let raid_history: Vec<RaidSummary> = summaries.collect();

        let raid_rankings = profile
            .raid_rankings
            .iter()
            .map(|(slug, rankings)| raid_ranking_row(slug, rankings))
            .collect();

        let (boss_rankings, latest_kill) = match self.access_key.as_deref() {
            Some(access_key) => self.boss_rankings(access_key).await,
            None => (BossRankingsSection::ConfigurationMissing, None),
        };

        tracing::debug!(
            "[Progression] {} raids, {} ranking rows, latest kill: {:?}",
            profile.raid_progression.len(),
            profile.raid_rankings.len(),
            latest_kill.as_ref().map(|kill| kill.boss_slug.as_str())
        );

        Ok(ProgressionView {
            guild: GuildIdentity {
                name: profile.name,
                realm: profile.realm,
                region: profile.region,
                updated: profile
                    .last_crawled_at
                    .as_deref()
                    .and_then(|at| DateTime::parse_from_rfc3339(at).ok())
                    .map(|at| format_unix_date(at.timestamp())),
            },
            current_raid,
            raid_history,
            raid_rankings,
            boss_rankings,
            latest_kill,
        })
    }

    /// static-data로 보스 목록을 찾고, 보스 x 난이도마다 월드/서버 랭킹을 동시에 조회
    async fn boss_rankings(&self, access_key: &str) -> (BossRankingsSection, Option<LatestKill>) {
        let settings = &self.settings;

        let static_data = match self
            .client
            .get_raiding_static_data(access_key, settings.expansion_id, settings.revalidate_seconds)
            .await
        {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("[Progression] static-data unavailable: {}", e);
                return (BossRankingsSection::Unavailable, None);
            }
        };

        let raid = match static_data.find_raid(&settings.raid_slug) {
            Some(raid) => raid,
            None => {
                tracing::warn!(
                    "[Progression] raid '{}' not found in static-data for expansion {}",
                    settings.raid_slug,
                    settings.expansion_id
                );
                return (BossRankingsSection::Unavailable, None);
            }
        };

        let fetches = raid.encounters.iter().flat_map(|encounter| {
            Difficulty::ALL
                .into_iter()
                .map(move |difficulty| self.fetch_cell(access_key, raid, encounter, difficulty))
        });
        let cells: Vec<CellFetch> = join_all(fetches).await;

        let failed = cells
            .iter()
            .map(|cell| cell.world.is_err() as usize + cell.realm.is_err() as usize)
            .sum::<usize>();
        tracing::info!(
            "[Progression] {} boss ranking requests for {}, {} failed",
            cells.len() * 2,
            raid.slug,
            failed
        );

        let latest_kill = find_latest_kill(
            &settings.guild,
            &raid.encounters,
            cells.iter().flat_map(|cell| {
                [&cell.world, &cell.realm]
                    .into_iter()
                    .filter_map(|result| result.as_ref().ok())
                    .map(move |response| (cell.difficulty, response))
            }),
        );

        let table = BossRankingsTable {
            raid_slug: raid.slug.clone(),
            raid_name: raid.name.clone(),
            bosses: boss_rows(&settings.guild, &raid.encounters, &cells),
        };

        (BossRankingsSection::Ready(table), latest_kill)
    }

    /// 월드 범위(realm 없음)와 서버 범위 조회를 동시에 실행
    async fn fetch_cell<'a>(
        &self,
        access_key: &str,
        raid: &RaidStatic,
        encounter: &'a RaidEncounter,
        difficulty: Difficulty,
    ) -> CellFetch<'a> {
        let settings = &self.settings;
        let world_query = BossRankingsQuery {
            raid: &raid.slug,
            boss: &encounter.slug,
            difficulty,
            region: &settings.region,
            realm: None,
        };
        let realm_query = BossRankingsQuery {
            realm: Some(settings.realm.as_str()),
            ..world_query
        };

        let (world, realm) = join(
            self.client
                .get_boss_rankings(access_key, &world_query, settings.revalidate_seconds),
            self.client
                .get_boss_rankings(access_key, &realm_query, settings.revalidate_seconds),
        )
        .await;

        CellFetch {
            encounter,
            difficulty,
            world,
            realm,
        }
    }
}

fn raid_summary(slug: &str, progression: &RaidProgression) -> RaidSummary {
    let progress = Difficulty::ALL
        .into_iter()
        .map(|difficulty| DifficultyProgress {
            difficulty,
            killed: progression.killed(difficulty),
            total: progression.total_bosses,
        })
        .collect();

    let bosses = progression
        .bosses
        .iter()
        .flatten()
        .map(|boss| BossStatus {
            name: boss.name.clone(),
            slug: boss.slug.clone(),
            killed: boss.killed > 0,
            last_kill: boss.last_kill.map(format_unix_date),
        })
        .collect();

    RaidSummary {
        slug: slug.to_string(),
        name: raid_display_name(slug, &progression.summary),
        summary: progression.summary.clone(),
        total_bosses: progression.total_bosses,
        progress,
        bosses,
    }
}

fn raid_ranking_row(slug: &str, rankings: &RaidRankings) -> RaidRankingRow {
    let cells = Difficulty::ALL
        .into_iter()
        .map(|difficulty| {
            let ranking = rankings.get(difficulty).unwrap_or_default();
            RankingLabels {
                difficulty,
                world: rank_label(ranking.world),
                region: rank_label(ranking.region),
                realm: rank_label(ranking.realm),
            }
        })
        .collect();

    RaidRankingRow {
        slug: slug.to_string(),
        name: format_raid_slug(slug),
        cells,
    }
}

fn boss_rows(guild: &str, encounters: &[RaidEncounter], cells: &[CellFetch]) -> Vec<BossRankingRow> {
    encounters
        .iter()
        .map(|encounter| BossRankingRow {
            slug: encounter.slug.clone(),
            name: encounter.name.clone(),
            difficulties: cells
                .iter()
                .filter(|cell| cell.encounter.slug == encounter.slug)
                .map(|cell| BossDifficultyRanking {
                    difficulty: cell.difficulty,
                    world_scope: ranking_cell(guild, &cell.world),
                    realm_scope: ranking_cell(guild, &cell.realm),
                })
                .collect(),
        })
        .collect()
}

/// 조회 결과 하나를 칸 상태로 변환
fn ranking_cell(guild: &str, result: &Result<BossRankingsResponse, RaiderIoError>) -> RankingCell {
    match result {
        Ok(response) => match response.entries_for(guild).next() {
            Some(entry) => RankingCell::Ranked {
                rank: entry.rank,
                region_rank: entry.region_rank,
            },
            None => RankingCell::Unranked,
        },
        Err(_) => RankingCell::Unavailable,
    }
}

/// 길드 항목의 `lastDefeated` 최댓값을 찾습니다. 같은 시각이면 먼저 본 항목 유지
pub fn find_latest_kill<'a>(
    guild: &str,
    encounters: &[RaidEncounter],
    responses: impl IntoIterator<Item = (Difficulty, &'a BossRankingsResponse)>,
) -> Option<LatestKill> {
    let mut latest: Option<(Difficulty, &'a str, DateTime<Utc>)> = None;

    for (difficulty, response) in responses {
        for entry in response.entries_for(guild) {
            for defeated in &entry.encounters_defeated {
                let is_newer = match latest {
                    Some((_, _, best)) => defeated.last_defeated > best,
                    None => true,
                };
                if is_newer {
                    latest = Some((difficulty, defeated.slug.as_str(), defeated.last_defeated));
                }
            }
        }
    }

    latest.map(|(difficulty, slug, defeated_at)| {
        let boss_name = encounters
            .iter()
            .find(|encounter| encounter.slug == slug)
            .map(|encounter| encounter.name.clone())
            .unwrap_or_else(|| format_raid_slug(slug));

        LatestKill {
            boss_slug: slug.to_string(),
            boss_name,
            difficulty,
            defeated_at,
            date: format_unix_date(defeated_at.timestamp()),
        }
    })
}
