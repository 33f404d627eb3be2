//! Raider.IO 응답 타입
//!
//! 세 엔드포인트(guild profile, static-data, boss-rankings)의 JSON 구조를 정의합니다.

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// 레이드 난이도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Normal,
    Heroic,
    Mythic,
}

impl Difficulty {
    /// 표시/조회 순서 고정
    pub const ALL: [Difficulty; 3] = [Difficulty::Normal, Difficulty::Heroic, Difficulty::Mythic];

    /// API 파라미터 값 (예: "mythic")
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Normal => "normal",
            Difficulty::Heroic => "heroic",
            Difficulty::Mythic => "mythic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Heroic => "Heroic",
            Difficulty::Mythic => "Mythic",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 길드 프로필 (`/guilds/profile`)
#[derive(Debug, Clone, Deserialize)]
pub struct GuildProfile {
    pub name: String,
    pub realm: String,
    pub region: String,
    #[serde(default)]
    pub last_crawled_at: Option<String>,
    /// 레이드 slug -> 진행도 (원본 JSON 키 순서 유지)
    #[serde(default, deserialize_with = "ordered_map_de")]
    pub raid_progression: Vec<(String, RaidProgression)>,
    /// 레이드 slug -> 난이도별 순위 (원본 JSON 키 순서 유지)
    #[serde(default, deserialize_with = "ordered_map_de")]
    pub raid_rankings: Vec<(String, RaidRankings)>,
}

/// 레이드 하나의 진행도
#[derive(Debug, Clone, Deserialize)]
pub struct RaidProgression {
    pub summary: String,
    pub total_bosses: u32,
    #[serde(default)]
    pub bosses: Option<Vec<RaidBoss>>,
    #[serde(default)]
    pub normal_bosses_killed: u32,
    #[serde(default)]
    pub heroic_bosses_killed: u32,
    #[serde(default)]
    pub mythic_bosses_killed: u32,
}

impl RaidProgression {
    /// 난이도별 처치 수
    pub fn killed(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Normal => self.normal_bosses_killed,
            Difficulty::Heroic => self.heroic_bosses_killed,
            Difficulty::Mythic => self.mythic_bosses_killed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaidBoss {
    pub name: String,
    pub slug: String,
    #[allow(dead_code)]
    pub id: u64,
    #[serde(default)]
    pub killed: u32,
    /// Unix timestamp (초)
    #[serde(default)]
    pub last_kill: Option<i64>,
}

/// world/region/realm 순위 (0 또는 누락 = 순위 없음)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Ranking {
    #[serde(default)]
    pub world: u32,
    #[serde(default)]
    pub region: u32,
    #[serde(default)]
    pub realm: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaidRankings {
    #[serde(default)]
    pub normal: Option<Ranking>,
    #[serde(default)]
    pub heroic: Option<Ranking>,
    #[serde(default)]
    pub mythic: Option<Ranking>,
}

impl RaidRankings {
    pub fn get(&self, difficulty: Difficulty) -> Option<Ranking> {
        match difficulty {
            Difficulty::Normal => self.normal,
            Difficulty::Heroic => self.heroic,
            Difficulty::Mythic => self.mythic,
        }
    }
}

/// `/raiding/static-data` 응답
#[derive(Debug, Clone, Deserialize)]
pub struct StaticDataResponse {
    #[serde(default)]
    pub raids: Vec<RaidStatic>,
}

impl StaticDataResponse {
    pub fn find_raid(&self, slug: &str) -> Option<&RaidStatic> {
        self.raids.iter().find(|raid| raid.slug == slug)
    }
}

/// 레이드 티어 메타데이터 (길드와 무관)
#[derive(Debug, Clone, Deserialize)]
pub struct RaidStatic {
    #[allow(dead_code)]
    pub id: u64,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub encounters: Vec<RaidEncounter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaidEncounter {
    #[allow(dead_code)]
    pub id: u64,
    pub slug: String,
    pub name: String,
}

/// `/raiding/boss-rankings` 응답
#[derive(Debug, Clone, Deserialize)]
pub struct BossRankingsResponse {
    #[allow(dead_code)]
    #[serde(default)]
    pub difficulty: String,
    #[serde(rename = "bossRankings", default)]
    pub boss_rankings: Vec<BossRankingEntry>,
}

impl BossRankingsResponse {
    /// 길드 이름으로 항목 검색 (대소문자 무시)
    pub fn entries_for<'a>(&'a self, guild: &str) -> impl Iterator<Item = &'a BossRankingEntry> + 'a {
        let target = guild.to_lowercase();
        self.boss_rankings
            .iter()
            .filter(move |entry| entry.guild.name.to_lowercase() == target)
    }
}

/// 리더보드 한 줄
#[derive(Debug, Clone, Deserialize)]
pub struct BossRankingEntry {
    pub rank: u32,
    #[serde(rename = "regionRank", default)]
    pub region_rank: u32,
    pub guild: RankedGuild,
    #[serde(rename = "encountersDefeated", default)]
    pub encounters_defeated: Vec<DefeatedEncounter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankedGuild {
    pub name: String,
    #[serde(default)]
    pub realm: GuildRealm,
    #[serde(default)]
    pub region: GuildRegion,
}

/// 길드 이름만 비교에 쓰고 서버/지역 정보는 응답 그대로 보관
#[allow(dead_code)]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildRealm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "isConnected", default)]
    pub is_connected: bool,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildRegion {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefeatedEncounter {
    pub slug: String,
    #[serde(rename = "lastDefeated")]
    pub last_defeated: DateTime<Utc>,
    #[allow(dead_code)]
    #[serde(rename = "firstDefeated")]
    pub first_defeated: DateTime<Utc>,
}

/// JSON 객체를 키 순서 그대로 `Vec<(key, value)>`로 읽습니다.
/// "현재 레이드 = 첫 번째 항목" 규칙이 이 순서에 의존합니다. `null`은 빈 목록
fn ordered_map_de<'de, D, T>(de: D) -> std::result::Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    struct OrderedMapVisitor<T>(PhantomData<T>);

    impl<'de, T: DeserializeOwned> Visitor<'de> for OrderedMapVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_some<I: Deserializer<'de>>(self, inner: I) -> Result<Self::Value, I::Error> {
            inner.deserialize_map(self)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    de.deserialize_option(OrderedMapVisitor(PhantomData))
}
