//! Raider.IO API v1 (REST) 클라이언트
//!
//! 읽기 전용 엔드포인트 세 개를 조회합니다.
//! - `/guilds/profile`: 길드 진행도/순위 (인증 없음)
//! - `/raiding/static-data`: 레이드 보스 목록 (access key 필요)
//! - `/raiding/boss-rankings`: 보스별 리더보드 (access key 필요)
//!
//! 재시도는 하지 않습니다. 성공 응답은 재검증 주기 동안 캐시합니다.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

use super::cache::ResponseCache;
use super::model::{BossRankingsResponse, Difficulty, GuildProfile, StaticDataResponse};

/// Raider.IO API 기본 주소
pub const RAIDER_IO_BASE_URL: &str = "https://raider.io/api/v1";
/// 기본 재검증 주기 (1시간)
pub const DEFAULT_REVALIDATE_SECONDS: u64 = 3600;

const GUILD_PROFILE_FIELDS: &str = "raid_progression,raid_rankings";

#[derive(Debug, Error)]
pub enum RaiderIoError {
    #[error("Raider.IO {endpoint} request failed: {status}")]
    UpstreamStatus { endpoint: &'static str, status: StatusCode },
    #[error("Raider.IO {endpoint} request could not be completed")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Raider.IO {endpoint} response had an unexpected shape")]
    MalformedResponse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
impl RaiderIoError {
    /// 비성공 HTTP 상태로 실패한 경우 해당 상태
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RaiderIoError::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// 보스 랭킹 조회 조건. `realm`이 없으면 월드 단위 랭킹입니다.
#[derive(Debug, Clone, Copy)]
pub struct BossRankingsQuery<'a> {
    pub raid: &'a str,
    pub boss: &'a str,
    pub difficulty: Difficulty,
    pub region: &'a str,
    pub realm: Option<&'a str>,
}

/// Raider.IO API 클라이언트
pub struct RaiderIoClient {
    http: reqwest::Client,
    base_url: String,
    cache: ResponseCache,
}

impl RaiderIoClient {
    /// `base_url`은 보통 [`RAIDER_IO_BASE_URL`], 테스트에서는 mock 서버 주소
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            cache: ResponseCache::new(),
        }
    }

    /// 길드 레이드 진행도 + 순위 조회
    pub async fn get_guild_raid_progression(
        &self,
        region: &str,
        realm: &str,
        name: &str,
        revalidate_seconds: u64,
    ) -> Result<GuildProfile, RaiderIoError> {
        let params = [
            ("region", region),
            ("realm", realm),
            ("name", name),
            ("fields", GUILD_PROFILE_FIELDS),
        ];

        self.get_json("guild profile", "/guilds/profile", &params, revalidate_seconds)
            .await
    }

    /// 확장팩의 레이드/보스 메타데이터 조회
    pub async fn get_raiding_static_data(
        &self,
        access_key: &str,
        expansion_id: u32,
        revalidate_seconds: u64,
    ) -> Result<StaticDataResponse, RaiderIoError> {
        let expansion_id = expansion_id.to_string();
        let params = [
            ("access_key", access_key),
            ("expansion_id", expansion_id.as_str()),
        ];

        self.get_json("static-data", "/raiding/static-data", &params, revalidate_seconds)
            .await
    }

    /// 보스 하나의 난이도별 리더보드 조회
    pub async fn get_boss_rankings(
        &self,
        access_key: &str,
        query: &BossRankingsQuery<'_>,
        revalidate_seconds: u64,
    ) -> Result<BossRankingsResponse, RaiderIoError> {
        let mut params = vec![
            ("access_key", access_key),
            ("raid", query.raid),
            ("boss", query.boss),
            ("difficulty", query.difficulty.as_str()),
            ("region", query.region),
        ];

        if let Some(realm) = query.realm {
            params.push(("realm", realm));
        }

        self.get_json("boss-rankings", "/raiding/boss-rankings", &params, revalidate_seconds)
            .await
    }

    /// GET 요청 한 번 실행 후 JSON 파싱
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        params: &[(&str, &str)],
        revalidate_seconds: u64,
    ) -> Result<T, RaiderIoError> {
        let request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(params)
            .build()
            .map_err(|source| RaiderIoError::Transport { endpoint, source })?;

        // 캐시 키는 전체 URL (access key 포함, 로그에는 남기지 않음)
        let cache_key = request.url().to_string();

        if let Some(body) = self.cache.get_fresh(&cache_key, revalidate_seconds).await {
            tracing::debug!("[Raider.IO] {} served from cache", endpoint);
            return parse_body(endpoint, &body);
        }

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| RaiderIoError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("[Raider.IO] {} request failed: {}", endpoint, status);
            return Err(RaiderIoError::UpstreamStatus { endpoint, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| RaiderIoError::Transport { endpoint, source })?;

        let parsed = parse_body(endpoint, &body)?;

        if revalidate_seconds > 0 {
            self.cache.insert(cache_key, Arc::from(body)).await;
        }

        Ok(parsed)
    }
}

fn parse_body<T: DeserializeOwned>(endpoint: &'static str, body: &str) -> Result<T, RaiderIoError> {
    serde_json::from_str(body).map_err(|source| {
        tracing::warn!("[Raider.IO] {} response could not be parsed: {}", endpoint, source);
        RaiderIoError::MalformedResponse { endpoint, source }
    })
}
