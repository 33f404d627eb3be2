//! 응답 재검증 캐시
//!
//! 요청 URL별로 성공한 응답 본문을 보관하고, 재검증 주기(초)가 지나면 다시 조회하도록 합니다.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 캐시된 응답 본문
#[derive(Debug, Clone)]
pub struct CachedResponse {
    /// 조회 시각
    pub fetched_at: DateTime<Utc>,
    pub body: Arc<str>,
}

/// 재검증 주기가 지났는지 확인
pub fn is_response_expired(entry: &CachedResponse, revalidate_seconds: u64, now: DateTime<Utc>) -> bool {
    if revalidate_seconds == 0 {
        return true;
    }

    match i64::try_from(revalidate_seconds).ok().and_then(TimeDelta::try_seconds) {
        Some(window) => entry.fetched_at + window <= now,
        // 표현 불가능한 주기는 만료되지 않는 것으로 취급
        None => false,
    }
}

#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CachedResponse>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 아직 유효한 응답이 있으면 본문 반환
    pub async fn get_fresh(&self, key: &str, revalidate_seconds: u64) -> Option<Arc<str>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !is_response_expired(entry, revalidate_seconds, Utc::now()))
            .map(|entry| Arc::clone(&entry.body))
    }

    pub async fn insert(&self, key: String, body: Arc<str>) {
        let entry = CachedResponse {
            fetched_at: Utc::now(),
            body,
        };
        self.entries.write().await.insert(key, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_fetched_at(fetched_at: DateTime<Utc>) -> CachedResponse {
        CachedResponse {
            fetched_at,
            body: Arc::from("{}"),
        }
    }

    #[test]
    fn entry_expires_after_window() {
        let now = Utc::now();
        let entry = entry_fetched_at(now - TimeDelta::try_seconds(3601).unwrap());
        assert!(is_response_expired(&entry, 3600, now));

        let entry = entry_fetched_at(now - TimeDelta::try_seconds(10).unwrap());
        assert!(!is_response_expired(&entry, 3600, now));
    }

    #[test]
    fn zero_window_is_always_expired() {
        let now = Utc::now();
        assert!(is_response_expired(&entry_fetched_at(now), 0, now));
    }

    #[test]
    fn huge_window_never_expires() {
        let now = Utc::now();
        let entry = entry_fetched_at(now - TimeDelta::try_days(365).unwrap());
        assert!(!is_response_expired(&entry, u64::MAX, now));
    }

    #[tokio::test]
    async fn serves_fresh_entries_only() {
        let cache = ResponseCache::new();
        assert!(cache.get_fresh("a", 3600).await.is_none());

        cache.insert("a".to_string(), Arc::from("body")).await;
        assert_eq!(cache.get_fresh("a", 3600).await.as_deref(), Some("body"));
        assert!(cache.get_fresh("a", 0).await.is_none());
        assert!(cache.get_fresh("b", 3600).await.is_none());
    }
}
