//! Raider.IO 관련 모듈
//!
//! - `client`: Raider.IO API 클라이언트
//! - `model`: 응답 타입
//! - `cache`: 응답 재검증 캐시

pub mod cache;
pub mod client;
pub mod model;

// 편의를 위한 re-export
pub use client::{BossRankingsQuery, RaiderIoClient, RaiderIoError, DEFAULT_REVALIDATE_SECONDS, RAIDER_IO_BASE_URL};
pub use model::Difficulty;
