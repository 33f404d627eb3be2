//! 표시용 문자열 변환 (순수 함수)
//!
//! 로케일/타임존 상태 없이 항상 영어, UTC로 고정해서 포맷합니다.

use chrono::DateTime;
use regex::Regex;

/// 순위 없음 표시
pub const UNRANKED_PLACEHOLDER: &str = "—";
/// 조회 실패한 칸 표시
pub const UNAVAILABLE_LABEL: &str = "No data";
/// 날짜 변환 실패 표시
pub const UNKNOWN_DATE: &str = "Unknown date";

lazy_static::lazy_static! {
    /// "4/8 Heroic", "8/8M" 같은 진행도 접미사
    static ref PROGRESS_SUFFIX: Regex =
        Regex::new(r"\s*\d+\s*/\s*\d+(\D.*)?$").expect("progress suffix pattern is valid");
}

/// Unix timestamp (초) -> "Jan 20, 2024"
pub fn format_unix_date(seconds: i64) -> String {
    match DateTime::from_timestamp(seconds, 0) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// "Manaforge Omega 4/8 Heroic" -> "Manaforge Omega"
pub fn raid_name_from_summary(summary: &str) -> String {
    PROGRESS_SUFFIX.replace(summary, "").trim().to_string()
}

/// "manaforge-omega" -> "Manaforge Omega"
pub fn format_raid_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 요약 문자열에 이름이 없으면 ("4/8 H") slug로 대체
pub fn raid_display_name(slug: &str, summary: &str) -> String {
    let name = raid_name_from_summary(summary);
    if name.is_empty() {
        format_raid_slug(slug)
    } else {
        name
    }
}

/// 0 은 순위 없음
pub fn rank_label(rank: u32) -> String {
    if rank == 0 {
        UNRANKED_PLACEHOLDER.to_string()
    } else {
        format!("#{}", rank)
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raid_name_strips_progress_suffix() {
        assert_eq!(raid_name_from_summary("Manaforge Omega 4/8 Heroic"), "Manaforge Omega");
        assert_eq!(raid_name_from_summary("Nerub-ar Palace 8/8M"), "Nerub-ar Palace");
        assert_eq!(raid_name_from_summary("Liberation of Undermine 8/8"), "Liberation of Undermine");
    }

    #[test]
    fn raid_name_without_suffix_is_unchanged() {
        assert_eq!(raid_name_from_summary("Vault of the Incarnates"), "Vault of the Incarnates");
    }

    #[test]
    fn summary_with_only_progress_has_no_name() {
        assert_eq!(raid_name_from_summary("4/8 H"), "");
        assert_eq!(raid_display_name("manaforge-omega", "4/8 H"), "Manaforge Omega");
        assert_eq!(raid_display_name("x", "Vault of the Incarnates 9/9 Heroic"), "Vault of the Incarnates");
    }

    #[test]
    fn raid_slug_is_title_cased() {
        assert_eq!(format_raid_slug("manaforge-omega"), "Manaforge Omega");
        assert_eq!(format_raid_slug("liberation-of-undermine"), "Liberation Of Undermine");
        assert_eq!(format_raid_slug("-nerubar--palace-"), "Nerubar Palace");
        assert_eq!(format_raid_slug(""), "");
    }

    #[test]
    fn zero_rank_is_placeholder() {
        assert_eq!(rank_label(0), UNRANKED_PLACEHOLDER);
        assert_ne!(rank_label(0), "#0");
        assert_eq!(rank_label(42), "#42");
    }

    #[test]
    fn unix_date_is_short_english() {
        // 2024-01-20T12:00:00Z
        assert_eq!(format_unix_date(1_705_752_000), "Jan 20, 2024");
        assert_eq!(format_unix_date(0), "Jan 1, 1970");
        assert_eq!(format_unix_date(1_705_752_000), format_unix_date(1_705_752_000));
    }

    #[test]
    fn out_of_range_date_is_unknown() {
        assert_eq!(format_unix_date(i64::MAX), UNKNOWN_DATE);
    }
}
