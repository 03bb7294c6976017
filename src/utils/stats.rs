//! Derived statistics computed from raw player and guild numbers.

use regex::Regex;
use std::sync::LazyLock;

static COLOUR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("§.").expect("colour code pattern is valid"));

const NETWORK_BASE: f64 = 15_312.5;
const NETWORK_OFFSET: f64 = 88.388_347_648_318_43;
const NETWORK_GROWTH: f64 = 35.355_339_059_327_38;

const SKYWARS_THRESHOLDS: [f64; 11] = [
    20.0, 70.0, 150.0, 250.0, 500.0, 1_000.0, 2_000.0, 3_500.0, 6_000.0, 10_000.0, 15_000.0,
];
const SKYWARS_XP_PER_LEVEL: f64 = 10_000.0;

const GUILD_THRESHOLDS: [f64; 14] = [
    100_000.0,
    150_000.0,
    250_000.0,
    500_000.0,
    750_000.0,
    1_000_000.0,
    1_250_000.0,
    1_500_000.0,
    2_000_000.0,
    2_500_000.0,
    2_500_000.0,
    2_500_000.0,
    2_500_000.0,
    2_500_000.0,
];
const GUILD_XP_PER_LEVEL: f64 = 3_000_000.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ratio of two stats rounded to two decimals. A zero denominator yields
/// infinity for a positive numerator and zero otherwise.
pub fn ratio(positive: f64, negative: f64) -> f64 {
    if negative == 0.0 {
        return if positive > 0.0 { f64::INFINITY } else { 0.0 };
    }
    round2(positive / negative)
}

/// The next whole ratio milestone.
pub fn ratio_next(ratio: f64) -> f64 {
    if ratio.is_infinite() {
        return ratio;
    }
    ratio.trunc() + 1.0
}

/// How many more positive stats are needed to raise the ratio by `amount`,
/// or to the next whole number when `amount` is `None`.
pub fn increase(positive: f64, negative: f64, amount: Option<f64>) -> f64 {
    let current = ratio(positive, negative);
    if current.is_infinite() {
        return 0.0;
    }
    let amount = amount.unwrap_or_else(|| ratio_next(current) - current);
    ((current + amount) * negative - positive).round()
}

pub fn level_percentage(level: f64) -> f64 {
    round2((level - level.trunc()) * 100.0)
}

pub fn network_level_exact(experience: f64) -> f64 {
    ((experience + NETWORK_BASE).sqrt() - NETWORK_OFFSET) / NETWORK_GROWTH
}

pub fn network_level(experience: f64) -> u64 {
    network_level_exact(experience).trunc() as u64
}

pub fn skywars_level_exact(experience: f64) -> f64 {
    let cap = SKYWARS_THRESHOLDS[SKYWARS_THRESHOLDS.len() - 1];
    if experience >= cap {
        return (experience - cap) / SKYWARS_XP_PER_LEVEL + 12.0;
    }

    let experience = experience.max(0.0);
    let index = SKYWARS_THRESHOLDS
        .iter()
        .position(|&needed| experience < needed)
        .unwrap_or(SKYWARS_THRESHOLDS.len() - 1);
    let floor = if index == 0 {
        0.0
    } else {
        SKYWARS_THRESHOLDS[index - 1]
    };
    let ceiling = SKYWARS_THRESHOLDS[index];

    index as f64 + 1.0 + (experience - floor) / (ceiling - floor)
}

pub fn skywars_level(experience: f64) -> u64 {
    skywars_level_exact(experience).trunc() as u64
}

/// Guild level with the fractional progress rounded to two decimals.
pub fn guild_level_exact(experience: f64) -> f64 {
    let mut remaining = experience.max(0.0);
    let mut level = 0.0;

    for needed in GUILD_THRESHOLDS {
        if remaining < needed {
            return level + round2(remaining / needed);
        }
        remaining -= needed;
        level += 1.0;
    }

    while remaining >= GUILD_XP_PER_LEVEL {
        remaining -= GUILD_XP_PER_LEVEL;
        level += 1.0;
    }
    level + round2(remaining / GUILD_XP_PER_LEVEL)
}

pub fn guild_level(experience: f64) -> u64 {
    guild_level_exact(experience).trunc() as u64
}

/// Display name for an upstream rank identifier.
pub fn rank_display_name(raw: &str) -> String {
    match raw {
        "VIP_PLUS" => "VIP+",
        "MVP_PLUS" => "MVP+",
        "SUPERSTAR" => "MVP++",
        "YOUTUBER" => "YOUTUBE",
        "MODERATOR" => "MOD",
        "GAME_MASTER" => "GM",
        other => other,
    }
    .to_string()
}

/// Rank fields exactly as they appear on a player record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankFields<'a> {
    pub prefix: Option<&'a str>,
    pub rank: Option<&'a str>,
    pub monthly_package_rank: Option<&'a str>,
    pub new_package_rank: Option<&'a str>,
    pub package_rank: Option<&'a str>,
}

/// Resolves the rank shown in game. Custom prefixes win over staff ranks,
/// which win over the monthly MVP++ package, then the purchased packages.
pub fn resolve_rank(fields: RankFields<'_>) -> Option<String> {
    fn present(value: Option<&str>) -> Option<&str> {
        value.filter(|v| !v.is_empty())
    }

    if let Some(prefix) = present(fields.prefix) {
        let stripped = COLOUR_CODE.replace_all(prefix, "");
        let inner = stripped.trim().trim_start_matches('[').trim_end_matches(']');
        return Some(rank_display_name(inner));
    }
    if let Some(rank) = present(fields.rank).filter(|r| *r != "NORMAL") {
        return Some(rank_display_name(rank));
    }
    if let Some(monthly) = present(fields.monthly_package_rank).filter(|r| *r != "NONE") {
        return Some(rank_display_name(monthly));
    }
    present(fields.new_package_rank)
        .or(present(fields.package_rank))
        .filter(|r| *r != "NONE")
        .map(rank_display_name)
}

pub fn profile_display(name: &str, rank: Option<&str>) -> String {
    match rank {
        Some(rank) if !rank.is_empty() => format!("[{}] {}", rank, name),
        _ => name.to_string(),
    }
}

pub fn guild_display(name: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) if !tag.is_empty() => format!("[{}] {}", tag, name),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_handles_zero_denominator() {
        assert_eq!(ratio(10.0, 4.0), 2.5);
        assert_eq!(ratio(2.0, 3.0), 0.67);
        assert!(ratio(5.0, 0.0).is_infinite());
        assert_eq!(ratio(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_ratio_next_and_increase() {
        assert_eq!(ratio_next(2.5), 3.0);
        assert!(ratio_next(f64::INFINITY).is_infinite());
        // 10/4 = 2.5, reaching 3.0 needs 12 kills over 4 deaths
        assert_eq!(increase(10.0, 4.0, None), 2.0);
        assert_eq!(increase(10.0, 4.0, Some(1.5)), 6.0);
        assert_eq!(increase(3.0, 0.0, None), 0.0);
    }

    #[test]
    fn test_network_level() {
        assert!((network_level_exact(0.0) - 1.0).abs() < 1e-9);
        assert_eq!(network_level(10_000.0), 2);
        assert_eq!(network_level(0.0), 1);
    }

    #[test]
    fn test_skywars_level() {
        assert_eq!(skywars_level_exact(0.0), 1.0);
        assert_eq!(skywars_level_exact(20.0), 2.0);
        assert_eq!(skywars_level_exact(15_000.0), 12.0);
        assert_eq!(skywars_level_exact(25_000.0), 13.0);
        assert_eq!(skywars_level(14_999.0), 11);
    }

    #[test]
    fn test_guild_level() {
        assert_eq!(guild_level_exact(0.0), 0.0);
        assert_eq!(guild_level_exact(100_000.0), 1.0);
        assert_eq!(guild_level_exact(175_000.0), 1.5);
        assert_eq!(guild_level_exact(20_000_000.0), 14.0);
        assert_eq!(guild_level_exact(24_500_000.0), 15.5);
        assert_eq!(guild_level(24_500_000.0), 15);
    }

    #[test]
    fn test_level_percentage() {
        assert_eq!(level_percentage(15.25), 25.0);
        assert_eq!(level_percentage(3.0), 0.0);
    }

    #[test]
    fn test_resolve_rank_precedence() {
        let fields = RankFields {
            prefix: Some("§c[OWNER]"),
            rank: Some("ADMIN"),
            ..Default::default()
        };
        assert_eq!(resolve_rank(fields).as_deref(), Some("OWNER"));

        let fields = RankFields {
            rank: Some("NORMAL"),
            monthly_package_rank: Some("SUPERSTAR"),
            new_package_rank: Some("MVP_PLUS"),
            ..Default::default()
        };
        assert_eq!(resolve_rank(fields).as_deref(), Some("MVP++"));

        let fields = RankFields {
            monthly_package_rank: Some("NONE"),
            new_package_rank: Some("VIP_PLUS"),
            package_rank: Some("VIP"),
            ..Default::default()
        };
        assert_eq!(resolve_rank(fields).as_deref(), Some("VIP+"));

        assert_eq!(resolve_rank(RankFields::default()), None);
    }

    #[test]
    fn test_resolve_rank_skips_empty_fields() {
        let fields = RankFields {
            prefix: Some(""),
            rank: Some("ADMIN"),
            ..Default::default()
        };
        assert_eq!(resolve_rank(fields).as_deref(), Some("ADMIN"));

        let fields = RankFields {
            rank: Some(""),
            monthly_package_rank: Some(""),
            new_package_rank: Some(""),
            package_rank: Some("MVP"),
            ..Default::default()
        };
        assert_eq!(resolve_rank(fields).as_deref(), Some("MVP"));
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(profile_display("Notch", Some("MVP+")), "[MVP+] Notch");
        assert_eq!(profile_display("Notch", None), "Notch");
        assert_eq!(guild_display("Builders", Some("BLD")), "[BLD] Builders");
        assert_eq!(guild_display("Builders", Some("")), "Builders");
    }
}
