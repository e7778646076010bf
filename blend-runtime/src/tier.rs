//! # Tier 模块
//!
//! 五档加权抽取：把 1..=100 的均匀抽样映射到档位 0..=4。
//!
//! ```text
//! percent:  1 ─ 10 │ 11 ─ 30 │ 31 ─ 70 │ 71 ─ 90 │ 91 ─ 100
//! tier:        0   │    1    │    2    │    3    │    4
//! weight:     10%  │   20%   │   40%   │   20%   │   10%
//! ```

use rand::Rng;

/// 档位数量（每条记录的 value / duration 数组长度）
pub const TIER_COUNT: usize = 5;

/// 各档位的累计上限（含）
const TIER_THRESHOLDS: [u32; TIER_COUNT - 1] = [10, 30, 70, 90];

/// 将百分比抽样值映射为档位
///
/// `percent` 应在 1..=100 内；超出 100 的值落入最高档。
pub fn tier_for_percent(percent: u32) -> usize {
    TIER_THRESHOLDS
        .iter()
        .position(|&limit| percent <= limit)
        .unwrap_or(TIER_COUNT - 1)
}

/// 抽取一个档位，结果总在 `0..TIER_COUNT` 内
pub fn select_tier<R: Rng>(rng: &mut R) -> usize {
    tier_for_percent(rng.random_range(1..=100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_thresholds_are_inclusive() {
        assert_eq!(tier_for_percent(1), 0);
        assert_eq!(tier_for_percent(10), 0);
        assert_eq!(tier_for_percent(11), 1);
        assert_eq!(tier_for_percent(30), 1);
        assert_eq!(tier_for_percent(31), 2);
        assert_eq!(tier_for_percent(70), 2);
        assert_eq!(tier_for_percent(71), 3);
        assert_eq!(tier_for_percent(90), 3);
        assert_eq!(tier_for_percent(91), 4);
        assert_eq!(tier_for_percent(100), 4);
    }

    #[test]
    fn test_exact_bucket_sizes() {
        let mut counts = [0u32; TIER_COUNT];
        for percent in 1..=100 {
            counts[tier_for_percent(percent)] += 1;
        }
        assert_eq!(counts, [10, 20, 40, 20, 10]);
    }

    #[test]
    fn test_empirical_distribution() {
        const DRAWS: usize = 10_000;
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts = [0usize; TIER_COUNT];

        for _ in 0..DRAWS {
            let tier = select_tier(&mut rng);
            assert!(tier < TIER_COUNT);
            counts[tier] += 1;
        }

        let expected = [0.10, 0.20, 0.40, 0.20, 0.10];
        for (tier, (&count, &p)) in counts.iter().zip(expected.iter()).enumerate() {
            let freq = count as f64 / DRAWS as f64;
            assert!(
                (freq - p).abs() < 0.02,
                "tier {tier}: 频率 {freq:.4} 偏离期望 {p}"
            );
        }
    }
}
