use serde::Serialize;

/// Display color of a score tier, as a CSS-style hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color(pub &'static str);

impl Color {
    pub fn hex(&self) -> &'static str {
        self.0
    }

    /// 24-bit ANSI foreground escape for terminal output.
    pub fn ansi(&self) -> String {
        let hex = self.0.trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .unwrap_or(0)
        };
        format!("\x1b[38;2;{};{};{}m", channel(0), channel(2), channel(4))
    }
}

/// Severity bracket for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Poor,
    Weak,
    Moderate,
    Strong,
    Excellent,
}

impl Tier {
    pub fn color(&self) -> Color {
        match self {
            Tier::Excellent => Color("#1b5e20"),
            Tier::Strong => Color("#43a047"),
            Tier::Moderate => Color("#f9a825"),
            Tier::Weak => Color("#ef6c00"),
            Tier::Poor => Color("#c62828"),
        }
    }
}

/// Lower bounds, highest first. The first bound a score meets wins.
const TIERS: &[(i64, Tier)] = &[
    (90, Tier::Excellent),
    (76, Tier::Strong),
    (60, Tier::Moderate),
    (40, Tier::Weak),
];

const FALLBACK: Tier = Tier::Poor;

/// Maps a percentage to its tier. Scores are not clamped: anything below the
/// lowest bound (negative values included) falls through to `Tier::Poor`, and
/// anything above 100 stays `Tier::Excellent`.
pub fn classify(score: i64) -> Tier {
    TIERS
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, tier)| *tier)
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(classify(100), Tier::Excellent);
        assert_eq!(classify(90), Tier::Excellent);
        assert_eq!(classify(89), Tier::Strong);
        assert_eq!(classify(76), Tier::Strong);
        assert_eq!(classify(75), Tier::Moderate);
        assert_eq!(classify(60), Tier::Moderate);
        assert_eq!(classify(59), Tier::Weak);
        assert_eq!(classify(40), Tier::Weak);
        assert_eq!(classify(39), Tier::Poor);
        assert_eq!(classify(0), Tier::Poor);
    }

    #[test]
    fn test_out_of_range_scores_are_not_rejected() {
        assert_eq!(classify(-20), Tier::Poor);
        assert_eq!(classify(250), Tier::Excellent);
    }

    #[test]
    fn test_higher_score_never_less_favorable() {
        let mut previous = classify(-10);
        for score in -10..=110 {
            let tier = classify(score);
            assert!(tier >= previous, "tier dropped at {score}");
            previous = tier;
        }
    }

    #[test]
    fn test_each_tier_has_distinct_color() {
        let colors: Vec<_> = [
            Tier::Poor,
            Tier::Weak,
            Tier::Moderate,
            Tier::Strong,
            Tier::Excellent,
        ]
        .iter()
        .map(|t| t.color())
        .collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_ansi_escape_from_hex() {
        assert_eq!(Color("#ff8000").ansi(), "\x1b[38;2;255;128;0m");
    }
}
