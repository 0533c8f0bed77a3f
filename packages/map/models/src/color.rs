//! Fixed color scale for crime rates per 100,000 residents.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

/// One band of the choropleth scale.
///
/// Variants are ordered from the neutral zero band up to the darkest band.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorBucket {
    /// Rate is zero (or not a positive number).
    None,
    /// `0 < rate <= 2`
    AboveZero,
    /// `2 < rate <= 5`
    AboveTwo,
    /// `5 < rate <= 10`
    AboveFive,
    /// `10 < rate <= 20`
    AboveTen,
    /// `20 < rate <= 50`
    AboveTwenty,
    /// `50 < rate <= 100`
    AboveFifty,
    /// `rate > 100`
    AboveHundred,
}

/// Thresholds checked highest first. A rate strictly greater than the
/// threshold lands in the bucket; `100` itself is [`ColorBucket::AboveFifty`].
const THRESHOLDS: &[(f64, ColorBucket)] = &[
    (100.0, ColorBucket::AboveHundred),
    (50.0, ColorBucket::AboveFifty),
    (20.0, ColorBucket::AboveTwenty),
    (10.0, ColorBucket::AboveTen),
    (5.0, ColorBucket::AboveFive),
    (2.0, ColorBucket::AboveTwo),
    (0.0, ColorBucket::AboveZero),
];

impl ColorBucket {
    /// Every bucket from lightest to darkest.
    pub const ALL: &[Self] = &[
        Self::None,
        Self::AboveZero,
        Self::AboveTwo,
        Self::AboveFive,
        Self::AboveTen,
        Self::AboveTwenty,
        Self::AboveFifty,
        Self::AboveHundred,
    ];

    /// Picks the bucket for a rate. `NaN` and negative rates get the
    /// neutral bucket.
    #[must_use]
    pub fn for_rate(rate: f64) -> Self {
        THRESHOLDS
            .iter()
            .find(|(threshold, _)| rate > *threshold)
            .map_or(Self::None, |(_, bucket)| *bucket)
    }

    /// Hex fill color.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::None => "#E0E0E0",
            Self::AboveZero => "#FED976",
            Self::AboveTwo => "#FEB24C",
            Self::AboveFive => "#FD8D3C",
            Self::AboveTen => "#FC4E2A",
            Self::AboveTwenty => "#E31A1C",
            Self::AboveFifty => "#BD0026",
            Self::AboveHundred => "#800026",
        }
    }

    /// Legend label for the range this bucket covers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "0",
            Self::AboveZero => "0 - 2",
            Self::AboveTwo => "2 - 5",
            Self::AboveFive => "5 - 10",
            Self::AboveTen => "10 - 20",
            Self::AboveTwenty => "20 - 50",
            Self::AboveFifty => "50 - 100",
            Self::AboveHundred => "100+",
        }
    }

    /// `(label, color)` pairs for a map legend, lightest first.
    #[must_use]
    pub fn legend() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|b| (b.label(), b.color())).collect()
    }
}

/// Fill color for a rate per 100,000 residents.
#[must_use]
pub fn color_for_rate(rate: f64) -> &'static str {
    ColorBucket::for_rate(rate).color()
}
