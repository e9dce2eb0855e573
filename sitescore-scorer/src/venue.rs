//! Venue types and their fixed weighting profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ScoreError;

/// Closed set of venue types with a weighting profile.
///
/// # Examples
/// ```
/// use sitescore_scorer::VenueType;
///
/// let venue: VenueType = "fast_food".parse()?;
/// assert_eq!(venue, VenueType::FastFood);
/// assert_eq!(venue.profile().top.price, 0.5);
/// assert!("food_truck".parse::<VenueType>().is_err());
/// # Ok::<(), sitescore_scorer::ScoreError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueType {
    /// Quick-service outlets: price and location weigh equally.
    FastFood,
    /// High-end venues: location dominates.
    Premium,
    /// Casual dining.
    Casual,
    /// General retail or residential use.
    #[default]
    Standard,
}

impl VenueType {
    /// Every venue type, in table order.
    pub const ALL: [Self; 4] = [Self::FastFood, Self::Premium, Self::Casual, Self::Standard];

    /// Return the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FastFood => "fast_food",
            Self::Premium => "premium",
            Self::Casual => "casual",
            Self::Standard => "standard",
        }
    }

    /// Return the weighting profile for this venue type.
    #[must_use]
    pub const fn profile(self) -> VenueProfile {
        match self {
            Self::FastFood => FAST_FOOD,
            Self::Premium => PREMIUM,
            Self::Casual => CASUAL,
            Self::Standard => STANDARD,
        }
    }

    pub(crate) fn names() -> String {
        Self::ALL
            .iter()
            .map(|venue| venue.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VenueType {
    type Err = ScoreError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|venue| venue.as_str() == name)
            .ok_or_else(|| ScoreError::UnknownVenueType {
                name: name.to_owned(),
            })
    }
}

/// Weights combining the price and location scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopWeights {
    /// Weight of the price score.
    pub price: f64,
    /// Weight of the location score.
    pub location: f64,
}

/// Weights combining the location sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubWeights {
    /// Weight of the transport score.
    pub transport: f64,
    /// Weight of the (negated) competition score.
    pub competition: f64,
    /// Weight of the infrastructure score.
    pub infrastructure: f64,
    /// Weight of the demographic score.
    pub demographic: f64,
}

/// Weighting policy of one venue type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VenueProfile {
    /// Price versus location.
    pub top: TopWeights,
    /// Location sub-score mix.
    pub sub: SubWeights,
}

const FAST_FOOD: VenueProfile = VenueProfile {
    top: TopWeights {
        price: 0.5,
        location: 0.5,
    },
    sub: SubWeights {
        transport: 0.5,
        competition: 0.2,
        infrastructure: 0.2,
        demographic: 0.1,
    },
};

const PREMIUM: VenueProfile = VenueProfile {
    top: TopWeights {
        price: 0.3,
        location: 0.7,
    },
    sub: SubWeights {
        transport: 0.2,
        competition: 0.3,
        infrastructure: 0.3,
        demographic: 0.2,
    },
};

const CASUAL: VenueProfile = VenueProfile {
    top: TopWeights {
        price: 0.4,
        location: 0.6,
    },
    sub: SubWeights {
        transport: 0.3,
        competition: 0.3,
        infrastructure: 0.3,
        demographic: 0.1,
    },
};

const STANDARD: VenueProfile = VenueProfile {
    top: TopWeights {
        price: 0.4,
        location: 0.6,
    },
    sub: SubWeights {
        transport: 0.4,
        competition: 0.3,
        infrastructure: 0.3,
        demographic: 0.0,
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(VenueType::FastFood, (0.5, 0.5), (0.5, 0.2, 0.2, 0.1))]
    #[case(VenueType::Premium, (0.3, 0.7), (0.2, 0.3, 0.3, 0.2))]
    #[case(VenueType::Casual, (0.4, 0.6), (0.3, 0.3, 0.3, 0.1))]
    #[case(VenueType::Standard, (0.4, 0.6), (0.4, 0.3, 0.3, 0.0))]
    fn profile_table_is_fixed(
        #[case] venue: VenueType,
        #[case] top: (f64, f64),
        #[case] sub: (f64, f64, f64, f64),
    ) {
        let profile = venue.profile();
        assert_eq!((profile.top.price, profile.top.location), top);
        assert_eq!(
            (
                profile.sub.transport,
                profile.sub.competition,
                profile.sub.infrastructure,
                profile.sub.demographic
            ),
            sub
        );
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "weight sums are checked against their upper bound"
    )]
    fn weight_sets_never_exceed_one() {
        for venue in VenueType::ALL {
            let VenueProfile { top, sub } = venue.profile();
            assert!(top.price + top.location <= 1.0 + f64::EPSILON, "{venue}");
            let sub_total = sub.transport + sub.competition + sub.infrastructure + sub.demographic;
            assert!(sub_total <= 1.0 + f64::EPSILON, "{venue}");
        }
    }

    #[rstest]
    fn names_round_trip_through_from_str() {
        for venue in VenueType::ALL {
            assert_eq!(venue.as_str().parse::<VenueType>(), Ok(venue));
        }
    }

    #[rstest]
    #[case("")]
    #[case("Standard")]
    #[case("bistro")]
    fn unknown_names_are_rejected(#[case] name: &str) {
        let err = name.parse::<VenueType>().expect_err("unknown venue");
        assert_eq!(err.kind(), sitescore_core::FailureKind::InvalidInput);
        assert!(err.to_string().contains("fast_food, premium, casual, standard"));
    }
}
