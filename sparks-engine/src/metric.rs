//! Input metric keys and their control-surface identifiers.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{UNIT_IDENTITY, UNIT_MILLIONS, UNIT_PERCENT};
use crate::error::ScenarioError;

/// One of the eight scale-factor drivers exposed on the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    AudienceGrowth,
    GameConversion,
    CourseConversion,
    MarketingSpend,
    EventYield,
    ContentCost,
    Staffing,
    ServiceHardwareCoefficient,
}

/// Slider domain for a control (min, max, step).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderDomain {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderDomain {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }
}

impl Metric {
    pub const COUNT: usize = 8;

    pub const ALL: [Self; Self::COUNT] = [
        Self::AudienceGrowth,
        Self::GameConversion,
        Self::CourseConversion,
        Self::MarketingSpend,
        Self::EventYield,
        Self::ContentCost,
        Self::Staffing,
        Self::ServiceHardwareCoefficient,
    ];

    /// Position of the metric in [`Metric::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::AudienceGrowth => 0,
            Self::GameConversion => 1,
            Self::CourseConversion => 2,
            Self::MarketingSpend => 3,
            Self::EventYield => 4,
            Self::ContentCost => 5,
            Self::Staffing => 6,
            Self::ServiceHardwareCoefficient => 7,
        }
    }

    /// Field name used in computation requests and stored scenarios.
    #[must_use]
    pub const fn wire_key(self) -> &'static str {
        match self {
            Self::AudienceGrowth => "mau_scale",
            Self::GameConversion => "game_conv_scale",
            Self::CourseConversion => "course_conv_scale",
            Self::MarketingSpend => "marketing_scale",
            Self::EventYield => "event_yield_scale",
            Self::ContentCost => "content_cost_scale",
            Self::Staffing => "staff_scale",
            Self::ServiceHardwareCoefficient => "srv_hw_scale",
        }
    }

    /// Identifier of the slider control bound to this metric.
    #[must_use]
    pub const fn control_id(self) -> &'static str {
        match self {
            Self::GameConversion => "conv_game_scale",
            Self::CourseConversion => "conv_course_scale",
            _ => self.wire_key(),
        }
    }

    /// Identifier of the readout element paired with the control.
    #[must_use]
    pub const fn readout_id(self) -> &'static str {
        match self {
            Self::AudienceGrowth => "mau_scale_value",
            Self::GameConversion => "conv_game_scale_value",
            Self::CourseConversion => "conv_course_scale_value",
            Self::MarketingSpend => "marketing_scale_value",
            Self::EventYield => "event_yield_scale_value",
            Self::ContentCost => "content_cost_scale_value",
            Self::Staffing => "staff_scale_value",
            Self::ServiceHardwareCoefficient => "srv_hw_scale_value",
        }
    }

    /// Kebab-case metric name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AudienceGrowth => "audience-growth",
            Self::GameConversion => "game-conversion",
            Self::CourseConversion => "course-conversion",
            Self::MarketingSpend => "marketing-spend",
            Self::EventYield => "event-yield",
            Self::ContentCost => "content-cost",
            Self::Staffing => "staffing",
            Self::ServiceHardwareCoefficient => "service-hardware-coefficient",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AudienceGrowth => "Audience Growth",
            Self::GameConversion => "Game Conversion",
            Self::CourseConversion => "Course Conversion",
            Self::MarketingSpend => "Marketing Spend",
            Self::EventYield => "Event Yield",
            Self::ContentCost => "Content Cost",
            Self::Staffing => "Staffing",
            Self::ServiceHardwareCoefficient => "Services & Hardware Coefficient",
        }
    }

    /// Display-only multiplier applied when charting the metric.
    #[must_use]
    pub const fn unit_factor(self) -> f64 {
        match self {
            Self::AudienceGrowth | Self::MarketingSpend | Self::EventYield | Self::ContentCost => {
                UNIT_MILLIONS
            }
            Self::GameConversion | Self::CourseConversion => UNIT_PERCENT,
            Self::Staffing | Self::ServiceHardwareCoefficient => UNIT_IDENTITY,
        }
    }

    #[must_use]
    pub const fn unit_label(self) -> &'static str {
        match self {
            Self::AudienceGrowth => "MAU (millions)",
            Self::GameConversion | Self::CourseConversion => "conversion (%)",
            Self::MarketingSpend | Self::EventYield | Self::ContentCost => "M€",
            Self::Staffing => "FTE",
            Self::ServiceHardwareCoefficient => "× salaries",
        }
    }

    #[must_use]
    pub const fn slider(self) -> SliderDomain {
        match self {
            Self::MarketingSpend => SliderDomain::new(0.3, 1.5, 0.05),
            Self::EventYield => SliderDomain::new(0.5, 2.0, 0.1),
            _ => SliderDomain::new(0.5, 1.5, 0.05),
        }
    }

    /// Resolve a wire key, control id or metric name.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.wire_key() == key || m.control_id() == key || m.name() == key)
    }
}

impl FromStr for Metric {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| ScenarioError::UnknownMetric(s.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
