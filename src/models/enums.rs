use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The serde representation is the same string `as_str` returns.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(RiskLevel {
    Low => "low",
    Moderate => "moderate",
    High => "high",
});

str_enum!(Trend {
    Up => "up",
    Down => "down",
    Stable => "stable",
});

str_enum!(TimeOfDay {
    Morning => "morning",
    Afternoon => "afternoon",
    Evening => "evening",
});

str_enum!(NudgeType {
    Critical => "critical",
    Warning => "warning",
    Suggestion => "suggestion",
    Positive => "positive",
});

str_enum!(NudgeCategory {
    Stress => "stress",
    Nutrition => "nutrition",
    Activity => "activity",
    Medication => "medication",
    Sleep => "sleep",
    Hydration => "hydration",
});

str_enum!(Impact {
    High => "high",
    Medium => "medium",
    Low => "low",
});

str_enum!(DemoScenario {
    BpCrisis => "bp-crisis",
    GlucoseSpike => "glucose-spike",
    HighSodium => "high-sodium",
    ExcellentDay => "excellent-day",
    EveningMedication => "evening-medication",
    AcuteStress => "acute-stress",
    SodiumPattern => "sodium-pattern",
});

impl DemoScenario {
    pub const ALL: [DemoScenario; 7] = [
        Self::BpCrisis,
        Self::GlucoseSpike,
        Self::HighSodium,
        Self::ExcellentDay,
        Self::EveningMedication,
        Self::AcuteStress,
        Self::SodiumPattern,
    ];
}

impl TimeOfDay {
    /// Period of the day for a clock hour (0-23).
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 18 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }
}
