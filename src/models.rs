use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Alternation pattern between protein-only and protein+vegetable days
/// during the cruise phase. Stored and sent over the wire as "1/1", "2/2"
/// or "5/5"; anything else is refused at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rhythm {
    #[serde(rename = "1/1")]
    OneOne,
    #[serde(rename = "2/2")]
    TwoTwo,
    #[serde(rename = "5/5")]
    FiveFive,
}

impl fmt::Display for Rhythm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rhythm::OneOne => write!(f, "1/1"),
            Rhythm::TwoTwo => write!(f, "2/2"),
            Rhythm::FiveFive => write!(f, "5/5"),
        }
    }
}

impl FromStr for Rhythm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1/1" => Ok(Rhythm::OneOne),
            "2/2" => Ok(Rhythm::TwoTwo),
            "5/5" => Ok(Rhythm::FiveFive),
            other => Err(format!(
                "unknown rhythm '{other}', expected one of 1/1, 2/2, 5/5"
            )),
        }
    }
}

/// Phase tag carried by catalog entries: attack-phase staples vs the
/// vegetable additions allowed on cruise days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseTag {
    #[serde(rename = "A")]
    Attack,
    #[serde(rename = "C")]
    Cruise,
}

impl fmt::Display for PhaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseTag::Attack => write!(f, "Attack"),
            PhaseTag::Cruise => write!(f, "Cruise"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub start_weight: f64,
    pub target_weight: f64,
    /// Milliseconds since the Unix epoch, set once at creation.
    pub start_date: i64,
    pub attack_days: u32,
    pub cruise_days: u32,
    pub consolidation_days: u32,
    pub rhythm: Rhythm,
}

/// One logged weight measurement; `date` is ms since the Unix epoch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightEntry {
    pub date: i64,
    pub weight: f64,
}

/// The whole persisted state: at most one plan, the append-only weight
/// log, and per-day water tallies keyed by local `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppData {
    pub plan: Option<Plan>,
    pub logs: Vec<WeightEntry>,
    pub water: BTreeMap<String, u8>,
}

/// Setup payload. Weights arrive as the raw field text so that the parse
/// failure path is ours instead of a serde type error.
#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    #[serde(default)]
    pub start_weight: String,
    #[serde(default)]
    pub target_weight: String,
    #[serde(default)]
    pub rhythm: String,
}

#[derive(Debug, Deserialize)]
pub struct WeightRequest {
    #[serde(default)]
    pub weight: String,
}

#[derive(Debug, Deserialize)]
pub struct WaterRequest {
    pub slot: u8,
}

#[derive(Debug, Deserialize)]
pub struct FoodQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub date: String,
    pub day: i64,
    pub phase: String,
    pub current_weight: f64,
    pub weight_lost: String,
    pub water_today: u8,
    pub logs: Vec<WeightEntry>,
}

#[derive(Debug, Serialize)]
pub struct WaterResponse {
    pub date: String,
    pub count: u8,
}
