use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use crate::error::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Abandoned,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSnapshot {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration: u32, // days
    pub hours_per_day: f64,
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub plan_length: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub day: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub hours_spent: Option<f64>,
    #[serde(default)]
    pub sentiment_score: Option<f64>, // -1.0 ..= 1.0
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct MoodPoint {
    pub day: u32,
    pub score: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightSnapshot {
    pub summary: String,
    pub highlights: Vec<String>,
    pub recommendations: Vec<String>,
    pub blockers: Vec<String>,
    pub motivation_level: u8, // 0..=100
    pub mood_trend: Vec<MoodPoint>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_days: u32,
    pub completed_days: u32,
    pub completion_rate: f64,
    pub current_streak: u32,
    pub total_hours_spent: f64,
    pub average_sentiment: f64,
}

/// Everything one report render needs. Built once, never mutated by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportData {
    pub goal: GoalSnapshot,
    /// Ascending by day.
    pub progress: Vec<ProgressEntry>,
    /// Most recent first; only the first one is rendered.
    pub insights: Vec<InsightSnapshot>,
    pub stats: StatsSnapshot,
}

/// JSON payload accepted at the crate boundary. `stats` may be omitted, in which
/// case it is computed from the goal and its progress.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub goal: GoalSnapshot,
    #[serde(default)]
    pub progress: Vec<ProgressEntry>,
    #[serde(default)]
    pub insights: Vec<InsightSnapshot>,
    #[serde(default)]
    pub stats: Option<StatsSnapshot>,
}

impl ReportRequest {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_report_data(self) -> Result<ReportData, Error> {
        let mut progress = self.progress;
        progress.sort_by_key(|p| p.day);
        let stats = self
            .stats
            .unwrap_or_else(|| StatsSnapshot::compute(&self.goal, &progress));
        let data = ReportData {
            goal: self.goal,
            progress,
            insights: self.insights,
            stats,
        };
        data.validate()?;
        Ok(data)
    }
}

const MAX_TITLE_CHARS: usize = 200;
const MAX_TEXT_CHARS: usize = 1000;

fn invalid(msg: String) -> Error {
    Error::InvalidData(msg)
}

impl ReportData {
    /// Check the limits the goal service enforces on stored records.
    pub fn validate(&self) -> Result<(), Error> {
        let goal = &self.goal;
        let title_len = goal.title.trim().chars().count();
        if title_len == 0 || title_len > MAX_TITLE_CHARS {
            return Err(invalid(format!(
                "goal title must be 1..={MAX_TITLE_CHARS} characters, got {title_len}"
            )));
        }
        if let Some(desc) = &goal.description
            && desc.chars().count() > MAX_TEXT_CHARS
        {
            return Err(invalid(format!(
                "goal description exceeds {MAX_TEXT_CHARS} characters"
            )));
        }
        if !(1..=365).contains(&goal.duration) {
            return Err(invalid(format!(
                "duration must be 1..=365 days, got {}",
                goal.duration
            )));
        }
        if !(0.5..=12.0).contains(&goal.hours_per_day) {
            return Err(invalid(format!(
                "hoursPerDay must be 0.5..=12, got {}",
                goal.hours_per_day
            )));
        }

        let mut days: Vec<u32> = self.progress.iter().map(|p| p.day).collect();
        days.sort_unstable();
        if let Some(w) = days.windows(2).find(|w| w[0] == w[1]) {
            return Err(invalid(format!("duplicate progress entry for day {}", w[0])));
        }
        for p in &self.progress {
            if p.day == 0 {
                return Err(invalid("progress day must be at least 1".into()));
            }
            if let Some(c) = &p.comment
                && c.chars().count() > MAX_TEXT_CHARS
            {
                return Err(invalid(format!(
                    "comment for day {} exceeds {MAX_TEXT_CHARS} characters",
                    p.day
                )));
            }
            if p.hours_spent.is_some_and(|h| h < 0.0 || !h.is_finite()) {
                return Err(invalid(format!("negative hoursSpent on day {}", p.day)));
            }
            if p.sentiment_score.is_some_and(|s| !(-1.0..=1.0).contains(&s)) {
                return Err(invalid(format!(
                    "sentimentScore on day {} outside [-1, 1]",
                    p.day
                )));
            }
        }

        for insight in &self.insights {
            if insight.motivation_level > 100 {
                return Err(invalid(format!(
                    "motivationLevel must be 0..=100, got {}",
                    insight.motivation_level
                )));
            }
        }

        let s = &self.stats;
        if !(0.0..=100.0).contains(&s.completion_rate) {
            return Err(invalid(format!(
                "completionRate must be 0..=100, got {}",
                s.completion_rate
            )));
        }
        if !(-1.0..=1.0).contains(&s.average_sentiment) {
            return Err(invalid(format!(
                "averageSentiment outside [-1, 1]: {}",
                s.average_sentiment
            )));
        }
        Ok(())
    }

    /// The insight the report shows, if any.
    pub fn latest_insight(&self) -> Option<&InsightSnapshot> {
        self.insights.first()
    }
}

/// Accepts plain `YYYY-MM-DD` dates as well as RFC 3339 timestamps, which is
/// what document stores usually hand back.
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
