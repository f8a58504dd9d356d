use crate::model::{GoalSnapshot, ProgressEntry, StatsSnapshot};

impl StatsSnapshot {
    /// Derive the aggregate numbers from a goal and its progress (ascending by day).
    ///
    /// The total is the plan length; goals without a stored plan fall back to
    /// their duration. Missing sentiment scores count as neutral (0).
    pub fn compute(goal: &GoalSnapshot, progress: &[ProgressEntry]) -> Self {
        let total_days = if goal.plan_length > 0 {
            goal.plan_length
        } else {
            goal.duration
        };

        let completed: Vec<&ProgressEntry> = progress.iter().filter(|p| p.completed).collect();
        let completed_days = completed.len() as u32;

        let completion_rate = if total_days > 0 {
            (completed_days as f64 / total_days as f64 * 100.0)
                .round()
                .min(100.0)
        } else {
            0.0
        };

        let current_streak = progress
            .iter()
            .rev()
            .take_while(|p| p.completed)
            .count() as u32;

        let total_hours_spent = completed.iter().filter_map(|p| p.hours_spent).sum();

        let average_sentiment = if completed.is_empty() {
            0.0
        } else {
            completed
                .iter()
                .map(|p| p.sentiment_score.unwrap_or(0.0))
                .sum::<f64>()
                / completed.len() as f64
        };

        StatsSnapshot {
            total_days,
            completed_days,
            completion_rate,
            current_streak,
            total_hours_spent,
            average_sentiment,
        }
    }
}
