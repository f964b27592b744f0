#![forbid(unsafe_code)]

use super::{SqliteStore, StoreError};
use rusqlite::params;
use std::collections::BTreeMap;
use todo_core::validate::{due_at_from_ms, ms_from_due_at, weekday_index_from_ms};
use todo_core::{Priority, TaskStatus};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriorityStats {
    pub total: i64,
    pub completed: i64,
    pub avg_estimated_minutes: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryStats {
    pub category_id: i64,
    pub name: String,
    pub total: i64,
    pub completed: i64,
}

const DAY_MS: i64 = 86_400_000;

/// Mean and median of a set of whole-day spans.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DaySpread {
    pub samples: i64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

impl DaySpread {
    fn from_days(mut days: Vec<i64>) -> Self {
        if days.is_empty() {
            return Self::default();
        }
        days.sort_unstable();
        let len = days.len();
        let mean = days.iter().sum::<i64>() as f64 / len as f64;
        let median = if len % 2 == 1 {
            days[len / 2] as f64
        } else {
            (days[len / 2 - 1] + days[len / 2]) as f64 / 2.0
        };
        Self {
            samples: len as i64,
            mean: Some(mean),
            median: Some(median),
        }
    }
}

/// Descriptive statistics over the whole task table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskStats {
    pub total: i64,
    pub by_status: BTreeMap<TaskStatus, i64>,
    pub by_priority: BTreeMap<Priority, PriorityStats>,
    pub by_category: Vec<CategoryStats>,
    /// Completed / total, `0.0` for an empty table.
    pub completion_rate: f64,
    /// Not completed and due strictly before now.
    pub overdue: i64,
    pub completed_on_time: i64,
    pub completed_late: i64,
    pub avg_estimated_minutes: Option<f64>,
    /// UTC creation date (`YYYY-MM-DD`) to number of tasks created that day.
    pub created_per_day: BTreeMap<String, i64>,
    /// Whole days from creation to completion, completed tasks only.
    pub days_to_complete: DaySpread,
    /// Whole days from creation to the due date, tasks with a due date only.
    pub days_until_due: DaySpread,
    /// Tasks created per UTC weekday, Monday first.
    pub created_per_weekday: [i64; 7],
    /// Due dates per weekday, Monday first.
    pub due_per_weekday: [i64; 7],
}

impl SqliteStore {
    pub fn task_stats(&self, now_ms: i64) -> Result<TaskStats, StoreError> {
        let mut stats = TaskStats::default();
        for status in TaskStatus::ALL {
            stats.by_status.insert(status, 0);
        }
        for priority in Priority::ALL {
            stats.by_priority.insert(priority, PriorityStats::default());
        }

        {
            let mut stmt = self
                .conn
                .prepare("SELECT status, COUNT(1) FROM tasks GROUP BY status")?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let raw: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                stats.total += count;
                if let Ok(status) = TaskStatus::parse(&raw) {
                    *stats.by_status.entry(status).or_insert(0) += count;
                }
            }
        }

        {
            let mut stmt = self.conn.prepare(
                "SELECT priority, COUNT(1), \
                        SUM(CASE WHEN status='completada' THEN 1 ELSE 0 END), \
                        AVG(estimated_minutes) \
                 FROM tasks GROUP BY priority",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let raw: String = row.get(0)?;
                let Ok(priority) = Priority::parse(&raw) else {
                    continue;
                };
                let entry = stats.by_priority.entry(priority).or_default();
                entry.total = row.get(1)?;
                entry.completed = row.get(2)?;
                entry.avg_estimated_minutes = row.get(3)?;
            }
        }

        stats.by_category = self
            .category_usage()?
            .into_iter()
            .map(|usage| CategoryStats {
                category_id: usage.category.id,
                name: usage.category.name,
                total: usage.total,
                completed: usage.completed,
            })
            .collect();

        let completed = stats
            .by_status
            .get(&TaskStatus::Completed)
            .copied()
            .unwrap_or(0);
        stats.completion_rate = if stats.total > 0 {
            completed as f64 / stats.total as f64
        } else {
            0.0
        };

        let now_due = due_at_from_ms(now_ms);
        stats.overdue = self.conn.query_row(
            "SELECT COUNT(1) FROM tasks \
             WHERE status != 'completada' AND due_at IS NOT NULL AND due_at < ?1",
            params![now_due],
            |row| row.get(0),
        )?;

        // Completion timestamps are compared in the same minute-resolution shape as due dates.
        {
            let mut stmt = self.conn.prepare(
                "SELECT due_at, completed_at_ms FROM tasks \
                 WHERE status='completada' AND due_at IS NOT NULL AND completed_at_ms IS NOT NULL",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let due_at: String = row.get(0)?;
                let completed_at_ms: i64 = row.get(1)?;
                if due_at_from_ms(completed_at_ms) <= due_at {
                    stats.completed_on_time += 1;
                } else {
                    stats.completed_late += 1;
                }
            }
        }

        stats.avg_estimated_minutes =
            self.conn
                .query_row("SELECT AVG(estimated_minutes) FROM tasks", [], |row| {
                    row.get(0)
                })?;

        {
            let mut stmt = self.conn.prepare(
                "SELECT date(created_at_ms / 1000, 'unixepoch') AS day, COUNT(1) \
                 FROM tasks GROUP BY day ORDER BY day",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let day: Option<String> = row.get(0)?;
                let count: i64 = row.get(1)?;
                if let Some(day) = day {
                    stats.created_per_day.insert(day, count);
                }
            }
        }

        {
            let mut to_complete = Vec::new();
            let mut until_due = Vec::new();
            let mut stmt = self
                .conn
                .prepare("SELECT created_at_ms, completed_at_ms, due_at, status FROM tasks")?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let created_at_ms: i64 = row.get(0)?;
                let completed_at_ms: Option<i64> = row.get(1)?;
                let due_at: Option<String> = row.get(2)?;
                let status: String = row.get(3)?;

                stats.created_per_weekday[weekday_index_from_ms(created_at_ms)] += 1;
                if let Some(completed_at_ms) = completed_at_ms
                    && status == TaskStatus::Completed.as_str()
                {
                    to_complete.push((completed_at_ms - created_at_ms).div_euclid(DAY_MS));
                }
                if let Some(due_ms) = due_at.as_deref().and_then(ms_from_due_at) {
                    stats.due_per_weekday[weekday_index_from_ms(due_ms)] += 1;
                    until_due.push((due_ms - created_at_ms).div_euclid(DAY_MS));
                }
            }
            stats.days_to_complete = DaySpread::from_days(to_complete);
            stats.days_until_due = DaySpread::from_days(until_due);
        }

        Ok(stats)
    }
}
