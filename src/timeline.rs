//! Week-column Gantt timeline.
//!
//! The viewport is seven fixed week columns anchored at the project epoch.
//! `task_span` is the pure date-to-position math; `GanttWidget` projects
//! the resulting percentages onto terminal columns and renders the task
//! bars grouped by phase.

use chrono::{Datelike, Duration, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::models::{Phase, Task};
use crate::theme::{colors, status_color, styles};

/// Number of week columns in the viewport.
pub const WEEKS_SHOWN: i64 = 7;

/// Width of one week column, as a percentage of the bar area.
pub const WEEK_PCT: f64 = 100.0 / 7.0;

/// Left edge of the visible timeline.
pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 8).expect("valid epoch date")
}

/// A task's position within the viewport, in days and in percentages of
/// the bar area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskSpan {
    /// Days between the epoch and the task start. Negative for tasks that
    /// start before the epoch.
    pub offset_days: i64,
    /// Calendar days covered, inclusive of both endpoints.
    pub duration_days: i64,
    /// Left edge as a percentage of the bar area. Clamped at zero for
    /// pre-epoch starts; the width keeps the full duration.
    pub left_pct: f64,
    /// Bar width as a percentage of the bar area. Not rounded.
    pub width_pct: f64,
}

/// Map a task's date range onto the fixed seven-week viewport.
pub fn task_span(start: NaiveDate, end: NaiveDate) -> TaskSpan {
    let offset_days = (start - epoch()).num_days();
    let duration_days = (end - start).num_days() + 1;
    let left_pct = ((offset_days as f64 / 7.0) * WEEK_PCT).max(0.0);
    let width_pct = (duration_days as f64 / 7.0) * WEEK_PCT;
    TaskSpan {
        offset_days,
        duration_days,
        left_pct,
        width_pct,
    }
}

/// Project a span onto `width` terminal columns. Returns the starting
/// column and the column count, or None when the bar falls entirely past
/// the right edge. Bars always get at least one column so short tasks
/// stay visible.
pub fn columns_for_span(span: &TaskSpan, width: u16) -> Option<(u16, u16)> {
    if width == 0 {
        return None;
    }
    let total = f64::from(width);
    let left = (span.left_pct / 100.0 * total).round() as i64;
    if left >= i64::from(width) {
        return None;
    }
    let cols = ((span.width_pct / 100.0 * total).round() as i64).max(1);
    let end = (left + cols - 1).min(i64::from(width) - 1);
    Some((left as u16, (end - left + 1) as u16))
}

/// Header label for week column `index` (0-based), e.g. "W2 08-14 JAN".
pub fn week_label(index: i64) -> String {
    let start = epoch() + Duration::days(index * 7);
    let end = start + Duration::days(6);
    format!(
        "W{} {:02}-{:02} {}",
        start.iso_week().week(),
        start.day(),
        end.day(),
        start.format("%b").to_string().to_uppercase()
    )
}

const BLOCK_FULL: char = '█';
const GRIDLINE: char = '┆';
const PHASE_MARKER: &str = "▼ ";

/// Gantt chart over the phase-grouped task list.
pub struct GanttWidget<'a> {
    groups: &'a [(&'a Phase, Vec<&'a Task>)],
    selected: Option<i64>,
}

impl<'a> GanttWidget<'a> {
    pub fn new(groups: &'a [(&'a Phase, Vec<&'a Task>)], selected: Option<i64>) -> Self {
        Self { groups, selected }
    }

    fn render_week_header(&self, area: Rect, buf: &mut Buffer) {
        for week in 0..WEEKS_SHOWN {
            let col = (week * i64::from(area.width) / WEEKS_SHOWN) as u16;
            let next = ((week + 1) * i64::from(area.width) / WEEKS_SHOWN) as u16;
            // Keep each label inside its own column.
            let room = next.saturating_sub(col).saturating_sub(1) as usize;
            let label: String = week_label(week).chars().take(room).collect();
            buf.set_string(area.x + col, area.y, &label, styles::text_dim());
        }
    }

    fn render_gridlines(&self, bar_x: u16, bar_width: u16, y: u16, buf: &mut Buffer) {
        // Week boundaries; the first one doubles as the name-column edge.
        for week in 0..WEEKS_SHOWN {
            let col = (week * i64::from(bar_width) / WEEKS_SHOWN) as u16;
            buf.set_string(
                bar_x + col,
                y,
                &GRIDLINE.to_string(),
                Style::default().fg(colors::BORDER_DIM),
            );
        }
    }

    fn render_task_row(
        &self,
        task: &Task,
        name_width: usize,
        bar_x: u16,
        bar_width: u16,
        y: u16,
        x: u16,
        buf: &mut Buffer,
    ) {
        let is_selected = self.selected == Some(task.id);

        // Left column: task code plus name, truncated to fit.
        let label: String = format!("{} {}", task.task_code, task.name)
            .chars()
            .take(name_width)
            .collect();
        let label_style = if is_selected {
            Style::default()
                .fg(colors::BG_DARK)
                .bg(colors::BLUE)
                .add_modifier(Modifier::BOLD)
        } else {
            styles::text()
        };
        buf.set_string(x, y, format!("{:<width$}", label, width = name_width), label_style);

        self.render_gridlines(bar_x, bar_width, y, buf);

        let span = task_span(task.start_date, task.end_date);
        let Some((start_col, cols)) = columns_for_span(&span, bar_width) else {
            return;
        };

        let color = status_color(task.status);
        let bar_style = if is_selected {
            Style::default()
                .fg(colors::BG_DARK)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };

        if cols >= 4 {
            // Wide enough to carry the task name inside the bar.
            let text: String = task.name.chars().take(cols as usize).collect();
            let filled = format!("{:<width$}", text, width = cols as usize);
            buf.set_string(
                bar_x + start_col,
                y,
                filled,
                Style::default().fg(colors::BG_DARK).bg(color),
            );
        } else {
            for col in 0..cols {
                let pos = (bar_x + start_col + col, y);
                buf[pos].set_char(BLOCK_FULL);
                buf[pos].set_style(bar_style);
            }
        }
    }
}

impl Widget for GanttWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Timeline ")
            .title_style(styles::title_accent())
            .borders(Borders::ALL)
            .border_style(styles::border())
            .style(Style::default().bg(colors::BG_DARK));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 40 || inner.height < 3 {
            return;
        }

        let name_width: usize = 24;
        let bar_x = inner.x + name_width as u16 + 1;
        let bar_width = inner.width - name_width as u16 - 1;

        self.render_week_header(Rect::new(bar_x, inner.y, bar_width, 1), buf);

        let mut y = inner.y + 1;
        let bottom = inner.y + inner.height;
        'outer: for (phase, tasks) in self.groups {
            if y >= bottom {
                break;
            }
            buf.set_string(
                inner.x,
                y,
                format!("{}{}", PHASE_MARKER, phase.name),
                Style::default()
                    .fg(colors::PURPLE)
                    .add_modifier(Modifier::BOLD),
            );
            self.render_gridlines(bar_x, bar_width, y, buf);
            y += 1;

            for task in tasks {
                if y >= bottom {
                    break 'outer;
                }
                self.render_task_row(task, name_width, bar_x, bar_width, y, inner.x, buf);
                y += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reference_task_lands_at_origin() {
        // Five days starting exactly at the epoch.
        let span = task_span(date(2026, 1, 8), date(2026, 1, 12));
        assert_eq!(span.offset_days, 0);
        assert_eq!(span.duration_days, 5);
        assert_eq!(span.left_pct, 0.0);
        // (5/7) * (100/7) ≈ 10.204%
        assert!((span.width_pct - 10.2041).abs() < 1e-3);
    }

    #[test]
    fn width_is_positive_for_any_valid_range() {
        let cases = [
            (date(2026, 1, 8), date(2026, 1, 8)),
            (date(2026, 1, 1), date(2026, 3, 1)),
            (date(2025, 12, 20), date(2025, 12, 25)),
        ];
        for (start, end) in cases {
            let span = task_span(start, end);
            assert!(span.width_pct > 0.0, "{start} - {end}");
            assert!(span.duration_days >= 1);
        }
    }

    #[test]
    fn pre_epoch_start_clamps_left_but_keeps_offset_sign() {
        let span = task_span(date(2026, 1, 1), date(2026, 1, 10));
        assert_eq!(span.offset_days, -7);
        assert_eq!(span.left_pct, 0.0);
        assert_eq!(span.duration_days, 10);
    }

    #[test]
    fn one_week_task_fills_one_column_of_seven() {
        let span = task_span(date(2026, 1, 8), date(2026, 1, 14));
        assert!((span.width_pct - WEEK_PCT).abs() < 1e-9);

        // On a 70-column bar each week is 10 columns.
        let (start, cols) = columns_for_span(&span, 70).unwrap();
        assert_eq!(start, 0);
        assert_eq!(cols, 10);
    }

    #[test]
    fn span_past_viewport_is_culled() {
        // Starts 49 days (7 weeks) after the epoch: just past the edge.
        let span = task_span(date(2026, 2, 26), date(2026, 3, 2));
        assert!(span.left_pct >= 100.0);
        assert_eq!(columns_for_span(&span, 70), None);
    }

    #[test]
    fn short_task_still_gets_one_column() {
        let span = task_span(date(2026, 1, 9), date(2026, 1, 9));
        let (_, cols) = columns_for_span(&span, 20).unwrap();
        assert_eq!(cols, 1);
    }

    #[test]
    fn week_labels_derive_from_epoch() {
        assert_eq!(week_label(0), "W2 08-14 JAN");
        assert_eq!(week_label(1), "W3 15-21 JAN");
        // Week 4 crosses into February.
        assert_eq!(week_label(4), "W6 05-11 FEB");
    }
}
