//! UI rendering module.
//!
//! Renders the three views (timeline, board, table), the task form, the
//! delete confirmation, the error popup, the help overlay and the log
//! pane. All state lives in `App`; nothing here mutates anything.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, FormField, LogLevel, View};
use crate::index;
use crate::models::Task;
use crate::theme::{avatar_color, colors, status_color, styles};
use crate::timeline::GanttWidget;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(colors::BG_DARK));
    frame.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Tab bar
            Constraint::Min(10),    // Main content
            Constraint::Length(1),  // Status line
            Constraint::Length(5),  // Log area
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);
    match app.view {
        View::Timeline => render_timeline_view(frame, app, chunks[1]),
        View::Board => render_board_view(frame, app, chunks[1]),
        View::Table => render_table_view(frame, app, chunks[1]),
    }
    render_status_line(frame, app, chunks[2]);
    render_logs(frame, app, chunks[3]);

    if app.form.is_some() {
        render_form_modal(frame, app, area);
    }
    if app.confirm.is_some() {
        render_confirm_dialog(frame, app, area);
    }
    if app.error_popup.is_some() {
        render_error_popup(frame, app, area);
    }
    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = [View::Timeline, View::Board, View::Table]
        .iter()
        .map(|view| {
            let style = if *view == app.view {
                styles::tab_active()
            } else {
                styles::tab_inactive()
            };
            Line::from(Span::styled(format!(" {} ", view.name()), style))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" Slate Production Planner ")
                .title_style(styles::title())
                .borders(Borders::ALL)
                .border_style(styles::border())
                .style(Style::default().bg(colors::BG_MEDIUM)),
        )
        .select(match app.view {
            View::Timeline => 0,
            View::Board => 1,
            View::Table => 2,
        })
        .style(styles::text())
        .highlight_style(styles::tab_active())
        .divider(Span::styled(" | ", styles::border_dim()));

    frame.render_widget(tabs, area);
}

// ============================================
// Views
// ============================================

fn render_timeline_view(frame: &mut Frame, app: &App, area: Rect) {
    let tasks = app.project_tasks();
    let groups = index::by_phase(&app.phases, &tasks);
    let selected = app.selected_task().map(|t| t.id);

    frame.render_widget(GanttWidget::new(&groups, selected), area);

    if tasks.is_empty() {
        render_empty_state(frame, area, "No tasks in this project", app.is_loading);
    }
}

fn render_board_view(frame: &mut Frame, app: &App, area: Rect) {
    let tasks = app.project_tasks();
    let groups = index::by_status(&tasks);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    // The cursor walks the board column by column, so the flat index keeps
    // counting across columns.
    let mut flat_idx = 0usize;
    for (i, (status, bucket)) in groups.iter().enumerate() {
        let items: Vec<ListItem> = bucket
            .iter()
            .map(|task| {
                let is_selected = flat_idx == app.selected;
                flat_idx += 1;
                board_card(task, is_selected)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(format!(" {} ({}) ", status, bucket.len()))
                .title_style(
                    Style::default()
                        .fg(status_color(*status))
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(styles::border_dim())
                .style(Style::default().bg(colors::BG_DARK)),
        );

        frame.render_widget(list, columns[i]);
    }

    if tasks.is_empty() {
        render_empty_state(frame, area, "No tasks in this project", app.is_loading);
    }
}

fn board_card(task: &Task, is_selected: bool) -> ListItem<'static> {
    let code_style = if is_selected {
        styles::selected()
    } else {
        Style::default()
            .fg(colors::FG_PRIMARY)
            .add_modifier(Modifier::BOLD)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(task.task_code.clone(), code_style),
            Span::raw(" "),
            Span::styled(
                task.end_date.format("due %b %d").to_string(),
                styles::text_hint(),
            ),
        ]),
        Line::from(Span::styled(task.name.clone(), styles::text())),
        Line::from(vec![
            Span::styled(
                format!(" {} ", task.avatar_initial()),
                Style::default()
                    .fg(colors::BG_DARK)
                    .bg(avatar_color(&task.avatar_color)),
            ),
            Span::raw(" "),
            Span::styled(task.phase_name.clone(), styles::text_dim()),
        ]),
        Line::from(""),
    ];

    ListItem::new(Text::from(lines))
}

fn render_table_view(frame: &mut Frame, app: &App, area: Rect) {
    let tasks = app.project_tasks();
    let groups = index::by_phase(&app.phases, &tasks);

    let mut items: Vec<ListItem> = vec![ListItem::new(Line::from(Span::styled(
        format!(
            "{:<10} {:<28} {:<16} {:<12} {:<11} {:<11} {:>4}",
            "ID", "NAME", "OWNER", "STATUS", "START", "DUE", "DUR"
        ),
        styles::text_hint(),
    )))];

    let mut flat_idx = 0usize;
    for (phase, bucket) in &groups {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("▼ {}", phase.name),
            Style::default()
                .fg(colors::PURPLE)
                .add_modifier(Modifier::BOLD),
        ))));

        for task in bucket {
            let is_selected = flat_idx == app.selected;
            flat_idx += 1;
            items.push(table_row(task, is_selected));
        }
    }

    let list = List::new(items).block(
        Block::default()
            .title(" Tasks ")
            .title_style(styles::title_accent())
            .borders(Borders::ALL)
            .border_style(styles::border())
            .style(Style::default().bg(colors::BG_DARK)),
    );

    frame.render_widget(list, area);

    if tasks.is_empty() {
        render_empty_state(frame, area, "No tasks in this project", app.is_loading);
    }
}

fn table_row(task: &Task, is_selected: bool) -> ListItem<'static> {
    let base = if is_selected {
        styles::selected()
    } else {
        styles::text()
    };

    let line = Line::from(vec![
        Span::styled(format!("{:<10} ", clip(&task.task_code, 10)), base),
        Span::styled(format!("{:<28} ", clip(&task.name, 28)), base),
        Span::styled(
            format!("{:<16} ", clip(&task.owner_name, 16)),
            if is_selected { base } else { styles::text_dim() },
        ),
        Span::styled(
            format!("{:<12} ", task.status.to_string()),
            if is_selected {
                base
            } else {
                Style::default().fg(status_color(task.status))
            },
        ),
        Span::styled(
            format!(
                "{:<11} {:<11} ",
                task.start_date.format("%Y-%m-%d"),
                task.end_date.format("%Y-%m-%d")
            ),
            if is_selected { base } else { styles::text_dim() },
        ),
        Span::styled(format!("{:>3}d", task.duration), base),
    ]);

    ListItem::new(line)
}

/// Truncate to `width` characters.
fn clip(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

// ============================================
// Status line and logs
// ============================================

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let hints = "c: New  e: Edit  d: Delete  p: Project  ?: Help  q: Quit ";
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(hints.len() as u16)])
        .split(area);

    let status = Paragraph::new(app.status_text())
        .style(Style::default().fg(colors::FG_DIM).bg(colors::BG_MEDIUM));
    frame.render_widget(status, chunks[0]);

    let hints = Paragraph::new(hints)
        .style(Style::default().fg(colors::FG_HINT).bg(colors::BG_MEDIUM))
        .alignment(Alignment::Right);
    frame.render_widget(hints, chunks[1]);
}

fn render_logs(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .logs
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| {
            let (prefix, color) = match entry.level {
                LogLevel::Info => ("i", colors::BLUE),
                LogLevel::Success => ("+", colors::GREEN),
                LogLevel::Warning => ("!", colors::YELLOW),
                LogLevel::Error => ("x", colors::RED),
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", prefix), Style::default().fg(color)),
                Span::styled(entry.message.clone(), styles::text_dim()),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" System Log ")
            .title_style(Style::default().fg(colors::FG_DIM))
            .borders(Borders::ALL)
            .border_style(styles::border_dim())
            .style(Style::default().bg(colors::BG_DARK)),
    );

    frame.render_widget(list, area);
}

fn render_empty_state(frame: &mut Frame, area: Rect, message: &str, is_loading: bool) {
    let text = if is_loading { "Loading..." } else { message };

    let paragraph = Paragraph::new(text)
        .style(styles::text_dim())
        .alignment(Alignment::Center);

    let inner = Block::default().borders(Borders::ALL).inner(area);
    let y = inner.y + inner.height / 2;
    let centered = Rect::new(inner.x, y, inner.width, 1);

    frame.render_widget(paragraph, centered);
}

// ============================================
// Task form modal
// ============================================

fn render_form_modal(frame: &mut Frame, app: &App, area: Rect) {
    let form = match &app.form {
        Some(f) => f,
        None => return,
    };

    let creating = form.editing.is_none();
    // Inputs are 3 rows each, plus spacer, buttons, margins and borders.
    let input_rows = if creating { 8 } else { 7 };
    let popup_height = input_rows * 3 + 6;
    let popup_area = centered_rect(56, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let title = if creating {
        " New Task ".to_string()
    } else {
        format!(" Edit {} ", form.task_code)
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title())
        .borders(Borders::ALL)
        .border_style(styles::border_focused())
        .style(Style::default().bg(colors::BG_MEDIUM));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut constraints: Vec<Constraint> = Vec::new();
    for _ in 0..input_rows {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(1)); // Spacer
    constraints.push(Constraint::Length(1)); // Buttons

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    let phase_name = app
        .phases
        .get(form.phase_idx)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "(no phases)".to_string());
    let owner_name = app
        .team_members
        .get(form.owner_idx)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| "(no members)".to_string());

    let mut rows: Vec<(&str, String, FieldKind, FormField)> = Vec::new();
    if creating {
        rows.push((
            "Task ID:",
            form.task_code.clone(),
            FieldKind::Text,
            FormField::TaskCode,
        ));
    }
    rows.push(("Name:", form.name.clone(), FieldKind::Text, FormField::TaskName));
    rows.push(("Phase:", phase_name, FieldKind::Selector, FormField::Phase));
    rows.push((
        "Status:",
        form.status.to_string(),
        FieldKind::Selector,
        FormField::Status,
    ));
    rows.push(("Owner:", owner_name, FieldKind::Selector, FormField::Owner));
    rows.push((
        "Start:",
        form.start_date.clone(),
        FieldKind::Date,
        FormField::StartDate,
    ));
    rows.push((
        "End:",
        form.end_date.clone(),
        FieldKind::Date,
        FormField::EndDate,
    ));
    rows.push((
        "Duration:",
        form.duration.clone(),
        FieldKind::Text,
        FormField::Duration,
    ));

    for (row, (label, value, kind, field)) in rows.into_iter().enumerate() {
        render_form_field(
            frame,
            label,
            &value,
            kind,
            form.current_field() == field,
            chunks[row],
        );
    }

    render_form_buttons(
        frame,
        form.current_field() == FormField::Submit,
        form.current_field() == FormField::Cancel,
        chunks[usize::from(input_rows) + 1],
    );

    if let Some(ref error) = form.error {
        let error_area = Rect::new(inner.x, inner.y + inner.height - 2, inner.width, 1);
        let error_text = Paragraph::new(error.as_str())
            .style(styles::error())
            .alignment(Alignment::Center);
        frame.render_widget(error_text, error_area);
    }
}

/// How a form input renders its affordance when focused.
enum FieldKind {
    /// Free text, shown with a block cursor.
    Text,
    /// Cycled with Up/Down, shown with arrows.
    Selector,
    /// Adjusted with arrow keys, shown with the day-step hints.
    Date,
}

fn render_form_field(
    frame: &mut Frame,
    label: &str,
    value: &str,
    kind: FieldKind,
    is_focused: bool,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(11), Constraint::Min(10)])
        .split(area);

    let label_text = Paragraph::new(label)
        .style(styles::form_label())
        .alignment(Alignment::Right);
    frame.render_widget(label_text, chunks[0]);

    let suffix = match kind {
        FieldKind::Text if is_focused => "█",
        FieldKind::Text => "",
        FieldKind::Selector if is_focused => " ▲▼",
        FieldKind::Selector => " ▼",
        FieldKind::Date if is_focused => "  ◀-7 ▲+1 ▼-1 +7▶",
        FieldKind::Date => "",
    };

    let input_style = if is_focused {
        styles::form_input_focused()
    } else {
        styles::form_input()
    };
    let border_style = if is_focused {
        styles::border_focused()
    } else {
        styles::border_dim()
    };

    let input = Paragraph::new(format!(" {}{}", value, suffix))
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).border_style(border_style));
    frame.render_widget(input, chunks[1]);
}

fn render_form_buttons(frame: &mut Frame, save_focused: bool, cancel_focused: bool, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(12),
            Constraint::Length(2),
            Constraint::Length(12),
            Constraint::Percentage(30),
        ])
        .split(area);

    let save_style = if save_focused {
        styles::button_focused()
    } else {
        styles::button()
    };
    let save_btn = Paragraph::new("  [ Save ]  ")
        .style(save_style)
        .alignment(Alignment::Center);
    frame.render_widget(save_btn, chunks[1]);

    let cancel_style = if cancel_focused {
        styles::button_danger()
    } else {
        styles::button()
    };
    let cancel_btn = Paragraph::new(" [ Cancel ] ")
        .style(cancel_style)
        .alignment(Alignment::Center);
    frame.render_widget(cancel_btn, chunks[3]);
}

// ============================================
// Dialogs and overlays
// ============================================

fn render_confirm_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let dialog = match &app.confirm {
        Some(d) => d,
        None => return,
    };

    let popup_area = centered_rect(45, 10, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Delete Task ")
        .title_style(Style::default().fg(colors::RED).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::RED))
        .style(Style::default().bg(colors::BG_MEDIUM));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Message
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Buttons
        ])
        .margin(1)
        .split(inner);

    let message = Paragraph::new(dialog.message.as_str())
        .style(styles::text())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(message, chunks[0]);

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(10),
            Constraint::Percentage(10),
            Constraint::Length(10),
            Constraint::Percentage(25),
        ])
        .split(chunks[2]);

    let no_style = if !dialog.yes_focused {
        styles::button_focused()
    } else {
        styles::button()
    };
    let no_btn = Paragraph::new("  [ No ]  ")
        .style(no_style)
        .alignment(Alignment::Center);
    frame.render_widget(no_btn, button_chunks[1]);

    let yes_style = if dialog.yes_focused {
        styles::button_danger()
    } else {
        styles::button()
    };
    let yes_btn = Paragraph::new(" [ Yes ]  ")
        .style(yes_style)
        .alignment(Alignment::Center);
    frame.render_widget(yes_btn, button_chunks[3]);
}

fn render_error_popup(frame: &mut Frame, app: &App, area: Rect) {
    let popup = match &app.error_popup {
        Some(p) => p,
        None => return,
    };

    let popup_width = (area.width * 60 / 100).clamp(30, 60);
    let popup_area = centered_rect(popup_width, 7, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", popup.title))
        .title_style(
            Style::default()
                .fg(Color::White)
                .bg(colors::RED)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::RED))
        .style(Style::default().bg(Color::Rgb(0x2A, 0x18, 0x18)));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = Paragraph::new(popup.message.as_str())
        .style(styles::text())
        .wrap(Wrap { trim: true });
    frame.render_widget(text, inner);

    let hint = Paragraph::new("Press ESC or ENTER to dismiss")
        .style(styles::text_hint())
        .alignment(Alignment::Center);
    let hint_area = Rect::new(
        popup_area.x,
        popup_area.y + popup_area.height - 1,
        popup_area.width,
        1,
    );
    frame.render_widget(hint, hint_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(58, 29, area);
    frame.render_widget(Clear, popup_area);

    let section = |label: &'static str| {
        Line::from(Span::styled(
            label,
            Style::default()
                .fg(colors::PURPLE)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let binding = |keys: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<16}", keys), Style::default().fg(colors::BLUE)),
            Span::raw(action),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(colors::BLUE)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Views"),
        binding("Tab/Shift+Tab", "Cycle views"),
        binding("1 / 2 / 3", "Timeline / Board / Table"),
        binding("p", "Next project"),
        Line::from(""),
        section("Navigation"),
        binding("j/k or Up/Down", "Move task cursor"),
        binding("g / G", "First / last task"),
        Line::from(""),
        section("Tasks"),
        binding("c", "New task"),
        binding("e", "Edit selected task"),
        binding("d / Delete", "Delete selected task"),
        Line::from(""),
        section("Form"),
        binding("Tab / Enter", "Next field / submit on Save"),
        binding("Up/Down", "Adjust date or selection"),
        binding("Left/Right", "Date: +/- 7 days"),
        binding("Esc", "Close and discard"),
        Line::from(""),
        section("General"),
        binding("r", "Refresh data"),
        binding("q / Ctrl+C", "Quit"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .title_style(styles::title())
                .borders(Borders::ALL)
                .border_style(styles::border())
                .style(Style::default().bg(colors::BG_MEDIUM)),
        )
        .style(styles::text());

    frame.render_widget(paragraph, popup_area);
}

/// Helper to create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
