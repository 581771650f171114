//! Application state and event handling.
//!
//! One state record, mutated only by its handler methods: the active view,
//! the loaded collections, the project filter, and the modal stack (task
//! form, delete confirmation, error popup). Key handlers return the store
//! command to dispatch, if any.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::index;
use crate::models::{Phase, Project, Status, Task, TaskDraft, TeamMember};
use crate::store::{StoreCommand, StoreMessage, StoreMode};

/// Active view. Any view is reachable from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Week-column Gantt chart grouped by phase (default).
    #[default]
    Timeline,
    /// Status board.
    Board,
    /// Phase-grouped table.
    Table,
}

impl View {
    pub fn next(&self) -> Self {
        match self {
            View::Timeline => View::Board,
            View::Board => View::Table,
            View::Table => View::Timeline,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            View::Timeline => View::Table,
            View::Board => View::Timeline,
            View::Table => View::Board,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::Timeline => "Timeline",
            View::Board => "Board",
            View::Table => "Table",
        }
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// The task form is open.
    Editing,
    /// The delete confirmation dialog is open.
    Confirming,
}

// ============================================
// Task form
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    TaskCode,
    TaskName,
    Phase,
    Status,
    Owner,
    StartDate,
    EndDate,
    Duration,
    Submit,
    Cancel,
}

impl FormField {
    /// Fields for the create form. The task code is only editable here;
    /// it is immutable once the task exists.
    pub fn create_fields() -> &'static [FormField] {
        &[
            FormField::TaskCode,
            FormField::TaskName,
            FormField::Phase,
            FormField::Status,
            FormField::Owner,
            FormField::StartDate,
            FormField::EndDate,
            FormField::Duration,
            FormField::Submit,
            FormField::Cancel,
        ]
    }

    pub fn edit_fields() -> &'static [FormField] {
        &[
            FormField::TaskName,
            FormField::Phase,
            FormField::Status,
            FormField::Owner,
            FormField::StartDate,
            FormField::EndDate,
            FormField::Duration,
            FormField::Submit,
            FormField::Cancel,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::TaskCode => "Task ID",
            FormField::TaskName => "Name",
            FormField::Phase => "Phase",
            FormField::Status => "Status",
            FormField::Owner => "Owner",
            FormField::StartDate => "Start",
            FormField::EndDate => "End",
            FormField::Duration => "Duration",
            FormField::Submit => "Save",
            FormField::Cancel => "Cancel",
        }
    }

    pub fn is_text_input(&self) -> bool {
        matches!(
            self,
            FormField::TaskCode | FormField::TaskName | FormField::Duration
        )
    }

    pub fn is_date_picker(&self) -> bool {
        matches!(self, FormField::StartDate | FormField::EndDate)
    }

    pub fn is_selector(&self) -> bool {
        matches!(self, FormField::Phase | FormField::Status | FormField::Owner)
    }
}

/// State of the task form modal. Closing the form discards everything in
/// here; nothing is applied until a submit round-trips the store.
#[derive(Debug, Clone)]
pub struct FormState {
    /// Id of the task being edited; None when creating.
    pub editing: Option<i64>,
    pub focused: usize,
    pub fields: Vec<FormField>,
    pub error: Option<String>,
    pub task_code: String,
    pub name: String,
    pub phase_idx: usize,
    pub status: Status,
    pub owner_idx: usize,
    pub start_date: String,
    pub end_date: String,
    pub duration: String,
}

impl FormState {
    /// Create form, seeded with defaults: today, a five-day span, and the
    /// first available phase and owner.
    pub fn create() -> Self {
        let today = chrono::Local::now().date_naive();
        let end = today + chrono::Duration::days(5);
        Self {
            editing: None,
            focused: 0,
            fields: FormField::create_fields().to_vec(),
            error: None,
            task_code: String::new(),
            name: String::new(),
            phase_idx: 0,
            status: Status::Open,
            owner_idx: 0,
            start_date: today.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            duration: "5".to_string(),
        }
    }

    /// Edit form, seeded from the existing task.
    pub fn edit(task: &Task, phases: &[Phase], members: &[TeamMember]) -> Self {
        let phase_idx = phases
            .iter()
            .position(|p| p.id == task.phase_id)
            .unwrap_or(0);
        let owner_idx = members
            .iter()
            .position(|m| m.id == task.owner_id)
            .unwrap_or(0);
        Self {
            editing: Some(task.id),
            focused: 0,
            fields: FormField::edit_fields().to_vec(),
            error: None,
            task_code: task.task_code.clone(),
            name: task.name.clone(),
            phase_idx,
            status: task.status,
            owner_idx,
            start_date: task.start_date.format("%Y-%m-%d").to_string(),
            end_date: task.end_date.format("%Y-%m-%d").to_string(),
            duration: task.duration.to_string(),
        }
    }

    pub fn current_field(&self) -> FormField {
        self.fields[self.focused]
    }

    pub fn next_field(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focused = self.focused.checked_sub(1).unwrap_or(self.fields.len() - 1);
    }

    fn current_text_mut(&mut self) -> Option<&mut String> {
        match self.current_field() {
            FormField::TaskCode => Some(&mut self.task_code),
            FormField::TaskName => Some(&mut self.name),
            FormField::Duration => Some(&mut self.duration),
            _ => None,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(text) = self.current_text_mut() {
            text.push(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(text) = self.current_text_mut() {
            text.pop();
        }
    }

    /// Shift the focused date field by `days`.
    pub fn shift_date(&mut self, days: i64) {
        match self.current_field() {
            FormField::StartDate => {
                self.start_date = Self::add_days_to_date_string(&self.start_date, days);
            }
            FormField::EndDate => {
                self.end_date = Self::add_days_to_date_string(&self.end_date, days);
            }
            _ => {}
        }
    }

    fn add_days_to_date_string(date_str: &str, days: i64) -> String {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map(|d| {
                (d + chrono::Duration::days(days))
                    .format("%Y-%m-%d")
                    .to_string()
            })
            .unwrap_or_else(|_| {
                chrono::Local::now()
                    .date_naive()
                    .format("%Y-%m-%d")
                    .to_string()
            })
    }

    /// Assemble the write DTO from the form. Unparseable dates fall back
    /// to today / start+5 the same way the create form seeds them.
    pub fn build_draft(
        &self,
        phases: &[Phase],
        members: &[TeamMember],
        project_id: i64,
    ) -> TaskDraft {
        let phase_id = phases.get(self.phase_idx).map(|p| p.id).unwrap_or(0);
        let owner_id = members.get(self.owner_idx).map(|m| m.id).unwrap_or(0);
        let start_date = NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d")
            .unwrap_or_else(|_| chrono::Local::now().date_naive());
        let end_date = NaiveDate::parse_from_str(&self.end_date, "%Y-%m-%d")
            .unwrap_or_else(|_| start_date + chrono::Duration::days(5));

        TaskDraft {
            task_code: self.task_code.clone(),
            name: self.name.clone(),
            phase_id,
            status: self.status,
            owner_id,
            start_date,
            end_date,
            duration: self.duration.trim().parse().unwrap_or(5),
            project_id,
        }
    }
}

// ============================================
// Dialogs and notifications
// ============================================

/// Delete confirmation dialog.
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub task_id: i64,
    pub message: String,
    /// Whether "Yes" is focused (false = "No").
    pub yes_focused: bool,
}

impl ConfirmDialog {
    pub fn new_delete(task: &Task) -> Self {
        Self {
            task_id: task.id,
            message: format!(
                "Delete \"{} {}\"?\nThis action cannot be undone.",
                task.task_code, task.name
            ),
            yes_focused: false,
        }
    }
}

/// Transient error notification, auto-dismissed after a few seconds.
#[derive(Debug, Clone)]
pub struct ErrorPopup {
    pub title: String,
    pub message: String,
    pub shown_at: Instant,
    pub auto_dismiss: Option<Duration>,
}

impl ErrorPopup {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            shown_at: Instant::now(),
            auto_dismiss: Some(Duration::from_secs(5)),
        }
    }

    pub fn should_dismiss(&self) -> bool {
        match self.auto_dismiss {
            Some(duration) => self.shown_at.elapsed() > duration,
            None => false,
        }
    }
}

/// Entry in the system log pane.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub message: String,
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: LogLevel::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: LogLevel::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: LogLevel::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: LogLevel::Error,
        }
    }
}

// ============================================
// Application state
// ============================================

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub view: View,
    pub input_mode: InputMode,

    /// Which backing store serves this session; None until loaded.
    pub mode: Option<StoreMode>,

    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    pub phases: Vec<Phase>,
    pub team_members: Vec<TeamMember>,

    /// Project filter applied to every view.
    pub selected_project: Option<i64>,
    /// Cursor position within the current view's visible ordering.
    pub selected: usize,

    pub form: Option<FormState>,
    pub confirm: Option<ConfirmDialog>,
    pub error_popup: Option<ErrorPopup>,

    pub logs: Vec<LogEntry>,
    max_logs: usize,

    pub is_loading: bool,
    pub show_help: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        let mut app = Self {
            should_quit: false,
            view: View::Timeline,
            input_mode: InputMode::Normal,
            mode: None,
            projects: Vec::new(),
            tasks: Vec::new(),
            phases: Vec::new(),
            team_members: Vec::new(),
            selected_project: None,
            selected: 0,
            form: None,
            confirm: None,
            error_popup: None,
            logs: Vec::new(),
            max_logs: 100,
            is_loading: true,
            show_help: false,
        };

        app.log(LogEntry::info("slate-tui initialized"));
        app.log(LogEntry::info("Opening data store..."));
        app
    }

    pub fn log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
        if self.logs.len() > self.max_logs {
            self.logs.remove(0);
        }
    }

    pub fn show_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        let title = title.into();
        let message = message.into();
        self.log(LogEntry::error(format!("{}: {}", title, message)));
        self.error_popup = Some(ErrorPopup::new(title, message));
    }

    pub fn dismiss_error(&mut self) {
        self.error_popup = None;
    }

    // ============================================
    // Derived collections
    // ============================================

    /// Tasks of the selected project, in backend order.
    pub fn project_tasks(&self) -> Vec<&Task> {
        match self.selected_project {
            Some(id) => self.tasks.iter().filter(|t| t.project_id == id).collect(),
            None => self.tasks.iter().collect(),
        }
    }

    /// The current view's tasks in cursor order: phase-grouped for the
    /// timeline and table, status-grouped for the board.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let filtered = self.project_tasks();
        match self.view {
            View::Board => index::status_order(&filtered),
            View::Timeline | View::Table => index::phase_order(&self.phases, &filtered),
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected).copied()
    }

    pub fn selected_project_name(&self) -> &str {
        self.selected_project
            .and_then(|id| self.projects.iter().find(|p| p.id == id))
            .map(|p| p.name.as_str())
            .unwrap_or("All projects")
    }

    // ============================================
    // Store messages
    // ============================================

    fn apply_dataset(&mut self, data: crate::models::Dataset) {
        self.projects = data.projects;
        self.tasks = data.tasks;
        self.phases = data.phases;
        self.team_members = data.team_members;
        // Bucket order in every view follows the phase order field.
        self.phases.sort_by_key(|p| p.order);

        let valid = self
            .selected_project
            .map(|id| self.projects.iter().any(|p| p.id == id))
            .unwrap_or(false);
        if !valid {
            self.selected_project = self.projects.first().map(|p| p.id);
        }

        let visible = self.visible_tasks().len();
        if self.selected >= visible {
            self.selected = visible.saturating_sub(1);
        }
    }

    pub fn handle_store_message(&mut self, message: StoreMessage) {
        match message {
            StoreMessage::Loaded {
                mode,
                data,
                selected_project,
            } => {
                self.mode = Some(mode);
                self.selected_project = selected_project;
                self.apply_dataset(data);
                self.is_loading = false;
                self.log(LogEntry::success(format!(
                    "Loaded {} tasks across {} projects ({} mode)",
                    self.tasks.len(),
                    self.projects.len(),
                    mode
                )));
            }
            StoreMessage::Refreshed(data) => {
                self.apply_dataset(data);
                self.is_loading = false;
                self.log(LogEntry::success(format!(
                    "Data refreshed ({} tasks)",
                    self.tasks.len()
                )));
            }
            StoreMessage::TaskCreated(task) => {
                self.log(LogEntry::success(format!("Task {} created", task.task_code)));
                self.close_form();
            }
            StoreMessage::TaskUpdated(task) => {
                self.log(LogEntry::success(format!("Task {} updated", task.task_code)));
                self.close_form();
            }
            StoreMessage::TaskDeleted(_) => {
                self.log(LogEntry::success("Task deleted"));
                self.close_confirm();
            }
            StoreMessage::Error(error) => {
                self.is_loading = false;
                self.show_error("Store Error", error);
            }
        }
    }

    // ============================================
    // Modal management
    // ============================================

    pub fn open_create_form(&mut self) {
        self.form = Some(FormState::create());
        self.input_mode = InputMode::Editing;
    }

    pub fn open_edit_form(&mut self) {
        let form = self
            .selected_task()
            .map(|task| FormState::edit(task, &self.phases, &self.team_members));
        if let Some(form) = form {
            self.form = Some(form);
            self.input_mode = InputMode::Editing;
        }
    }

    pub fn open_delete_confirm(&mut self) {
        if let Some(task) = self.selected_task() {
            self.confirm = Some(ConfirmDialog::new_delete(task));
            self.input_mode = InputMode::Confirming;
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn close_confirm(&mut self) {
        self.confirm = None;
        self.input_mode = InputMode::Normal;
    }

    // ============================================
    // Key handling
    // ============================================

    /// Handle a key event; returns the store command to dispatch, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        if self.error_popup.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
                self.dismiss_error();
            }
            return None;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                self.show_help = false;
            }
            return None;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Editing => self.handle_editing_key(key),
            InputMode::Confirming => self.handle_confirming_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return Some(StoreCommand::Shutdown);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                return Some(StoreCommand::Shutdown);
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return None;
            }
            KeyCode::Char('r') => {
                self.is_loading = true;
                self.log(LogEntry::info("Refreshing data..."));
                return Some(StoreCommand::Refresh);
            }
            KeyCode::Tab => {
                self.view = self.view.next();
                self.selected = 0;
                return None;
            }
            KeyCode::BackTab => {
                self.view = self.view.previous();
                self.selected = 0;
                return None;
            }
            KeyCode::Char('1') => {
                self.view = View::Timeline;
                self.selected = 0;
                return None;
            }
            KeyCode::Char('2') => {
                self.view = View::Board;
                self.selected = 0;
                return None;
            }
            KeyCode::Char('3') => {
                self.view = View::Table;
                self.selected = 0;
                return None;
            }
            KeyCode::Char('p') => {
                return self.cycle_project();
            }
            KeyCode::Char('c') => {
                self.open_create_form();
                return None;
            }
            KeyCode::Char('e') => {
                self.open_edit_form();
                return None;
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.open_delete_confirm();
                return None;
            }
            _ => {}
        }

        let total = self.visible_tasks().len();
        if total == 0 {
            return None;
        }
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = (self.selected + 1) % total;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.checked_sub(1).unwrap_or(total - 1);
            }
            KeyCode::Char('g') => {
                self.selected = 0;
            }
            KeyCode::Char('G') => {
                self.selected = total - 1;
            }
            _ => {}
        }

        None
    }

    fn cycle_project(&mut self) -> Option<StoreCommand> {
        if self.projects.is_empty() {
            return None;
        }
        let current = self
            .selected_project
            .and_then(|id| self.projects.iter().position(|p| p.id == id));
        let next = match current {
            Some(i) => (i + 1) % self.projects.len(),
            None => 0,
        };
        self.selected_project = Some(self.projects[next].id);
        self.selected = 0;
        self.log(LogEntry::info(format!(
            "Project: {}",
            self.projects[next].name
        )));
        Some(StoreCommand::SelectProject(self.selected_project))
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        if self.form.is_none() {
            self.input_mode = InputMode::Normal;
            return None;
        }

        match key.code {
            KeyCode::Esc => {
                // Discards unsaved edits.
                self.close_form();
                None
            }
            KeyCode::Tab => {
                if let Some(form) = &mut self.form {
                    form.next_field();
                }
                None
            }
            KeyCode::BackTab => {
                if let Some(form) = &mut self.form {
                    form.prev_field();
                }
                None
            }
            KeyCode::Enter => self.handle_form_submit(),
            KeyCode::Backspace => {
                if let Some(form) = &mut self.form {
                    form.handle_backspace();
                }
                None
            }
            KeyCode::Up => {
                self.handle_form_arrow(1);
                None
            }
            KeyCode::Down => {
                self.handle_form_arrow(-1);
                None
            }
            KeyCode::Left => {
                if let Some(form) = &mut self.form {
                    if form.current_field().is_date_picker() {
                        form.shift_date(-7);
                    }
                }
                None
            }
            KeyCode::Right => {
                if let Some(form) = &mut self.form {
                    if form.current_field().is_date_picker() {
                        form.shift_date(7);
                    }
                }
                None
            }
            KeyCode::Char(c) => {
                if let Some(form) = &mut self.form {
                    form.handle_char(c);
                }
                None
            }
            _ => None,
        }
    }

    /// Up/Down on a form field: dates shift by a day, selectors cycle.
    fn handle_form_arrow(&mut self, direction: i64) {
        let phase_count = self.phases.len();
        let member_count = self.team_members.len();
        let Some(form) = &mut self.form else {
            return;
        };

        let field = form.current_field();
        if field.is_date_picker() {
            form.shift_date(direction);
            return;
        }
        match field {
            FormField::Phase => {
                if direction > 0 {
                    form.phase_idx = form.phase_idx.saturating_sub(1);
                } else if form.phase_idx + 1 < phase_count {
                    form.phase_idx += 1;
                }
            }
            FormField::Owner => {
                if direction > 0 {
                    form.owner_idx = form.owner_idx.saturating_sub(1);
                } else if form.owner_idx + 1 < member_count {
                    form.owner_idx += 1;
                }
            }
            FormField::Status => {
                form.status = form.status.next();
            }
            _ => {}
        }
    }

    fn handle_form_submit(&mut self) -> Option<StoreCommand> {
        let form = self.form.as_ref()?;

        if form.current_field() == FormField::Cancel {
            self.close_form();
            return None;
        }

        // Enter on an input field advances instead of submitting.
        if form.current_field() != FormField::Submit {
            if let Some(form) = &mut self.form {
                form.next_field();
            }
            return None;
        }

        let project_id = self.selected_project.unwrap_or(0);
        let draft = form.build_draft(&self.phases, &self.team_members, project_id);
        if let Err(e) = draft.validate() {
            if let Some(form) = &mut self.form {
                form.error = Some(e.to_string());
            }
            return None;
        }

        match form.editing {
            Some(id) => {
                self.log(LogEntry::info("Updating task..."));
                Some(StoreCommand::UpdateTask(id, draft))
            }
            None => {
                self.log(LogEntry::info("Creating task..."));
                Some(StoreCommand::CreateTask(draft))
            }
        }
    }

    fn handle_confirming_key(&mut self, key: KeyEvent) -> Option<StoreCommand> {
        if self.confirm.is_none() {
            self.input_mode = InputMode::Normal;
            return None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.close_confirm();
                None
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                if let Some(dialog) = &mut self.confirm {
                    dialog.yes_focused = !dialog.yes_focused;
                }
                None
            }
            KeyCode::Enter => {
                let dialog = self.confirm.as_ref()?;
                if dialog.yes_focused {
                    let id = dialog.task_id;
                    self.log(LogEntry::info("Deleting task..."));
                    Some(StoreCommand::DeleteTask(id))
                } else {
                    self.close_confirm();
                    None
                }
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let id = self.confirm.as_ref()?.task_id;
                self.log(LogEntry::info("Deleting task..."));
                Some(StoreCommand::DeleteTask(id))
            }
            _ => None,
        }
    }

    // ============================================
    // Frame tick and status line
    // ============================================

    /// Called every frame; drives the popup auto-dismiss timer.
    pub fn tick(&mut self) {
        if let Some(popup) = &self.error_popup {
            if popup.should_dismiss() {
                self.error_popup = None;
            }
        }
    }

    pub fn status_text(&self) -> String {
        let mode = self
            .mode
            .map(|m| m.to_string())
            .unwrap_or_else(|| "Starting".to_string());
        let loading = if self.is_loading { " [Loading...]" } else { "" };

        format!(
            " {}{} | {} | {} | {} tasks",
            mode,
            loading,
            self.selected_project_name(),
            self.view.name(),
            self.project_tasks().len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dataset;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_app() -> App {
        let mut app = App::new();
        app.handle_store_message(StoreMessage::Loaded {
            mode: StoreMode::Demo,
            data: crate::demo::snapshot().data,
            selected_project: Some(1),
        });
        app
    }

    #[test]
    fn create_form_seeds_default_values() {
        let mut app = loaded_app();
        app.open_create_form();

        let form = app.form.as_ref().unwrap();
        let today = chrono::Local::now().date_naive();
        assert_eq!(form.editing, None);
        assert_eq!(form.start_date, today.format("%Y-%m-%d").to_string());
        assert_eq!(
            form.end_date,
            (today + chrono::Duration::days(5))
                .format("%Y-%m-%d")
                .to_string()
        );
        assert_eq!(form.duration, "5");
        assert_eq!(form.phase_idx, 0);
        assert_eq!(form.owner_idx, 0);
        assert_eq!(form.status, Status::Open);
        assert!(form.fields.contains(&FormField::TaskCode));
    }

    #[test]
    fn edit_form_seeds_from_task_and_locks_the_code() {
        let mut app = loaded_app();
        app.selected = 0;
        let task = app.selected_task().unwrap().clone();
        app.open_edit_form();

        let form = app.form.as_ref().unwrap();
        assert_eq!(form.editing, Some(task.id));
        assert_eq!(form.task_code, task.task_code);
        assert_eq!(form.name, task.name);
        assert_eq!(
            form.start_date,
            task.start_date.format("%Y-%m-%d").to_string()
        );
        // Task codes are immutable once created.
        assert!(!form.fields.contains(&FormField::TaskCode));
    }

    #[test]
    fn closing_the_form_discards_edits() {
        let mut app = loaded_app();
        app.open_create_form();
        app.handle_key(key(KeyCode::Char('X')));
        app.handle_key(key(KeyCode::Esc));

        assert!(app.form.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);

        // Reopening starts clean.
        app.open_create_form();
        assert_eq!(app.form.as_ref().unwrap().task_code, "");
    }

    #[test]
    fn failed_mutation_leaves_the_task_list_untouched() {
        let mut app = loaded_app();
        let before = app.tasks.clone();

        app.handle_store_message(StoreMessage::Error("boom".to_string()));

        assert_eq!(app.tasks, before);
        assert!(app.error_popup.is_some());
    }

    #[test]
    fn every_view_is_reachable_from_every_other() {
        let mut app = loaded_app();
        assert_eq!(app.view, View::Timeline);

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.view, View::Board);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.view, View::Table);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.view, View::Timeline);

        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.view, View::Table);
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.view, View::Timeline);
    }

    #[test]
    fn visible_ordering_covers_the_whole_project_in_every_view() {
        let mut app = loaded_app();
        let expected = app.project_tasks().len();

        for view in [View::Timeline, View::Board, View::Table] {
            app.view = view;
            let visible = app.visible_tasks();
            assert_eq!(visible.len(), expected, "{:?}", view);
        }
    }

    #[test]
    fn delete_flow_issues_the_command_for_the_selected_task() {
        let mut app = loaded_app();
        app.selected = 1;
        let target = app.selected_task().unwrap().id;

        app.handle_key(key(KeyCode::Char('d')));
        assert!(app.confirm.is_some());
        assert_eq!(app.input_mode, InputMode::Confirming);

        let cmd = app.handle_key(key(KeyCode::Char('y')));
        match cmd {
            Some(StoreCommand::DeleteTask(id)) => assert_eq!(id, target),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn submit_blocks_on_validation_failure() {
        let mut app = loaded_app();
        app.open_create_form();

        // Jump to the submit button with the name still empty.
        {
            let form = app.form.as_mut().unwrap();
            while form.current_field() != FormField::Submit {
                form.next_field();
            }
        }

        let cmd = app.handle_key(key(KeyCode::Enter));
        assert!(cmd.is_none());
        let form = app.form.as_ref().unwrap();
        assert!(form.error.is_some());
    }

    #[test]
    fn submit_produces_a_create_command_for_a_valid_form() {
        let mut app = loaded_app();
        app.open_create_form();
        {
            let form = app.form.as_mut().unwrap();
            form.task_code = "VID-200".to_string();
            form.name = "Teaser edit".to_string();
            while form.current_field() != FormField::Submit {
                form.next_field();
            }
        }

        let cmd = app.handle_key(key(KeyCode::Enter));
        match cmd {
            Some(StoreCommand::CreateTask(draft)) => {
                assert_eq!(draft.task_code, "VID-200");
                assert_eq!(draft.project_id, 1);
                assert_eq!(draft.phase_id, app.phases[0].id);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn loading_an_empty_dataset_keeps_the_cursor_in_bounds() {
        let mut app = loaded_app();
        app.selected = 5;
        app.handle_store_message(StoreMessage::Refreshed(Dataset::default()));
        assert_eq!(app.selected, 0);
        assert!(app.selected_task().is_none());
    }
}
