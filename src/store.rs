//! Persistence strategies behind one interface.
//!
//! The backing store is chosen once at startup, in strict order: a local
//! snapshot file, then the remote API, then the built-in demo dataset.
//! The choice is a tagged union held for the whole session; mutation code
//! matches on the variant instead of branching on ad hoc flags, and the
//! mode is never switched mid-session.
//!
//! Remote mode treats the server as authoritative: after every successful
//! mutation the entire dataset is re-fetched rather than patched locally.
//! Local and demo mode apply mutations to an in-memory snapshot, re-derive
//! the denormalized display fields from the reference tables, and persist
//! the snapshot to disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::demo;
use crate::models::{Dataset, Task, TaskDraft};

/// Fixed snapshot filename, the local-storage analog.
pub const SNAPSHOT_FILE: &str = "slate_snapshot.json";

/// Which backing store serves this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Remote,
    Local,
    Demo,
}

impl std::fmt::Display for StoreMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreMode::Remote => write!(f, "Remote"),
            StoreMode::Local => write!(f, "Local"),
            StoreMode::Demo => write!(f, "Demo"),
        }
    }
}

/// The serialized bundle written to the snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub data: Dataset,
    #[serde(default)]
    pub selected_project: Option<i64>,
}

/// All collections plus the snapshot-level selection, as loaded at startup.
#[derive(Debug)]
pub struct Opened {
    pub store: Store,
    pub data: Dataset,
    pub selected_project: Option<i64>,
}

// ============================================
// Local-write store
// ============================================

/// Snapshot-backed store used by the Local and Demo tiers. Mutations only
/// ever touch the in-memory bundle and the snapshot file.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    snapshot: Snapshot,
}

impl LocalStore {
    /// Load a previously persisted snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            snapshot,
        })
    }

    /// Seed a fresh store from the built-in demo dataset.
    pub fn demo(path: PathBuf) -> Self {
        Self {
            path,
            snapshot: demo::snapshot(),
        }
    }

    fn save(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.snapshot)
            .context("Failed to serialize snapshot")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write snapshot {}", self.path.display()))
    }

    pub fn dataset(&self) -> Dataset {
        self.snapshot.data.clone()
    }

    pub fn selected_project(&self) -> Option<i64> {
        self.snapshot.selected_project
    }

    /// Fresh id for a locally created task: the current timestamp, bumped
    /// past any id already in the list.
    fn allocate_id(&self) -> i64 {
        let mut id = chrono::Utc::now().timestamp_millis();
        while self.snapshot.data.tasks.iter().any(|t| t.id == id) {
            id += 1;
        }
        id
    }

    pub fn create_task(&mut self, draft: TaskDraft) -> Result<Task> {
        let mut task = draft.into_task(self.allocate_id());
        task.refresh_denormalized(&self.snapshot.data.phases, &self.snapshot.data.team_members);
        self.snapshot.data.tasks.push(task.clone());
        self.save()?;
        Ok(task)
    }

    /// Replace the matching task in place, keeping its id and position.
    pub fn update_task(&mut self, id: i64, draft: TaskDraft) -> Result<Task> {
        let position = self
            .snapshot
            .data
            .tasks
            .iter()
            .position(|t| t.id == id)
            .with_context(|| format!("No task with id {id}"))?;

        let mut task = draft.into_task(id);
        task.refresh_denormalized(&self.snapshot.data.phases, &self.snapshot.data.team_members);
        self.snapshot.data.tasks[position] = task.clone();
        self.save()?;
        Ok(task)
    }

    pub fn delete_task(&mut self, id: i64) -> Result<()> {
        let before = self.snapshot.data.tasks.len();
        self.snapshot.data.tasks.retain(|t| t.id != id);
        if self.snapshot.data.tasks.len() == before {
            anyhow::bail!("No task with id {id}");
        }
        self.save()
    }

    /// Remember the project filter across sessions. Best effort: a failed
    /// write here is not worth interrupting the user for.
    pub fn set_selected_project(&mut self, project_id: Option<i64>) {
        self.snapshot.selected_project = project_id;
        self.save().ok();
    }
}

// ============================================
// The tagged union
// ============================================

#[derive(Debug)]
pub enum Store {
    /// Mutations go to the API; the dataset is re-fetched after each one.
    Remote(ApiClient),
    /// Mutations are applied to the persisted snapshot only.
    Local(LocalStore),
    /// Local-write semantics over the built-in dataset.
    Demo(LocalStore),
}

impl Store {
    /// Pick the backing store. Strict order, first success wins: snapshot
    /// file, remote API (all four collections or nothing), demo data. When
    /// the snapshot tier wins the remote API is never contacted.
    pub async fn open(base_url: &str, snapshot_path: PathBuf) -> Opened {
        if let Ok(local) = LocalStore::load(&snapshot_path) {
            return Opened {
                data: local.dataset(),
                selected_project: local.selected_project(),
                store: Store::Local(local),
            };
        }

        if let Ok(client) = ApiClient::new(base_url) {
            if let Ok(data) = client.fetch_dataset().await {
                return Opened {
                    store: Store::Remote(client),
                    data,
                    selected_project: None,
                };
            }
        }

        let local = LocalStore::demo(snapshot_path);
        Opened {
            data: local.dataset(),
            selected_project: local.selected_project(),
            store: Store::Demo(local),
        }
    }

    pub fn mode(&self) -> StoreMode {
        match self {
            Store::Remote(_) => StoreMode::Remote,
            Store::Local(_) => StoreMode::Local,
            Store::Demo(_) => StoreMode::Demo,
        }
    }

    /// Re-read the full dataset from the backing store.
    pub async fn refresh(&self) -> Result<Dataset> {
        match self {
            Store::Remote(api) => api.fetch_dataset().await,
            Store::Local(local) | Store::Demo(local) => Ok(local.dataset()),
        }
    }

    /// Create a task and return it together with the post-mutation dataset.
    /// A remote failure leaves every collection untouched.
    pub async fn create_task(&mut self, draft: TaskDraft) -> Result<(Task, Dataset)> {
        match self {
            Store::Remote(api) => {
                let task = api.create_task(&draft).await?;
                let data = api
                    .fetch_dataset()
                    .await
                    .context("Task created but refresh failed")?;
                Ok((task, data))
            }
            Store::Local(local) | Store::Demo(local) => {
                let task = local.create_task(draft)?;
                Ok((task, local.dataset()))
            }
        }
    }

    pub async fn update_task(&mut self, id: i64, draft: TaskDraft) -> Result<(Task, Dataset)> {
        match self {
            Store::Remote(api) => {
                let task = api.update_task(id, &draft).await?;
                let data = api
                    .fetch_dataset()
                    .await
                    .context("Task updated but refresh failed")?;
                Ok((task, data))
            }
            Store::Local(local) | Store::Demo(local) => {
                let task = local.update_task(id, draft)?;
                Ok((task, local.dataset()))
            }
        }
    }

    pub async fn delete_task(&mut self, id: i64) -> Result<Dataset> {
        match self {
            Store::Remote(api) => {
                api.delete_task(id).await?;
                api.fetch_dataset()
                    .await
                    .context("Task deleted but refresh failed")
            }
            Store::Local(local) | Store::Demo(local) => {
                local.delete_task(id)?;
                Ok(local.dataset())
            }
        }
    }

    /// Persist the project filter where the backing store supports it.
    pub fn select_project(&mut self, project_id: Option<i64>) {
        match self {
            Store::Remote(_) => {}
            Store::Local(local) | Store::Demo(local) => {
                local.set_selected_project(project_id);
            }
        }
    }
}

// ============================================
// Worker protocol
// ============================================

/// Commands sent from the UI to the store worker.
#[derive(Debug, Clone)]
pub enum StoreCommand {
    /// Re-read the full dataset.
    Refresh,
    CreateTask(TaskDraft),
    UpdateTask(i64, TaskDraft),
    DeleteTask(i64),
    /// Remember the project filter (persisted in local modes).
    SelectProject(Option<i64>),
    Shutdown,
}

/// Messages sent from the store worker back to the UI.
#[derive(Debug, Clone)]
pub enum StoreMessage {
    /// Startup finished; carries the chosen mode and the initial dataset.
    Loaded {
        mode: StoreMode,
        data: Dataset,
        selected_project: Option<i64>,
    },
    /// A fresh copy of every collection.
    Refreshed(Dataset),
    TaskCreated(Task),
    TaskUpdated(Task),
    TaskDeleted(i64),
    /// A failed operation; nothing changed.
    Error(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use chrono::NaiveDate;

    fn temp_snapshot_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("slate_snapshot_{}_{}.json", tag, std::process::id()))
    }

    fn demo_store(tag: &str) -> LocalStore {
        LocalStore::demo(temp_snapshot_path(tag))
    }

    fn draft(code: &str, phase_id: i64, owner_id: i64) -> TaskDraft {
        let day = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        TaskDraft {
            task_code: code.to_string(),
            name: format!("{code} work"),
            phase_id,
            status: Status::Open,
            owner_id,
            start_date: day,
            end_date: day + chrono::Duration::days(4),
            duration: 5,
            project_id: 1,
        }
    }

    fn cleanup(path: &Path) {
        fs::remove_file(path).ok();
    }

    #[test]
    fn local_create_appends_with_fresh_id_and_denormalized_fields() {
        let mut store = demo_store("create");
        let before = store.dataset().tasks;

        let task = store.create_task(draft("VID-100", 2, 3)).unwrap();
        let after = store.dataset().tasks;

        assert_eq!(after.len(), before.len() + 1);
        assert!(before.iter().all(|t| t.id != task.id));
        assert_eq!(after.last().unwrap().id, task.id);

        // Denormalized caches come from the current reference tables.
        assert_eq!(task.phase_name, "Production");
        assert_eq!(task.owner_name, "Lena Fischer");
        assert_eq!(task.avatar_color, "#fbbc04");

        cleanup(&store.path);
    }

    #[test]
    fn local_create_never_reuses_an_id() {
        let mut store = demo_store("create_ids");
        let a = store.create_task(draft("VID-101", 1, 1)).unwrap();
        let b = store.create_task(draft("VID-102", 1, 1)).unwrap();
        let c = store.create_task(draft("VID-103", 1, 1)).unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_ne!(a.id, c.id);

        cleanup(&store.path);
    }

    #[test]
    fn local_update_replaces_in_place() {
        let mut store = demo_store("update");
        let before = store.dataset().tasks;
        let target = before[2].clone();

        let mut changed = draft("VID-003", 3, 4);
        changed.name = "Location scout extended".to_string();
        let updated = store.update_task(target.id, changed).unwrap();
        let after = store.dataset().tasks;

        assert_eq!(after.len(), before.len());
        let order_before: Vec<i64> = before.iter().map(|t| t.id).collect();
        let order_after: Vec<i64> = after.iter().map(|t| t.id).collect();
        assert_eq!(order_before, order_after);

        assert_eq!(after[2].id, target.id);
        assert_eq!(after[2].name, "Location scout extended");
        // Moving the task to another phase/owner refreshed the caches.
        assert_eq!(after[2].phase_name, "Post-Production");
        assert_eq!(after[2].owner_name, "Tomas Silva");
        assert_eq!(updated, after[2]);

        // Every other task is untouched.
        for (b, a) in before.iter().zip(after.iter()) {
            if b.id != target.id {
                assert_eq!(b, a);
            }
        }

        cleanup(&store.path);
    }

    #[test]
    fn local_delete_filters_by_id() {
        let mut store = demo_store("delete");
        let before = store.dataset().tasks;
        let victim = before[0].id;

        store.delete_task(victim).unwrap();
        let after = store.dataset().tasks;

        assert_eq!(after.len(), before.len() - 1);
        assert!(after.iter().all(|t| t.id != victim));

        assert!(store.delete_task(victim).is_err());

        cleanup(&store.path);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let snap = demo::snapshot();
        let raw = serde_json::to_string_pretty(&snap).unwrap();
        assert!(raw.contains("\"team_members\""));
        assert!(raw.contains("\"selected_project\""));

        let back: Snapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.data, snap.data);
        assert_eq!(back.selected_project, snap.selected_project);
    }

    #[tokio::test]
    async fn snapshot_tier_wins_without_touching_the_network() {
        let path = temp_snapshot_path("tier1");
        let mut seeded = LocalStore::demo(path.clone());
        seeded.set_selected_project(Some(1));

        // An unroutable base URL: any contact would fail loudly, but the
        // snapshot tier must win before the client is even built.
        let opened = Store::open("http://127.0.0.1:9", path.clone()).await;
        assert_eq!(opened.store.mode(), StoreMode::Local);
        assert_eq!(opened.data, seeded.dataset());
        assert_eq!(opened.selected_project, Some(1));

        cleanup(&path);
    }

    #[tokio::test]
    async fn missing_snapshot_and_dead_api_fall_back_to_demo() {
        let path = temp_snapshot_path("tier3");
        cleanup(&path);

        let opened = Store::open("http://127.0.0.1:9", path.clone()).await;
        assert_eq!(opened.store.mode(), StoreMode::Demo);
        assert_eq!(opened.data, demo::snapshot().data);

        cleanup(&path);
    }
}
