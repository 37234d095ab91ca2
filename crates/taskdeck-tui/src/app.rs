use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::warn;

use taskdeck_api::{Task, TaskPriority, TaskStatus};
use taskdeck_client::{ApiError, ApiResult, AuthClient, SessionStore, TaskApiClient, TaskList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Signup,
    Tasks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Remote operations, named so failures can say what was being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Login,
    Signup,
    LoadTasks,
    CreateTask,
    DeleteTask,
    UpdateStatus,
    UpdatePriority,
}

impl Op {
    fn failure_message(self, detail: &str) -> String {
        match self {
            Op::Login => format!("Login failed: {}", detail),
            Op::Signup => format!("Signup failed: {}", detail),
            Op::LoadTasks => format!("Failed to load tasks: {}", detail),
            Op::CreateTask => format!("Failed to create task: {}", detail),
            Op::DeleteTask => format!("Failed to delete task: {}", detail),
            Op::UpdateStatus => format!("Failed to update status: {}", detail),
            Op::UpdatePriority => format!("Failed to update priority: {}", detail),
        }
    }
}

/// One completed remote operation. Every spawned request sends exactly one
/// of these back to the main loop; all state changes happen in
/// [`App::apply`].
#[derive(Debug, Clone)]
pub enum AppEvent {
    LoggedIn { token: String },
    TasksLoaded(Vec<Task>),
    TaskCreated(Task),
    TaskDeleted { id: String },
    TaskUpdated(Task),
    RequestFailed {
        op: Op,
        id: Option<String>,
        message: String,
    },
}

pub struct App {
    pub screen: Screen,
    pub session: SessionStore,
    pub list: TaskList,
    pub input: String,
    pub input_mode: InputMode,
    pub selected: usize,
    pub auth_username_input: String,
    pub auth_password_input: String,
    pub auth_field_focus: AuthField,
    pub auth_in_flight: bool,
    pub create_in_flight: bool,
    pub busy: HashSet<String>,
    pub error_message: Option<String>,
    pub show_help: bool,
}

impl App {
    /// Build the initial state. A restored credential skips the login
    /// screen; the main loop triggers the initial task fetch.
    pub fn new(session: SessionStore) -> Self {
        let screen = if session.token().is_some() {
            Screen::Tasks
        } else {
            Screen::Login
        };

        Self {
            screen,
            session,
            list: TaskList::new(),
            input: String::new(),
            input_mode: InputMode::Normal,
            selected: 0,
            auth_username_input: String::new(),
            auth_password_input: String::new(),
            auth_field_focus: AuthField::Username,
            auth_in_flight: false,
            create_in_flight: false,
            busy: HashSet::new(),
            error_message: None,
            show_help: false,
        }
    }

    /// Apply one completed operation. This is the only place async results
    /// touch state; a failure clears its in-flight guard and leaves the
    /// task collection exactly as it was.
    ///
    /// Task results landing off the Tasks screen are from a session that
    /// already ended (logout does not cancel in-flight requests) and are
    /// dropped.
    pub fn apply(&mut self, event: AppEvent) {
        let stale = self.screen != Screen::Tasks
            && match &event {
                AppEvent::LoggedIn { .. } => false,
                AppEvent::RequestFailed { op, .. } => !matches!(op, Op::Login | Op::Signup),
                _ => true,
            };
        if stale {
            return;
        }

        match event {
            AppEvent::LoggedIn { token } => {
                self.auth_in_flight = false;
                self.screen = Screen::Tasks;
                self.error_message = None;
                self.auth_username_input.clear();
                self.auth_password_input.clear();
                self.auth_field_focus = AuthField::Username;

                if let Err(e) = self.session.set_token(token) {
                    // Still logged in for this run; only persistence failed.
                    self.error_message = Some(format!("Failed to save session: {}", e));
                }
            }
            AppEvent::TasksLoaded(tasks) => {
                self.list.replace_all(tasks);
                self.clamp_selection();
            }
            AppEvent::TaskCreated(task) => {
                self.create_in_flight = false;
                self.list.push(task);
            }
            AppEvent::TaskDeleted { id } => {
                self.busy.remove(&id);
                self.list.remove(&id);
                self.clamp_selection();
            }
            AppEvent::TaskUpdated(task) => {
                self.busy.remove(&task.id);
                self.list.replace(task);
                // The update can move the row out of the active filter.
                self.clamp_selection();
            }
            AppEvent::RequestFailed { op, id, message } => {
                match op {
                    Op::Login | Op::Signup => self.auth_in_flight = false,
                    Op::CreateTask => self.create_in_flight = false,
                    _ => {}
                }
                if let Some(id) = id {
                    self.busy.remove(&id);
                }
                self.error_message = Some(op.failure_message(&message));
            }
        }
    }

    /// Clear the credential and everything derived from it, returning to
    /// the login screen.
    pub fn logout(&mut self) -> Result<()> {
        self.session.clear()?;
        self.list.clear();
        self.busy.clear();
        self.create_in_flight = false;
        self.auth_in_flight = false;
        self.screen = Screen::Login;
        self.auth_field_focus = AuthField::Username;
        self.input.clear();
        self.input_mode = InputMode::Normal;
        self.selected = 0;
        self.show_help = false;
        Ok(())
    }

    /// Claim the selected row for a mutation. Returns the task to operate
    /// on, or None when nothing is selected or that row already has a
    /// request pending.
    pub fn begin_selected_op(&mut self) -> Option<Task> {
        let task = self.list.filtered().get(self.selected).copied().cloned()?;
        if self.busy.contains(&task.id) {
            return None;
        }
        self.busy.insert(task.id.clone());
        Some(task)
    }

    pub fn select_next(&mut self) {
        let len = self.list.filtered().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cycle_status_filter(&mut self) {
        self.list.set_filter_status(self.list.filter_status().cycled());
        self.clamp_selection();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.list
            .set_filter_priority(self.list.filter_priority().cycled());
        self.clamp_selection();
    }

    /// Keep the selection inside the filtered view after it shrinks.
    fn clamp_selection(&mut self) {
        let len = self.list.filtered().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Build the failure event for a remote operation. Auth-rejection on a
/// task call gets a logout hint appended since the stored session is the
/// likely culprit.
fn failure(op: Op, id: Option<String>, error: ApiError) -> AppEvent {
    warn!("Request failed ({:?}): {}", op, error);

    let message = if error.is_auth() && !matches!(op, Op::Login | Op::Signup) {
        format!("{} (session may be expired; press L to log out)", error)
    } else {
        error.to_string()
    };

    AppEvent::RequestFailed { op, id, message }
}

/// Spawns remote operations. Each method fires one request on a
/// background task and reports back with a single [`AppEvent`]; nothing
/// here blocks the render loop.
pub struct Remote {
    auth: AuthClient,
    tasks: TaskApiClient,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Remote {
    pub fn new(server_url: &str, event_tx: mpsc::UnboundedSender<AppEvent>) -> ApiResult<Self> {
        let tasks = TaskApiClient::builder(server_url)
            .with_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            auth: AuthClient::new(server_url),
            tasks,
            event_tx,
        })
    }

    /// Point the task client at the current credential. Must be called
    /// before spawning task operations after login or logout.
    pub fn set_bearer_token(&mut self, token: Option<&str>) {
        self.tasks.set_bearer_token(token);
    }

    pub fn login(&self, username: String, password: String) {
        let auth = self.auth.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match auth.login(&username, &password).await {
                Ok(response) => AppEvent::LoggedIn {
                    token: response.token,
                },
                Err(e) => failure(Op::Login, None, e),
            };
            let _ = tx.send(event);
        });
    }

    /// Register, then log in with the same credentials unless registration
    /// already returned a token.
    pub fn signup(&self, username: String, password: String) {
        let auth = self.auth.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match auth.signup(&username, &password).await {
                Ok(response) => match response.token {
                    Some(token) => AppEvent::LoggedIn { token },
                    None => match auth.login(&username, &password).await {
                        Ok(response) => AppEvent::LoggedIn {
                            token: response.token,
                        },
                        Err(e) => failure(Op::Signup, None, e),
                    },
                },
                Err(e) => failure(Op::Signup, None, e),
            };
            let _ = tx.send(event);
        });
    }

    pub fn load_tasks(&self) {
        let client = self.tasks.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match client.list_tasks().await {
                Ok(tasks) => AppEvent::TasksLoaded(tasks),
                Err(e) => failure(Op::LoadTasks, None, e),
            };
            let _ = tx.send(event);
        });
    }

    pub fn create_task(&self, text: String) {
        let client = self.tasks.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match client.create_task(text).await {
                Ok(task) => AppEvent::TaskCreated(task),
                Err(e) => failure(Op::CreateTask, None, e),
            };
            let _ = tx.send(event);
        });
    }

    pub fn delete_task(&self, id: String) {
        let client = self.tasks.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match client.delete_task(&id).await {
                Ok(()) => AppEvent::TaskDeleted { id },
                Err(e) => failure(Op::DeleteTask, Some(id), e),
            };
            let _ = tx.send(event);
        });
    }

    pub fn update_status(&self, id: String, current: TaskStatus) {
        let client = self.tasks.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match client.update_status(&id, current).await {
                Ok(task) => AppEvent::TaskUpdated(task),
                Err(e) => failure(Op::UpdateStatus, Some(id), e),
            };
            let _ = tx.send(event);
        });
    }

    pub fn update_priority(&self, id: String, priority: TaskPriority) {
        let client = self.tasks.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match client.update_priority(&id, priority).await {
                Ok(task) => AppEvent::TaskUpdated(task),
                Err(e) => failure(Op::UpdatePriority, Some(id), e),
            };
            let _ = tx.send(event);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_client::StatusFilter;

    fn test_app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionStore::open(dir.path()).unwrap();
        (App::new(session), dir)
    }

    fn logged_in_app() -> (App, tempfile::TempDir) {
        let (mut app, dir) = test_app();
        app.apply(AppEvent::LoggedIn {
            token: "tok-test".to_string(),
        });
        (app, dir)
    }

    fn task(id: &str, status: TaskStatus, priority: TaskPriority) -> Task {
        Task {
            id: id.to_string(),
            text: format!("task {}", id),
            status,
            priority,
        }
    }

    #[test]
    fn starts_on_login_without_credential() {
        let (app, _dir) = test_app();
        assert_eq!(app.screen, Screen::Login);
    }

    #[test]
    fn restored_session_starts_on_tasks_screen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::open(dir.path()).unwrap();
        store.set_token("tok-1").unwrap();
        drop(store);

        let session = SessionStore::open(dir.path()).unwrap();
        let app = App::new(session);
        assert_eq!(app.screen, Screen::Tasks);
    }

    #[test]
    fn logged_in_persists_token_and_routes_home() {
        let (mut app, dir) = test_app();
        app.auth_in_flight = true;
        app.auth_password_input = "secret".to_string();

        app.apply(AppEvent::LoggedIn {
            token: "tok-1".to_string(),
        });

        assert_eq!(app.screen, Screen::Tasks);
        assert!(!app.auth_in_flight);
        assert!(app.auth_password_input.is_empty());
        assert_eq!(app.session.token(), Some("tok-1"));

        // Survives a reopen of the store.
        let reopened = SessionStore::open(dir.path()).unwrap();
        assert_eq!(reopened.token(), Some("tok-1"));
    }

    #[test]
    fn tasks_loaded_replaces_collection() {
        let (mut app, _dir) = logged_in_app();
        app.apply(AppEvent::TasksLoaded(vec![
            task("1", TaskStatus::Pending, TaskPriority::Low),
            task("2", TaskStatus::Complete, TaskPriority::High),
        ]));
        assert_eq!(app.list.len(), 2);

        app.apply(AppEvent::TasksLoaded(vec![task(
            "3",
            TaskStatus::Pending,
            TaskPriority::Medium,
        )]));
        assert_eq!(app.list.len(), 1);
        assert_eq!(app.list.tasks()[0].id, "3");
    }

    #[test]
    fn task_created_appends_and_clears_guard() {
        let (mut app, _dir) = logged_in_app();
        app.create_in_flight = true;

        app.apply(AppEvent::TaskCreated(task(
            "1",
            TaskStatus::Pending,
            TaskPriority::Medium,
        )));

        assert!(!app.create_in_flight);
        assert_eq!(app.list.len(), 1);
        assert_eq!(app.list.tasks()[0].status, TaskStatus::Pending);
        assert_eq!(app.list.tasks()[0].priority, TaskPriority::Medium);
    }

    #[test]
    fn task_updated_replaces_only_that_record() {
        let (mut app, _dir) = logged_in_app();
        app.apply(AppEvent::TasksLoaded(vec![
            task("1", TaskStatus::Pending, TaskPriority::Low),
            task("2", TaskStatus::Pending, TaskPriority::Medium),
        ]));
        app.busy.insert("2".to_string());

        app.apply(AppEvent::TaskUpdated(task(
            "2",
            TaskStatus::Pending,
            TaskPriority::High,
        )));

        assert!(app.busy.is_empty());
        assert_eq!(app.list.tasks()[0].priority, TaskPriority::Low);
        assert_eq!(app.list.tasks()[1].priority, TaskPriority::High);
        assert_eq!(app.list.tasks()[1].status, TaskStatus::Pending);
    }

    #[test]
    fn update_that_leaves_the_filter_clamps_selection() {
        let (mut app, _dir) = logged_in_app();
        app.apply(AppEvent::TasksLoaded(vec![
            task("1", TaskStatus::Pending, TaskPriority::Low),
            task("2", TaskStatus::Pending, TaskPriority::Low),
            task("3", TaskStatus::Pending, TaskPriority::Low),
        ]));
        app.cycle_status_filter();
        app.selected = 2;

        let claimed = app.begin_selected_op().unwrap();
        assert_eq!(claimed.id, "3");
        app.apply(AppEvent::TaskUpdated(task(
            "3",
            TaskStatus::Complete,
            TaskPriority::Low,
        )));

        // The toggled row left the pending view.
        assert_eq!(app.list.filtered().len(), 2);
        assert_eq!(app.selected, 1);
        assert_eq!(app.begin_selected_op().map(|t| t.id), Some("2".to_string()));
    }

    #[test]
    fn task_deleted_removes_and_clamps_selection() {
        let (mut app, _dir) = logged_in_app();
        app.apply(AppEvent::TasksLoaded(vec![
            task("1", TaskStatus::Pending, TaskPriority::Low),
            task("2", TaskStatus::Pending, TaskPriority::Low),
        ]));
        app.selected = 1;
        app.busy.insert("2".to_string());

        app.apply(AppEvent::TaskDeleted {
            id: "2".to_string(),
        });

        assert_eq!(app.list.len(), 1);
        assert!(app.busy.is_empty());
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn deleting_unknown_id_leaves_collection_alone() {
        let (mut app, _dir) = logged_in_app();
        app.apply(AppEvent::TasksLoaded(vec![task(
            "1",
            TaskStatus::Pending,
            TaskPriority::Low,
        )]));

        app.apply(AppEvent::TaskDeleted {
            id: "99".to_string(),
        });
        assert_eq!(app.list.len(), 1);
    }

    #[test]
    fn request_failed_sets_message_and_clears_guards() {
        let (mut app, _dir) = logged_in_app();
        app.apply(AppEvent::TasksLoaded(vec![task(
            "1",
            TaskStatus::Pending,
            TaskPriority::Low,
        )]));
        app.create_in_flight = true;
        app.busy.insert("1".to_string());

        app.apply(AppEvent::RequestFailed {
            op: Op::CreateTask,
            id: None,
            message: "server returned 500: boom".to_string(),
        });
        assert!(!app.create_in_flight);
        assert_eq!(
            app.error_message.as_deref(),
            Some("Failed to create task: server returned 500: boom")
        );

        app.apply(AppEvent::RequestFailed {
            op: Op::UpdateStatus,
            id: Some("1".to_string()),
            message: "request failed: timeout".to_string(),
        });
        assert!(app.busy.is_empty());

        // The collection itself is untouched by failures.
        assert_eq!(app.list.len(), 1);
        assert_eq!(app.list.tasks()[0].status, TaskStatus::Pending);
    }

    #[test]
    fn logout_clears_session_and_tasks() {
        let (mut app, dir) = logged_in_app();
        app.apply(AppEvent::TasksLoaded(vec![task(
            "1",
            TaskStatus::Pending,
            TaskPriority::Low,
        )]));

        app.logout().unwrap();

        assert_eq!(app.screen, Screen::Login);
        assert!(app.list.is_empty());
        assert!(app.session.token().is_none());

        let reopened = SessionStore::open(dir.path()).unwrap();
        assert!(reopened.token().is_none());
    }

    #[test]
    fn task_results_after_logout_are_dropped() {
        let (mut app, _dir) = logged_in_app();
        app.logout().unwrap();

        // A fetch and a create still in flight when the user logged out.
        app.apply(AppEvent::TasksLoaded(vec![task(
            "1",
            TaskStatus::Pending,
            TaskPriority::Low,
        )]));
        app.apply(AppEvent::TaskCreated(task(
            "2",
            TaskStatus::Pending,
            TaskPriority::Low,
        )));
        app.apply(AppEvent::RequestFailed {
            op: Op::LoadTasks,
            id: None,
            message: "request failed: timeout".to_string(),
        });

        assert_eq!(app.screen, Screen::Login);
        assert!(app.list.is_empty());
        assert!(app.error_message.is_none());

        // Auth failures still surface on the login screen.
        app.apply(AppEvent::RequestFailed {
            op: Op::Login,
            id: None,
            message: "bad credentials".to_string(),
        });
        assert_eq!(
            app.error_message.as_deref(),
            Some("Login failed: bad credentials")
        );
    }

    #[test]
    fn begin_selected_op_blocks_busy_rows() {
        let (mut app, _dir) = logged_in_app();
        app.apply(AppEvent::TasksLoaded(vec![task(
            "1",
            TaskStatus::Pending,
            TaskPriority::Low,
        )]));

        let first = app.begin_selected_op();
        assert_eq!(first.map(|t| t.id), Some("1".to_string()));

        // Same row again while the first request is pending.
        assert!(app.begin_selected_op().is_none());

        app.apply(AppEvent::TaskUpdated(task(
            "1",
            TaskStatus::Complete,
            TaskPriority::Low,
        )));
        assert!(app.begin_selected_op().is_some());
    }

    #[test]
    fn begin_selected_op_with_empty_list_is_none() {
        let (mut app, _dir) = test_app();
        assert!(app.begin_selected_op().is_none());
    }

    #[test]
    fn filter_cycle_clamps_selection() {
        let (mut app, _dir) = logged_in_app();
        app.apply(AppEvent::TasksLoaded(vec![
            task("1", TaskStatus::Pending, TaskPriority::Low),
            task("2", TaskStatus::Complete, TaskPriority::Low),
            task("3", TaskStatus::Complete, TaskPriority::Low),
        ]));
        app.selected = 2;

        // all -> pending leaves a single visible row.
        app.cycle_status_filter();
        assert_eq!(app.list.filter_status(), StatusFilter::Pending);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn selection_moves_within_filtered_bounds() {
        let (mut app, _dir) = logged_in_app();
        app.apply(AppEvent::TasksLoaded(vec![
            task("1", TaskStatus::Pending, TaskPriority::Low),
            task("2", TaskStatus::Pending, TaskPriority::Low),
        ]));

        app.select_next();
        assert_eq!(app.selected, 1);
        app.select_next();
        assert_eq!(app.selected, 1);
        app.select_previous();
        assert_eq!(app.selected, 0);
        app.select_previous();
        assert_eq!(app.selected, 0);
    }
}
