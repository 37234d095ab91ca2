//! Local task collection and filter state

use taskdeck_api::{Task, TaskPriority, TaskStatus};

/// Status filter selector. `All` matches every task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Complete,
}

impl StatusFilter {
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == TaskStatus::Pending,
            Self::Complete => status == TaskStatus::Complete,
        }
    }

    /// Next selector in the all → pending → complete → all cycle.
    pub fn cycled(self) -> Self {
        match self {
            Self::All => Self::Pending,
            Self::Pending => Self::Complete,
            Self::Complete => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Complete => "complete",
        }
    }
}

/// Priority filter selector. `All` matches every task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    pub fn matches(self, priority: TaskPriority) -> bool {
        match self {
            Self::All => true,
            Self::Low => priority == TaskPriority::Low,
            Self::Medium => priority == TaskPriority::Medium,
            Self::High => priority == TaskPriority::High,
        }
    }

    /// Next selector in the all → low → medium → high → all cycle.
    pub fn cycled(self) -> Self {
        match self {
            Self::All => Self::Low,
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Ordered task collection plus the two filter selectors. Mutations go
/// through the methods below; the filtered view is recomputed on demand
/// and never cached.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    filter_status: StatusFilter,
    filter_priority: PriorityFilter,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn filter_status(&self) -> StatusFilter {
        self.filter_status
    }

    pub fn filter_priority(&self) -> PriorityFilter {
        self.filter_priority
    }

    pub fn set_filter_status(&mut self, filter: StatusFilter) {
        self.filter_status = filter;
    }

    pub fn set_filter_priority(&mut self, filter: PriorityFilter) {
        self.filter_priority = filter;
    }

    /// Replace the whole collection with a fresh fetch.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Append a newly created task.
    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Replace the record with the same id. Unknown ids are a no-op.
    pub fn replace(&mut self, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }

    /// Remove the record with the given id. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) {
        self.tasks.retain(|t| t.id != id);
    }

    /// Drop every task. Filters keep their current values.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Tasks passing both filters, in collection order.
    pub fn filtered(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| {
                self.filter_status.matches(t.status) && self.filter_priority.matches(t.priority)
            })
            .collect()
    }
}
