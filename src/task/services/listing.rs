//! Named listing strategies and the dispatcher that selects between them.

use crate::task::{
    domain::{PageRequest, Task, TaskStatus},
    ports::{TaskRepository, TaskRepositoryResult},
};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::{BuildHasher, RandomState};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Strategy used when the caller names none, or names one that is unknown.
pub const DEFAULT_STRATEGY: &str = "dueDate";

/// Name of the due-date ordering.
pub const DUE_DATE_STRATEGY: &str = "dueDate";

/// Name of the status ordering.
pub const STATUS_STRATEGY: &str = "status";

/// Rank given to a status with no entry in the rank table.
const UNRANKED: u8 = 99;

const STATUS_RANKS: [(TaskStatus, u8); 3] = [
    (TaskStatus::Open, 0),
    (TaskStatus::InProgress, 1),
    (TaskStatus::Done, 2),
];

/// Shared handle to a listing strategy.
pub type SharedListingStrategy = Arc<dyn TaskListingStrategy>;

/// Strategy table keyed by the name callers select with.
pub type StrategyMap = HashMap<String, SharedListingStrategy, RandomState>;

/// A named ordering applied to one fetched page of tasks.
#[async_trait]
pub trait TaskListingStrategy: Send + Sync {
    /// Returns the name callers use to select this strategy.
    fn name(&self) -> &'static str;

    /// Fetches the page and returns it in this strategy's order.
    async fn list(&self, page: PageRequest) -> TaskRepositoryResult<Vec<Task>>;
}

/// Sorts tasks by ascending due time, tasks without one last.
///
/// Equal instants compare by local wall-clock time; remaining ties keep
/// their fetch order.
pub fn order_by_due_date(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| match (left.due_at(), right.due_at()) {
        (Some(left_due), Some(right_due)) => left_due
            .cmp(&right_due)
            .then_with(|| left_due.naive_local().cmp(&right_due.naive_local())),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Returns the listing rank of `status`: `OPEN` < `IN_PROGRESS` < `DONE`.
#[must_use]
pub fn status_rank(status: TaskStatus) -> u8 {
    STATUS_RANKS
        .iter()
        .find(|(ranked, _)| *ranked == status)
        .map_or(UNRANKED, |(_, rank)| *rank)
}

/// Sorts tasks by status rank, keeping fetch order within a rank.
pub fn order_by_status(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| status_rank(task.status()));
}

/// Lists a page ordered by due time.
pub struct DueDateListingStrategy<R>
where
    R: TaskRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> DueDateListingStrategy<R>
where
    R: TaskRepository + ?Sized,
{
    /// Creates the strategy over `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> TaskListingStrategy for DueDateListingStrategy<R>
where
    R: TaskRepository + ?Sized,
{
    fn name(&self) -> &'static str {
        DUE_DATE_STRATEGY
    }

    async fn list(&self, page: PageRequest) -> TaskRepositoryResult<Vec<Task>> {
        let mut tasks = self.repository.find_page(page).await?;
        order_by_due_date(&mut tasks);
        Ok(tasks)
    }
}

/// Lists a page ordered by lifecycle status.
pub struct StatusListingStrategy<R>
where
    R: TaskRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> StatusListingStrategy<R>
where
    R: TaskRepository + ?Sized,
{
    /// Creates the strategy over `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> TaskListingStrategy for StatusListingStrategy<R>
where
    R: TaskRepository + ?Sized,
{
    fn name(&self) -> &'static str {
        STATUS_STRATEGY
    }

    async fn list(&self, page: PageRequest) -> TaskRepositoryResult<Vec<Task>> {
        let mut tasks = self.repository.find_page(page).await?;
        order_by_status(&mut tasks);
        Ok(tasks)
    }
}

/// Builds the name-to-strategy map containing every built-in strategy.
#[must_use]
pub fn builtin_strategies<R>(repository: &Arc<R>) -> StrategyMap
where
    R: TaskRepository + ?Sized + 'static,
{
    let strategies: [SharedListingStrategy; 2] = [
        Arc::new(DueDateListingStrategy::new(Arc::clone(repository))),
        Arc::new(StatusListingStrategy::new(Arc::clone(repository))),
    ];
    strategies
        .into_iter()
        .map(|strategy| (strategy.name().to_owned(), strategy))
        .collect()
}

/// Error returned when a strategy map lacks the default entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("missing task listing strategy: {0}")]
pub struct MissingDefaultStrategy(pub &'static str);

/// Selects a listing strategy by name.
#[derive(Clone)]
pub struct TaskListingDispatcher {
    strategies: StrategyMap,
    default_strategy: SharedListingStrategy,
}

impl TaskListingDispatcher {
    /// Creates a dispatcher over `strategies`.
    ///
    /// The map may use any hasher; entries are moved into the dispatcher's
    /// own table.
    ///
    /// # Errors
    ///
    /// Returns [`MissingDefaultStrategy`] when the map has no
    /// [`DEFAULT_STRATEGY`] entry.
    pub fn new<H>(
        strategies: HashMap<String, SharedListingStrategy, H>,
    ) -> Result<Self, MissingDefaultStrategy>
    where
        H: BuildHasher,
    {
        let default_strategy = strategies
            .get(DEFAULT_STRATEGY)
            .cloned()
            .ok_or(MissingDefaultStrategy(DEFAULT_STRATEGY))?;
        Ok(Self {
            strategies: strategies.into_iter().collect(),
            default_strategy,
        })
    }

    /// Returns the strategy for `name`.
    ///
    /// An absent or blank name selects the default, and so does a name with
    /// no registered strategy.
    #[must_use]
    pub fn resolve(&self, name: Option<&str>) -> &SharedListingStrategy {
        let Some(requested) = name.filter(|value| !value.trim().is_empty()) else {
            return &self.default_strategy;
        };
        self.strategies.get(requested).unwrap_or_else(|| {
            debug!(
                requested,
                fallback = DEFAULT_STRATEGY,
                "unknown listing strategy, using default"
            );
            &self.default_strategy
        })
    }

    /// Lists one page using the strategy selected by `name`.
    ///
    /// # Errors
    ///
    /// Propagates repository failures from the selected strategy.
    pub async fn list(
        &self,
        page: PageRequest,
        name: Option<&str>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let strategy = self.resolve(name);
        debug!(
            strategy = strategy.name(),
            page = page.page(),
            page_size = page.page_size(),
            "listing tasks"
        );
        strategy.list(page).await
    }

    /// Returns the registered strategy names in sorted order.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
