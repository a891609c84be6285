use log::{debug, warn};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use super::actions::Action;
use crate::client::{ClientError, CreateRepositoryArgs, RepositoryClient, UpdateRepositoryArgs};
use crate::repository::Repository;

pub type TaskId = u64;

/// Builds the completion owed by a task that ended without sending one.
type FailureAction = Box<dyn FnOnce(ClientError) -> Action + Send>;

pub struct BackgroundTask {
    pub id: TaskId,
    pub handle: JoinHandle<()>,
    pub description: String,
    pub started_at: Instant,
    reported: Arc<AtomicBool>,
    on_failure: FailureAction,
}

/// Runs remote calls as tokio tasks.
///
/// Each task sends exactly one completion [`Action`] back over the channel
/// returned by [`TaskManager::new`]. A task that panics still owes its
/// completion: the manager sends a failed one when it reaps the task.
/// Dropping the manager aborts whatever is still running, so nothing reports
/// back to a consumer that is gone.
pub struct TaskManager {
    tasks: HashMap<TaskId, BackgroundTask>,
    next_task_id: TaskId,
    action_sender: mpsc::UnboundedSender<Action>,
    timeout: Duration,
}

impl TaskManager {
    pub fn new(timeout: Duration) -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (
            Self {
                tasks: HashMap::new(),
                next_task_id: 1,
                action_sender: tx,
                timeout,
            },
            rx,
        )
    }

    /// Spawn `operation` and forward the action it resolves to.
    ///
    /// `on_failure` builds the completion sent instead if the task ends
    /// without producing one.
    pub fn spawn<Fut, F>(&mut self, description: impl Into<String>, operation: Fut, on_failure: F) -> TaskId
    where
        Fut: Future<Output = Action> + Send + 'static,
        F: FnOnce(ClientError) -> Action + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let description = description.into();
        debug!("Spawning task {task_id}: {description}");

        let action_sender = self.action_sender.clone();
        let reported = Arc::new(AtomicBool::new(false));
        let task_reported = Arc::clone(&reported);
        let handle = tokio::spawn(async move {
            let action = operation.await;
            let _ = action_sender.send(action);
            task_reported.store(true, Ordering::Release);
        });

        self.tasks.insert(
            task_id,
            BackgroundTask {
                id: task_id,
                handle,
                description,
                started_at: Instant::now(),
                reported,
                on_failure: Box::new(on_failure),
            },
        );
        task_id
    }

    /// Fetch the full collection.
    pub fn spawn_load(&mut self, client: Arc<dyn RepositoryClient>) -> TaskId {
        let timeout = self.timeout;
        self.spawn(
            "Load repositories",
            async move { Action::RepositoriesLoaded(with_timeout(timeout, client.list_repositories()).await) },
            |e| Action::RepositoriesLoaded(Err(e)),
        )
    }

    pub fn spawn_create(&mut self, client: Arc<dyn RepositoryClient>, args: CreateRepositoryArgs) -> TaskId {
        let timeout = self.timeout;
        let description = format!("Create repository '{}'", args.name);
        self.spawn(
            description,
            async move { Action::CreateFinished(with_timeout(timeout, client.create_repository(args)).await) },
            |e| Action::CreateFinished(Err(e)),
        )
    }

    pub fn spawn_update(
        &mut self,
        client: Arc<dyn RepositoryClient>,
        target: Repository,
        args: UpdateRepositoryArgs,
    ) -> TaskId {
        let timeout = self.timeout;
        let target_id = target.id;
        let description = format!("Update repository {target_id}");
        self.spawn(
            description,
            async move {
                let result = with_timeout(timeout, client.update_repository(&target, args)).await;
                Action::UpdateFinished { target_id, result }
            },
            move |e| Action::UpdateFinished {
                target_id,
                result: Err(e),
            },
        )
    }

    /// Forget tasks whose handle has finished. Returns how many were removed.
    pub fn cleanup_finished_tasks(&mut self) -> usize {
        let finished: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.handle.is_finished())
            .map(|(id, _)| *id)
            .collect();
        for task_id in &finished {
            if let Some(task) = self.tasks.remove(task_id) {
                self.reap(task, None);
            }
        }
        finished.len()
    }

    /// Wait for the oldest tracked task to finish. Returns `false` if there is none.
    ///
    /// A task sends its completion before it finishes, so once this returns
    /// the completion is already in the channel.
    pub async fn wait_oldest(&mut self) -> bool {
        let Some(task_id) = self.tasks.keys().min().copied() else {
            return false;
        };
        let mut outcome = None;
        if let Some(task) = self.tasks.get_mut(&task_id) {
            outcome = (&mut task.handle).await.err();
        }
        if let Some(task) = self.tasks.remove(&task_id) {
            self.reap(task, outcome);
        }
        true
    }

    /// Send the failed completion of a finished task that never reported.
    fn reap(&self, task: BackgroundTask, error: Option<JoinError>) {
        if task.reported.load(Ordering::Acquire) {
            return;
        }
        let reason = match &error {
            Some(e) if e.is_panic() => "panicked",
            Some(e) if e.is_cancelled() => "was cancelled",
            _ => "ended without a result",
        };
        warn!("Task {} ({}) {reason}", task.id, task.description);
        let failure = ClientError::Upstream {
            status: None,
            message: format!("{} {reason}", task.description),
        };
        let _ = self.action_sender.send((task.on_failure)(failure));
    }

    /// Cancel all running tasks
    pub fn cancel_all_tasks(&mut self) {
        for (_, task) in self.tasks.drain() {
            debug!("Aborting task {}: {} ({:?} old)", task.id, task.description, task.started_at.elapsed());
            task.handle.abort();
        }
    }

    /// Get the number of tracked tasks
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.cancel_all_tasks();
    }
}

async fn with_timeout<T, Fut>(timeout: Duration, call: Fut) -> Result<T, ClientError>
where
    Fut: Future<Output = Result<T, ClientError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::Network(format!(
            "request timed out after {}s",
            timeout.as_secs_f32()
        ))),
    }
}
