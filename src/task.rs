//! Spawned background work with typed join outcomes.

use std::fmt;
use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How a background task ended when it did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError<E> {
    /// The task ran to completion and returned its own error.
    Failed(E),
    /// The task panicked; the payload's message is preserved when it is a
    /// string.
    Panicked(String),
    /// The task was aborted before completing.
    Aborted,
}

impl<E> TaskError<E> {
    /// True when the task itself panicked.
    pub fn is_panicked(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }

    /// The task's own error, when it ran to completion and failed.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Panicked(_) | Self::Aborted => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for TaskError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(error) => write!(f, "{error}"),
            Self::Panicked(message) => write!(f, "task panicked: {message}"),
            Self::Aborted => f.write_str("task aborted"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for TaskError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Panicked(_) | Self::Aborted => None,
        }
    }
}

/// A handle to a spawned fallible task.
///
/// Wraps a tokio task so that joining yields one flat
/// `Result<T, TaskError<E>>` instead of the nested join-then-operation
/// result, and so that cooperative shutdown travels with the handle: a task
/// spawned through [`spawn_with_token`](Self::spawn_with_token) gets a child
/// token it can poll, and [`cancel`](Self::cancel) fires that token so the
/// task can finish on its own terms, where [`abort`](Self::abort) stops it at
/// the next await point.
///
/// # Examples
///
/// ```rust
/// use headwater::Task;
///
/// # tokio_test::block_on(async {
/// let task = Task::spawn(async { Ok::<_, String>(21 * 2) });
/// assert_eq!(task.join().await, Ok(42));
/// # });
/// ```
///
/// Panics surface as data rather than tearing down the joiner:
///
/// ```rust
/// use headwater::{Task, TaskError};
///
/// # tokio_test::block_on(async {
/// let task: Task<(), String> = Task::spawn(async { panic!("worker blew up") });
///
/// match task.join().await {
///     Err(TaskError::Panicked(message)) => assert_eq!(message, "worker blew up"),
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// # });
/// ```
#[derive(Debug)]
pub struct Task<T, E> {
    handle: JoinHandle<Result<T, E>>,
    token: CancellationToken,
}

impl<T, E> Task<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Spawn `future` onto the current runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
            token: CancellationToken::new(),
        }
    }

    /// Spawn a task wired for cooperative shutdown.
    ///
    /// The task receives a child of `parent`: cancelling the parent, or
    /// calling [`cancel`](Self::cancel) on this handle, fires the token the
    /// task observes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use headwater::{Task, TaskError};
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # tokio_test::block_on(async {
    /// let shutdown = CancellationToken::new();
    /// let task = Task::spawn_with_token(&shutdown, |token| async move {
    ///     token.cancelled().await;
    ///     Err::<(), _>("stopped by shutdown")
    /// });
    ///
    /// shutdown.cancel();
    /// assert_eq!(task.join().await, Err(TaskError::Failed("stopped by shutdown")));
    /// # });
    /// ```
    pub fn spawn_with_token<F, Fut>(parent: &CancellationToken, f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let token = parent.child_token();
        Self {
            handle: tokio::spawn(f(token.clone())),
            token,
        }
    }

    /// Fire the task's token, requesting a cooperative stop.
    ///
    /// Has no effect on tasks spawned without a token unless they were handed
    /// [`token`](Self::token) separately.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The token this task observes.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Forcibly abort the task at its next yield point.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Whether the task has finished running.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task and flatten its outcome.
    pub async fn join(self) -> Result<T, TaskError<E>> {
        match self.handle.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(TaskError::Failed(error)),
            Err(join_error) => {
                if join_error.is_panic() {
                    let payload = join_error.into_panic();
                    let message = if let Some(s) = payload.downcast_ref::<&str>() {
                        (*s).to_string()
                    } else if let Some(s) = payload.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        String::from("non-string panic payload")
                    };
                    Err(TaskError::Panicked(message))
                } else {
                    Err(TaskError::Aborted)
                }
            }
        }
    }
}
