use std::future::Future;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::ClientError;

/// What a view renders for one remote resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Handed out for every request a hook starts. A response may only be
/// committed while its ticket is current.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Keeps at most one request of a hook alive. Starting a request cancels the
/// one before it, and responses of superseded requests are refused even if
/// the transport ignored the cancellation.
#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: u64,
    current: Option<CancellationToken>,
}

impl RequestTracker {
    pub fn begin(&mut self) -> Ticket {
        self.cancel();
        self.generation += 1;
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        Ticket {
            generation: self.generation,
            token,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation && !ticket.token.is_cancelled()
    }
}

#[derive(Debug)]
struct ResourceInner<T> {
    state: LoadState<T>,
    tracker: RequestTracker,
}

/// A single remote value, reloaded whenever its inputs change.
#[derive(Debug)]
pub struct Resource<T> {
    inner: RwLock<ResourceInner<T>>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(ResourceInner {
                state: LoadState::Idle,
                tracker: RequestTracker::default(),
            }),
        }
    }
}

impl<T: Clone> Resource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn state(&self) -> LoadState<T> {
        self.inner.read().await.state.clone()
    }

    /// Runs `fetch` with a fresh cancellation token, cancelling any load
    /// still in flight. Returns whether the result was committed.
    pub async fn load<F, Fut>(&self, fetch: F) -> bool
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let ticket = {
            let mut inner = self.inner.write().await;
            inner.state = LoadState::Loading;
            inner.tracker.begin()
        };

        let result = fetch(ticket.token().clone()).await;

        let mut inner = self.inner.write().await;
        if !inner.tracker.is_current(&ticket) {
            tracing::debug!(
                generation = ticket.generation(),
                "Discarding superseded response"
            );
            return false;
        }
        inner.state = match result {
            Ok(data) => LoadState::Success(data),
            Err(err) => LoadState::Error(err.to_string()),
        };
        true
    }

    /// Abandons any load in flight and forgets the value.
    pub async fn reset(&self) {
        let mut inner = self.inner.write().await;
        inner.tracker.cancel();
        inner.state = LoadState::Idle;
    }
}
