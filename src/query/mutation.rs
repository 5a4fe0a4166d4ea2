//! Write operations and their cache side effects

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::BoxFuture;
use log::{info, warn};

use super::{QueryClient, QueryKey};
use crate::error::{Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Create => f.write_str("create"),
            MutationKind::Update => f.write_str("update"),
            MutationKind::Delete => f.write_str("delete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

type MutateFn<V, R> = Arc<dyn Fn(V) -> BoxFuture<'static, Result<R>> + Send + Sync>;
type ValidateFn<V> = Arc<dyn Fn(&V) -> std::result::Result<(), ValidationError> + Send + Sync>;
type ApplyFn<V> = Arc<dyn Fn(&QueryClient, &V) + Send + Sync>;

struct Optimistic<V> {
    targets: Vec<QueryKey>,
    apply: ApplyFn<V>,
}

/// A write against the API with declared cache effects.
///
/// Each `mutate` call sends exactly one request; failures are never
/// retried. On success the `invalidates` prefixes are invalidated, and on
/// settle (success or failure) the `invalidates_on_settle` prefixes are.
/// Invalidation finishes refetching observed queries before `mutate`
/// returns.
pub struct Mutation<V, R> {
    client: QueryClient,
    name: &'static str,
    kind: MutationKind,
    mutate_fn: MutateFn<V, R>,
    validate: Option<ValidateFn<V>>,
    optimistic: Option<Optimistic<V>>,
    invalidates: Vec<QueryKey>,
    invalidates_on_settle: Vec<QueryKey>,
    status: Mutex<MutationStatus>,
}

impl<V, R> Mutation<V, R>
where
    V: Send + 'static,
    R: Send + 'static,
{
    pub fn new<F, Fut>(client: &QueryClient, name: &'static str, kind: MutationKind, mutate: F) -> Self
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R>> + Send + 'static,
    {
        Self {
            client: client.clone(),
            name,
            kind,
            mutate_fn: Arc::new(move |vars| mutate(vars).boxed()),
            validate: None,
            optimistic: None,
            invalidates: Vec::new(),
            invalidates_on_settle: Vec::new(),
            status: Mutex::new(MutationStatus::Idle),
        }
    }

    /// Check variables before anything else happens; a failure never
    /// reaches the network or the cache.
    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&V) -> std::result::Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    /// Invalidate `prefix` after a successful write.
    pub fn invalidates(mut self, prefix: QueryKey) -> Self {
        self.invalidates.push(prefix);
        self
    }

    /// Invalidate `prefix` after the write settles either way.
    pub fn invalidates_on_settle(mut self, prefix: QueryKey) -> Self {
        self.invalidates_on_settle.push(prefix);
        self
    }

    /// Update cached data under `targets` before the request is sent.
    ///
    /// In-flight fetches on the targets are cancelled and their data
    /// snapshotted first; if the write fails the snapshot is restored.
    pub fn optimistic<F>(mut self, targets: Vec<QueryKey>, apply: F) -> Self
    where
        F: Fn(&QueryClient, &V) + Send + Sync + 'static,
    {
        self.optimistic = Some(Optimistic {
            targets,
            apply: Arc::new(apply),
        });
        self
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn status(&self) -> MutationStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_pending(&self) -> bool {
        self.status() == MutationStatus::Pending
    }

    fn set_status(&self, status: MutationStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    pub async fn mutate(&self, vars: V) -> Result<R> {
        if let Some(validate) = &self.validate
            && let Err(err) = validate(&vars)
        {
            warn!("{} ({}) rejected: {}", self.name, self.kind, err);
            self.set_status(MutationStatus::Error);
            return Err(err.into());
        }

        self.set_status(MutationStatus::Pending);

        let snapshot = self.optimistic.as_ref().map(|optimistic| {
            for target in &optimistic.targets {
                self.client.cancel_queries(target);
            }
            let snapshot = self.client.snapshot(&optimistic.targets);
            (optimistic.apply)(&self.client, &vars);
            snapshot
        });

        info!("{} ({})", self.name, self.kind);
        let result = (self.mutate_fn)(vars).await;

        match &result {
            Ok(_) => {
                for prefix in &self.invalidates {
                    self.client.invalidate_queries(prefix).await;
                }
            }
            Err(err) => {
                warn!("{} ({}) failed: {}", self.name, self.kind, err);
                if let Some(snapshot) = snapshot {
                    self.client.restore(snapshot);
                }
            }
        }

        for prefix in &self.invalidates_on_settle {
            self.client.invalidate_queries(prefix).await;
        }

        self.set_status(if result.is_ok() {
            MutationStatus::Success
        } else {
            MutationStatus::Error
        });
        result
    }

    /// Back to idle, e.g. before reusing the mutation for another form.
    pub fn reset(&self) {
        self.set_status(MutationStatus::Idle);
    }
}
