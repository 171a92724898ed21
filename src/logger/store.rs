//! Request-scoped annotation store
//!
//! Each request owns exactly one [`AnnotationStore`], reached through a
//! cloneable [`RequestLog`] handle. Handler code (and any task it spawns on
//! behalf of the request) adds key/value annotations through the handle; the
//! logging middleware retires the store once and renders what it holds.

use std::collections::HashMap;
use std::convert::Infallible;
use std::panic::Location;
use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use parking_lot::Mutex;

use super::format::Value;
use crate::constants::keys;

/// Final key/value annotations of one request
pub type Annotations = HashMap<String, Value>;

tokio::task_local! {
    static CURRENT: RequestLog;
}

/// Mutex-guarded annotation map
///
/// `None` marks a retired store: annotations after [`finalize`] are ignored.
///
/// [`finalize`]: AnnotationStore::finalize
#[derive(Debug)]
pub struct AnnotationStore {
    entries: Mutex<Option<Annotations>>,
}

impl AnnotationStore {
    fn new() -> Self {
        Self {
            entries: Mutex::new(Some(HashMap::new())),
        }
    }

    fn retired() -> Self {
        Self {
            entries: Mutex::new(None),
        }
    }

    /// Upsert key/value pairs taken from a flat, alternating argument list
    ///
    /// A trailing unpaired argument is discarded and pairs whose key is not
    /// text are dropped.
    fn upsert_flat<I>(&self, args: I, caller: &Location<'_>, message: Option<Value>)
    where
        I: IntoIterator<Item = Value>,
    {
        let pairs = pair_up(args);

        let mut entries = self.entries.lock();
        let Some(map) = entries.as_mut() else {
            return;
        };
        map.extend(pairs);
        map.insert(keys::CALLER.to_string(), caller_value(caller));
        if let Some(message) = message {
            map.insert(keys::MESSAGE.to_string(), message);
        }
    }

    /// Retire the store and hand out its annotations
    ///
    /// Only the first call sees the annotations; later calls get an empty map.
    pub fn finalize(&self) -> Annotations {
        self.entries.lock().take().unwrap_or_default()
    }

    /// Whether the store still accepts annotations
    pub fn is_open(&self) -> bool {
        self.entries.lock().is_some()
    }
}

/// Handle to the annotation store of one in-flight request
///
/// Cloning the handle is cheap and every clone refers to the same store, so
/// it can be moved into tasks that work for the request concurrently.
#[derive(Debug, Clone)]
pub struct RequestLog {
    store: Arc<AnnotationStore>,
}

impl RequestLog {
    /// Create a handle bound to a fresh, empty store
    pub fn new() -> Self {
        Self {
            store: Arc::new(AnnotationStore::new()),
        }
    }

    /// Create a handle that ignores every annotation
    ///
    /// Handed out when no logging middleware is installed for the request.
    pub fn detached() -> Self {
        Self {
            store: Arc::new(AnnotationStore::retired()),
        }
    }

    /// Handle of the request running on the current task, if any
    pub fn current() -> Option<Self> {
        CURRENT.try_with(Clone::clone).ok()
    }

    /// Run `fut` with this handle as the current task's request log
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT.scope(self, fut).await
    }

    /// Add annotations from alternating key/value arguments
    ///
    /// Also records the caller's source location under the `file` key.
    #[track_caller]
    pub fn annotate<I>(&self, args: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.store.upsert_flat(args, Location::caller(), None);
    }

    /// Add a message plus alternating key/value arguments
    ///
    /// The message is stored under the `msg` key; later messages replace it.
    #[track_caller]
    pub fn message<I>(&self, message: impl Into<String>, args: I)
    where
        I: IntoIterator<Item = Value>,
    {
        self.store
            .upsert_flat(args, Location::caller(), Some(Value::Str(message.into())));
    }

    /// Set a single annotation
    #[track_caller]
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.store.upsert_flat(
            [Value::Str(key.into()), value.into()],
            Location::caller(),
            None,
        );
    }

    /// Retire the store and take its annotations
    pub fn finalize(&self) -> Annotations {
        self.store.finalize()
    }

    /// Whether annotations are still recorded through this handle
    pub fn is_active(&self) -> bool {
        self.store.is_open()
    }
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestLog {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestLog>()
            .cloned()
            .unwrap_or_else(RequestLog::detached))
    }
}

/// Annotate the request behind `log` with alternating key/value arguments
#[track_caller]
pub fn annotate<I>(log: &RequestLog, args: I)
where
    I: IntoIterator<Item = Value>,
{
    log.annotate(args);
}

/// Annotate the request running on the current task
///
/// Does nothing outside a request scope.
#[track_caller]
pub fn annotate_current<I>(args: I)
where
    I: IntoIterator<Item = Value>,
{
    let caller = Location::caller();
    let _ = CURRENT.try_with(|log| log.store.upsert_flat(args, caller, None));
}

/// Annotate a request with alternating keys and values of any convertible type
///
/// ```
/// use reqlog::{annotate, RequestLog};
///
/// let log = RequestLog::new();
/// annotate!(log, "user", "ada", "items", 3, "cached", true);
/// assert_eq!(log.finalize().len(), 4);
/// ```
#[macro_export]
macro_rules! annotate {
    ($log:expr $(, $arg:expr)* $(,)?) => {
        $crate::logger::store::annotate(
            &$log,
            [$($crate::logger::format::Value::from($arg)),*],
        )
    };
}

fn pair_up<I>(args: I) -> Vec<(String, Value)>
where
    I: IntoIterator<Item = Value>,
{
    let mut args = args.into_iter();
    let mut pairs = Vec::new();
    while let (Some(key), Some(value)) = (args.next(), args.next()) {
        if let Value::Str(key) = key {
            pairs.push((key, value));
        }
    }
    pairs
}

fn caller_value(caller: &Location<'_>) -> Value {
    Value::Str(format!("{}:{}", caller.file(), caller.line()))
}
