//! Test support utilities shared across unit and integration tests.

use std::collections::{BTreeSet, VecDeque};
use std::env;
use std::ffi::OsString;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Value, json};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};

use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError, TransportFuture};

type Scripted = Result<HttpResponse, TransportError>;

/// Scripted transport that returns pre-seeded responses in FIFO order.
///
/// Used to drive deterministic appliance behaviour without a network. Every
/// request is recorded so tests can assert on paths, verbs, and bodies.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    /// Creates a transport with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, item: Scripted) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(item);
    }

    /// Pushes a response with an explicit status and body text.
    pub fn push_response(&self, status: u16, text: impl Into<String>) {
        self.push(Ok(HttpResponse::new(status, text)));
    }

    /// Pushes a 200 response carrying `body` as JSON.
    pub fn push_json(&self, body: &Value) {
        self.push_response(200, body.to_string());
    }

    /// Pushes a connection-level failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.push(Err(TransportError::new(message)));
    }

    /// Returns a snapshot of all requests recorded so far.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of scripted responses not yet consumed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Transport for ScriptedTransport {
    fn send<'a>(&'a self, request: &'a HttpRequest) -> TransportFuture<'a> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted response available")));
        Box::pin(async move { next })
    }
}

/// Produces a project object shaped like the appliance's project listing.
#[must_use]
pub fn json_project(name: &str, quota: u64, available: u64, used: u64) -> Value {
    json!({
        "project": name,
        "options": {
            "quota": quota,
            "available": available,
            "used": used,
        }
    })
}

/// Produces a volume object with the identifiers the driver reads.
#[must_use]
pub fn json_volume(id: &str, alias: &str, lu_name: &str, serial: &str) -> Value {
    json!({
        "id": id,
        "alias": alias,
        "LUName": lu_name,
        "SerialNum": serial,
        "views": [],
    })
}

/// Produces a view entry as found in a volume's `views` array.
#[must_use]
pub fn json_view(host_group: &str, target_group: &str, lun: i64) -> Value {
    json!({
        "HostGroup": host_group,
        "TargetGroup": target_group,
        "LUN": lun,
    })
}

/// Global mutex used to serialise environment mutation in tests.
pub static ENV_LOCK: AsyncMutex<()> = AsyncMutex::const_new(());

/// Guard that holds the env mutex and restores variables on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets multiple environment variables while holding a global mutex.
    pub async fn set_vars(pairs: &[(&str, &str)]) -> Self {
        debug_assert!(
            {
                let mut seen = BTreeSet::new();
                pairs.iter().all(|(key, _)| seen.insert(*key))
            },
            "duplicate environment variable keys passed to EnvGuard::set_vars"
        );

        let guard = ENV_LOCK.lock().await;
        let mut previous = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let old = env::var_os(key);
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe { env::set_var(key, value) };
            previous.push(((*key).to_owned(), old));
        }

        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            // SAFETY: Environment mutation is serialised by holding `_guard`.
            unsafe {
                match old {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
