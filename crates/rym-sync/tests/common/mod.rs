//! In-memory chat server for engine tests.
//!
//! Histories are filtered with strict "id greater than cursor" semantics and
//! returned oldest first, like the real history endpoint.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rym_client::{ClientError, Page};
use rym_core::{Entity, Message, MessageId, PageCursor};
use rym_sync::{ChatRemote, Credentials};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Debug, Clone, Copy)]
pub enum Failure {
    /// Every request answers with this HTTP status.
    Status(u16),
    /// Every request exhausts its retries.
    Unreachable,
    /// Requests after the first `n` exhaust their retries.
    AfterRequests(usize),
    Panic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub entity_id: u64,
    pub cursor: Option<MessageId>,
    pub page_size: u32,
}

pub struct FakeRemote {
    mode: PageCursor,
    catalog: Vec<Entity>,
    histories: Mutex<HashMap<u64, Vec<Message>>>,
    failures: HashMap<u64, Failure>,
    reject_login: bool,
    fail_discovery: bool,
    requests: Mutex<Vec<Request>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeRemote {
    pub fn new(mode: PageCursor) -> Self {
        Self {
            mode,
            catalog: Vec::new(),
            histories: Mutex::new(HashMap::new()),
            failures: HashMap::new(),
            reject_login: false,
            fail_discovery: false,
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_entity(mut self, entity: Entity, history: Vec<Message>) -> Self {
        self.histories.lock().unwrap().insert(entity.id, history);
        self.catalog.push(entity);
        self
    }

    pub fn with_failure(mut self, entity_id: u64, failure: Failure) -> Self {
        self.failures.insert(entity_id, failure);
        self
    }

    pub fn rejecting_login(mut self) -> Self {
        self.reject_login = true;
        self
    }

    pub fn failing_discovery(mut self) -> Self {
        self.fail_discovery = true;
        self
    }

    /// New messages arriving on the server between runs.
    pub fn append(&self, entity_id: u64, messages: Vec<Message>) {
        self.histories
            .lock()
            .unwrap()
            .entry(entity_id)
            .or_default()
            .extend(messages);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, entity_id: u64) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.entity_id == entity_id)
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

pub fn numeric(id: &MessageId) -> i64 {
    match id {
        MessageId::Int(n) => *n,
        MessageId::Text(s) => s.parse().unwrap_or_default(),
    }
}

/// Messages with ids `ids`, one second apart.
pub fn history(ids: std::ops::RangeInclusive<i64>) -> Vec<Message> {
    ids.map(|i| {
        Message::new(
            i,
            format!("2021-01-01T00:{:02}:{:02}.000+00:00", i / 60, i % 60),
            "Alice",
            format!("message {i}"),
        )
    })
    .collect()
}

pub fn credentials() -> Credentials {
    Credentials {
        username: "alice".into(),
        password: "secret".into(),
    }
}

fn unreachable_error() -> ClientError {
    ClientError::RetriesExhausted {
        attempts: 9,
        last: Box::new(ClientError::Request("connection refused".into())),
    }
}

#[async_trait]
impl ChatRemote for FakeRemote {
    async fn login(&self, _username: &str, _password: &str) -> Result<(), ClientError> {
        if self.reject_login {
            return Err(ClientError::Api {
                status: 401,
                message: "bad credentials".into(),
            });
        }
        Ok(())
    }

    async fn discover(&self) -> Result<Vec<Entity>, ClientError> {
        if self.fail_discovery {
            return Err(ClientError::Api {
                status: 500,
                message: "info unavailable".into(),
            });
        }
        Ok(self.catalog.clone())
    }

    async fn fetch_page(
        &self,
        entity: &Entity,
        cursor: Option<&MessageId>,
        page_size: u32,
    ) -> Result<Page, ClientError> {
        let previous = {
            let mut requests = self.requests.lock().unwrap();
            let previous = requests.iter().filter(|r| r.entity_id == entity.id).count();
            requests.push(Request {
                entity_id: entity.id,
                cursor: cursor.cloned(),
                page_size,
            });
            previous
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.failures.get(&entity.id) {
            Some(Failure::Status(status)) => {
                return Err(ClientError::Api {
                    status: *status,
                    message: "server error".into(),
                });
            }
            Some(Failure::Unreachable) => return Err(unreachable_error()),
            Some(Failure::AfterRequests(n)) if previous >= *n => return Err(unreachable_error()),
            Some(Failure::Panic) => panic!("fake server blew up for {}", entity.id),
            _ => {}
        }

        let after = cursor.map(numeric);
        let histories = self.histories.lock().unwrap();
        let matching: Vec<Message> = histories
            .get(&entity.id)
            .map(|h| {
                h.iter()
                    .filter(|m| after.is_none_or(|c| numeric(&m.id) > c))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let count = i64::try_from(matching.len()).unwrap();
        let page: Vec<Message> = matching.into_iter().take(page_size as usize).collect();
        Ok(Page::from_messages(page, count, self.mode))
    }
}

/// Counts emitted tracing events per level while installed as the thread's
/// default subscriber.
#[derive(Clone, Default)]
pub struct LevelCounts(Arc<Mutex<HashMap<Level, usize>>>);

impl LevelCounts {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn get(&self, level: Level) -> usize {
        self.0.lock().unwrap().get(&level).copied().unwrap_or(0)
    }
}

impl<S: Subscriber> Layer<S> for LevelCounts {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        *self
            .0
            .lock()
            .unwrap()
            .entry(*event.metadata().level())
            .or_default() += 1;
    }
}
