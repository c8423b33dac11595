//! In-memory stand-ins for the REST services, used by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::account::AccountService;
use crate::crud::{EntityService, Lookup, Page};
use crate::error::{ClientError, ClientResult, TransportError};
use crate::model::{Account, Entity};
use crate::schema::RequestOptions;

const FIRST_ID: i64 = 1000;

/// Records every call as a short string (`"create"`, `"update 9"`,
/// `"find 1"`, `"query k=v&k=v"`, `"delete 3"`) and serves entities from
/// a vector.
pub struct FakeService<E> {
    store: Mutex<Vec<E>>,
    calls: Mutex<Vec<String>>,
    sent: Mutex<Vec<E>>,
    next_id: Mutex<i64>,
    failing: bool,
}

impl<E: Entity> Default for FakeService<E> {
    fn default() -> Self {
        Self::with(Vec::new())
    }
}

impl<E: Entity> FakeService<E> {
    pub fn with(items: Vec<E>) -> Self {
        Self {
            store: Mutex::new(items),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            next_id: Mutex::new(FIRST_ID),
            failing: false,
        }
    }

    /// Every call fails with HTTP 500.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// The last entity passed to `create`, `update` or `partial_update`.
    pub fn last_sent(&self) -> Option<E> {
        self.sent.lock().unwrap().last().cloned()
    }

    fn record(&self, call: String) -> ClientResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing {
            return Err(ClientError::Transport(TransportError::Status {
                status: 500,
                body: "boom".into(),
            }));
        }
        Ok(())
    }

    fn upsert(&self, entity: E) -> E {
        let mut store = self.store.lock().unwrap();
        store.retain(|e| e.id() != entity.id());
        store.push(entity.clone());
        entity
    }
}

fn with_id<E: Entity>(entity: &E, id: i64) -> E {
    let mut value = serde_json::to_value(entity).unwrap();
    value["id"] = serde_json::json!(id);
    serde_json::from_value(value).unwrap()
}

#[async_trait]
impl<E: Entity> EntityService<E> for FakeService<E> {
    async fn create(&self, entity: &E) -> ClientResult<E> {
        self.record("create".into())?;
        self.sent.lock().unwrap().push(entity.clone());
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        Ok(self.upsert(with_id(entity, id)))
    }

    async fn update(&self, entity: &E) -> ClientResult<E> {
        let id = entity.id().ok_or(ClientError::MissingIdentifier { entity: E::NAME })?;
        self.record(format!("update {id}"))?;
        self.sent.lock().unwrap().push(entity.clone());
        Ok(self.upsert(entity.clone()))
    }

    async fn partial_update(&self, entity: &E) -> ClientResult<E> {
        let id = entity.id().ok_or(ClientError::MissingIdentifier { entity: E::NAME })?;
        self.record(format!("partial_update {id}"))?;
        self.sent.lock().unwrap().push(entity.clone());
        Ok(self.upsert(entity.clone()))
    }

    async fn find(&self, id: i64) -> ClientResult<Lookup<E>> {
        self.record(format!("find {id}"))?;
        let store = self.store.lock().unwrap();
        Ok(match store.iter().find(|e| e.id() == Some(id)) {
            Some(e) => Lookup::Found(e.clone()),
            None => Lookup::NotFound,
        })
    }

    async fn query(&self, options: &RequestOptions) -> ClientResult<Page<E>> {
        let pairs: Vec<String> = options
            .to_query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        let call = if pairs.is_empty() {
            "query".to_string()
        } else {
            format!("query {}", pairs.join("&"))
        };
        self.record(call)?;
        let items = self.store.lock().unwrap().clone();
        let total_count = Some(items.len() as u64);
        Ok(Page { items, total_count })
    }

    async fn count(&self, _options: &RequestOptions) -> ClientResult<u64> {
        self.record("count".into())?;
        Ok(self.store.lock().unwrap().len() as u64)
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        self.record(format!("delete {id}"))?;
        self.store.lock().unwrap().retain(|e| e.id() != Some(id));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeAccounts {
    current: Option<Account>,
    saved: Mutex<Vec<Account>>,
}

impl FakeAccounts {
    pub fn signed_in(account: Account) -> Self {
        Self {
            current: Some(account),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn saved(&self) -> Vec<Account> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountService for FakeAccounts {
    async fn identity(&self) -> ClientResult<Option<Account>> {
        Ok(self.current.clone())
    }

    async fn save(&self, account: &Account) -> ClientResult<()> {
        self.saved.lock().unwrap().push(account.clone());
        Ok(())
    }
}
