use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use crate::crud::{ensure_success, parse_body, ApiClient};
use crate::error::ClientResult;
use crate::model::Account;

const ACCOUNT_PATH: &str = "api/account";

/// Access to the signed-in account, owned by the authentication service.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// The current account, or `None` when nobody is signed in.
    async fn identity(&self) -> ClientResult<Option<Account>>;

    async fn save(&self, account: &Account) -> ClientResult<()>;
}

#[async_trait]
impl<'a, A> AccountService for &'a A
where
    A: AccountService + ?Sized,
{
    async fn identity(&self) -> ClientResult<Option<Account>> {
        (**self).identity().await
    }

    async fn save(&self, account: &Account) -> ClientResult<()> {
        (**self).save(account).await
    }
}

pub struct AccountClient {
    api: ApiClient,
}

impl AccountClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AccountService for AccountClient {
    async fn identity(&self) -> ClientResult<Option<Account>> {
        tracing::debug!("REST request to get account");
        let response = self.api.request(Method::GET, ACCOUNT_PATH).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        Ok(Some(parse_body(response).await?))
    }

    async fn save(&self, account: &Account) -> ClientResult<()> {
        tracing::debug!(login = %account.login, "REST request to save account");
        let response = self
            .api
            .request(Method::POST, ACCOUNT_PATH)
            .json(account)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Who is using the client right now.
///
/// Passed explicitly into workflows that stamp the current player onto
/// records they create.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    account: Option<Account>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(account: Account) -> Self {
        Self {
            account: Some(account),
        }
    }

    /// Loads the current account from the authentication service.
    pub async fn load(service: &impl AccountService) -> ClientResult<Self> {
        Ok(Self {
            account: service.identity().await?,
        })
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn player_id(&self) -> Option<i64> {
        self.account.as_ref().and_then(|a| a.player_id)
    }

    pub(crate) fn account_mut(&mut self) -> Option<&mut Account> {
        self.account.as_mut()
    }
}
