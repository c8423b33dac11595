use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::schema::{ChallengeStatus, Gender, GeneralStatus, Level};

/// A persisted record exposed under one REST resource.
///
/// `Default` is the empty, not-yet-saved instance used by "new" flows.
/// Once the server has assigned an identifier it is never reassigned.
pub trait Entity:
    Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Lower-case entity name, used in logs and route paths.
    const NAME: &'static str;
    /// Resource path relative to the API root, e.g. `api/challenges`.
    const RESOURCE: &'static str;

    fn id(&self) -> Option<i64>;
}

// Reference fields (`cord`, `proposer`, `acceptor`, `internalUser`) carry
// either the full related record or a stub holding only `id`.

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(
        default,
        with = "crate::wire::iso8601_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub match_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_status: Option<ChallengeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GeneralStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cord: Option<Cord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposer: Option<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptor: Option<Player>,
}

impl Entity for Challenge {
    const NAME: &'static str = "challenge";
    const RESOURCE: &'static str = "api/challenges";

    fn id(&self) -> Option<i64> {
        self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The API spells this field `adress`.
    #[serde(
        default,
        rename = "adress",
        alias = "address",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,
    /// Base64 encoded image bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GeneralStatus>,
}

impl Cord {
    pub fn stub(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

impl Entity for Cord {
    const NAME: &'static str = "cord";
    const RESOURCE: &'static str = "api/cords";

    fn id(&self) -> Option<i64> {
        self.id
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Base64 encoded photo bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GeneralStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_user: Option<User>,
}

impl Player {
    pub fn stub(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

impl Entity for Player {
    const NAME: &'static str = "player";
    const RESOURCE: &'static str = "api/players";

    fn id(&self) -> Option<i64> {
        self.id
    }
}

/// Login record owned by the authentication service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

/// The signed-in account as returned by `GET api/account`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Id of the backing user record, referenced as a player's `internalUser`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub login: String,
    #[serde(default)]
    pub activated: bool,
    #[serde(default)]
    pub authorities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Player profile linked to this account, once one has been saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<i64>,
}
