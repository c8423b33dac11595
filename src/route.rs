//! Navigation paths and the resolvers that turn them into entities.
//!
//! A resolver produces exactly one outcome per navigation: the resolved
//! entity, or a redirect to the not-found view. Never both.

use crate::crud::{EntityService, Lookup};
use crate::error::ClientResult;
use crate::model::{Challenge, Entity, Player};
use crate::schema::ChallengeStatus;

pub const NOT_FOUND_ROUTE: &str = "404";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Challenge,
    Cord,
    Player,
}

impl EntityKind {
    fn from_segment(s: &str) -> Option<Self> {
        match s {
            "challenge" => Some(EntityKind::Challenge),
            "cord" => Some(EntityKind::Cord),
            "player" => Some(EntityKind::Player),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
    New,
    Edit,
    /// Challenge only: move the challenge to the given status.
    Transition(ChallengeStatus),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteParams {
    pub id: Option<i64>,
    /// Challenge only: the player being challenged.
    pub player_id: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub kind: EntityKind,
    pub view: View,
    pub params: RouteParams,
}

impl Navigation {
    /// Parses paths such as `cord`, `cord/new`, `player/7/view`,
    /// `challenge/3/edit`, `challenge/new/77` or `challenge/3/accept`.
    /// Leading and trailing slashes are ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let (&first, rest) = segments.split_first()?;
        let kind = EntityKind::from_segment(first)?;
        let mut params = RouteParams::default();

        let view = match rest {
            [] => View::List,
            ["new"] => View::New,
            ["new", player_id] if kind == EntityKind::Challenge => {
                params.player_id = Some(player_id.parse().ok()?);
                View::New
            }
            [id, action] => {
                params.id = Some(id.parse().ok()?);
                match (*action, kind) {
                    ("view", _) => View::Detail,
                    ("edit", _) => View::Edit,
                    ("accept", EntityKind::Challenge) => {
                        View::Transition(ChallengeStatus::Accepted)
                    }
                    ("reject", EntityKind::Challenge) => {
                        View::Transition(ChallengeStatus::Rejected)
                    }
                    ("cancel", EntityKind::Challenge) => {
                        View::Transition(ChallengeStatus::Cancelled)
                    }
                    _ => return None,
                }
            }
            _ => return None,
        };

        Some(Self { kind, view, params })
    }
}

/// What a resolver hands to the view layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution<E> {
    Resolved(E),
    /// Navigation is abandoned; the caller should go to this route instead.
    Redirect(&'static str),
}

impl<E> Resolution<E> {
    pub fn resolved(self) -> Option<E> {
        match self {
            Resolution::Resolved(e) => Some(e),
            Resolution::Redirect(_) => None,
        }
    }
}

/// Fetches the entity named by `params.id`, or yields a fresh empty one.
pub async fn resolve<E, S>(service: &S, params: &RouteParams) -> ClientResult<Resolution<E>>
where
    E: Entity,
    S: EntityService<E> + ?Sized,
{
    let Some(id) = params.id else {
        return Ok(Resolution::Resolved(E::default()));
    };

    match service.find(id).await? {
        Lookup::Found(entity) => Ok(Resolution::Resolved(entity)),
        Lookup::NotFound => {
            tracing::warn!(entity = E::NAME, id, "Not found, redirecting");
            Ok(Resolution::Redirect(NOT_FOUND_ROUTE))
        }
    }
}

/// Like [`resolve`], but a new challenge started from a player's page
/// comes back with that player as the acceptor.
pub async fn resolve_challenge<S>(
    service: &S,
    params: &RouteParams,
) -> ClientResult<Resolution<Challenge>>
where
    S: EntityService<Challenge> + ?Sized,
{
    match (params.id, params.player_id) {
        (None, Some(player_id)) => Ok(Resolution::Resolved(Challenge {
            acceptor: Some(Player::stub(player_id)),
            ..Default::default()
        })),
        _ => resolve(service, params).await,
    }
}
