use std::marker::PhantomData;

use chrono::{DateTime, NaiveTime, Utc};

use crate::account::{AccountService, Session};
use crate::collection::add_to_collection_if_missing;
use crate::crud::EntityService;
use crate::error::{ClientError, ClientResult};
use crate::form::{ChallengeForm, PlayerForm};
use crate::model::{Challenge, Cord, Entity, Player, User};
use crate::schema::{ChallengeStatus, CordCriteria, GeneralStatus, RequestOptions};

/// Saves one entity kind: update when the id is set, create otherwise.
///
/// `save` holds the editor mutably while the request is in flight, so
/// `is_saving` is only observable between saves, where it is always
/// `false`, whether the last save succeeded or failed.
pub struct Editor<E, S> {
    service: S,
    is_saving: bool,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> Editor<E, S>
where
    E: Entity,
    S: EntityService<E>,
{
    pub fn new(service: S) -> Self {
        Self {
            service,
            is_saving: false,
            _entity: PhantomData,
        }
    }

    /// `false` once `save` has returned, on success and on failure.
    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn save(&mut self, entity: &E) -> ClientResult<E> {
        self.is_saving = true;
        let result = match entity.id() {
            Some(_) => self.service.update(entity).await,
            None => self.service.create(entity).await,
        };
        self.is_saving = false;

        match &result {
            Ok(saved) => tracing::info!(entity = E::NAME, id = ?saved.id(), "Saved"),
            Err(e) => tracing::warn!(entity = E::NAME, error = %e, "Save failed"),
        }
        result
    }
}

/// Choices offered by the challenge edit view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelationshipOptions {
    pub cords: Vec<Cord>,
    pub players: Vec<Player>,
}

/// Create, edit and answer challenges on behalf of the session's player.
pub struct ChallengeWorkflow<S> {
    editor: Editor<Challenge, S>,
    session: Session,
}

impl<S: EntityService<Challenge>> ChallengeWorkflow<S> {
    pub fn new(service: S, session: Session) -> Self {
        Self {
            editor: Editor::new(service),
            session,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.editor.is_saving()
    }

    /// Builds the edit form; a new challenge defaults to the start of
    /// `now`'s day.
    pub fn prepare(&self, challenge: &Challenge, now: DateTime<Utc>) -> ChallengeForm {
        let mut challenge = challenge.clone();
        if challenge.id.is_none() {
            challenge.match_time = Some(now.date_naive().and_time(NaiveTime::MIN).and_utc());
        }
        ChallengeForm::from_entity(&challenge)
    }

    /// New challenges start `REQUESTED` and `ACTIVE`, proposed by the
    /// session's player when there is one. Edits keep their current
    /// status.
    pub async fn save(&mut self, form: &ChallengeForm) -> ClientResult<Challenge> {
        let mut challenge = form.to_entity()?;

        if challenge.id.is_none() {
            challenge.challenge_status = Some(ChallengeStatus::Requested);
            challenge.status = Some(GeneralStatus::Active);
            if let Some(player_id) = self.session.player_id() {
                challenge.proposer = Some(Player::stub(player_id));
            }
        } else if challenge.challenge_status.is_none() {
            challenge.challenge_status = Some(ChallengeStatus::Requested);
        }

        self.editor.save(&challenge).await
    }

    pub async fn accept(&mut self, challenge: &mut Challenge) -> ClientResult<Challenge> {
        self.update_status(challenge, ChallengeStatus::Accepted).await
    }

    pub async fn reject(&mut self, challenge: &mut Challenge) -> ClientResult<Challenge> {
        self.update_status(challenge, ChallengeStatus::Rejected).await
    }

    pub async fn cancel(&mut self, challenge: &mut Challenge) -> ClientResult<Challenge> {
        self.update_status(challenge, ChallengeStatus::Cancelled).await
    }

    /// Sets `challenge_status` on the record and persists it with a single
    /// full update. A record without a status counts as `REQUESTED`.
    /// The caller's record only changes once the update succeeds.
    pub async fn update_status(
        &mut self,
        challenge: &mut Challenge,
        target: ChallengeStatus,
    ) -> ClientResult<Challenge> {
        if challenge.id.is_none() {
            return Err(ClientError::MissingIdentifier {
                entity: Challenge::NAME,
            });
        }
        let current = challenge
            .challenge_status
            .unwrap_or(ChallengeStatus::Requested);
        if !current.can_transition_to(target) {
            return Err(ClientError::InvalidTransition {
                from: current,
                to: target,
            });
        }

        let mut answered = challenge.clone();
        answered.challenge_status = Some(target);
        let saved = self.editor.save(&answered).await?;
        *challenge = answered;
        Ok(saved)
    }

    /// Loads the cords not yet bound to a challenge and all players, keeping
    /// whatever the form currently references.
    pub async fn load_relationship_options<C, P>(
        &self,
        cords: &C,
        players: &P,
        form: &ChallengeForm,
    ) -> ClientResult<RelationshipOptions>
    where
        C: EntityService<Cord> + ?Sized,
        P: EntityService<Player> + ?Sized,
    {
        let free_cords: RequestOptions = CordCriteria {
            challenge_assigned: Some(false),
            ..Default::default()
        }
        .into();
        let cord_page = cords.query(&free_cords).await?;
        let player_page = players.query(&RequestOptions::new()).await?;

        let cords = add_to_collection_if_missing(cord_page.items.as_slice(), [form.cord.as_ref()])
            .into_owned();
        let players = add_to_collection_if_missing(
            player_page.items.as_slice(),
            [form.proposer.as_ref(), form.acceptor.as_ref()],
        )
        .into_owned();

        Ok(RelationshipOptions { cords, players })
    }
}

/// Saves player profiles and links a newly saved profile to the signed-in
/// account.
pub struct PlayerWorkflow<S, A> {
    editor: Editor<Player, S>,
    accounts: A,
    session: Session,
}

impl<S, A> PlayerWorkflow<S, A>
where
    S: EntityService<Player>,
    A: AccountService,
{
    pub fn new(service: S, accounts: A, session: Session) -> Self {
        Self {
            editor: Editor::new(service),
            accounts,
            session,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.editor.is_saving()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// A new profile is attached to the session's user as `internalUser`.
    pub async fn save(&mut self, form: &PlayerForm) -> ClientResult<Player> {
        let mut player = form.to_entity();
        if player.id.is_none() {
            if let Some(account) = self.session.account() {
                player.internal_user = Some(User {
                    id: account.id,
                    login: None,
                });
            }
        }
        let saved = self.editor.save(&player).await?;

        if let (Some(player_id), Some(account)) = (saved.id, self.session.account_mut()) {
            account.player_id = Some(player_id);
            self.accounts.save(account).await?;
            tracing::info!(login = %account.login, player_id, "Linked player to account");
        }
        Ok(saved)
    }
}
