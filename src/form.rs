//! Typed edit forms for each entity.
//!
//! `from_entity` fills a form from a loaded record; `to_entity` reads the
//! edited values back. Challenge `match_time` is edited as local text in
//! `YYYY-MM-DDTHH:mm` form and interpreted as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::FormError;
use crate::model::{Challenge, Cord, Player, User};
use crate::schema::{ChallengeStatus, Gender, GeneralStatus, Level};

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn format_date_time(ts: &DateTime<Utc>) -> String {
    ts.format(DATE_TIME_FORMAT).to_string()
}

pub fn parse_date_time(value: &str) -> Result<DateTime<Utc>, FormError> {
    NaiveDateTime::parse_from_str(value.trim(), DATE_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| FormError::DateTime {
            value: value.to_string(),
            source,
        })
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChallengeForm {
    pub id: Option<i64>,
    pub match_time: Option<String>,
    pub challenge_status: Option<ChallengeStatus>,
    pub status: Option<GeneralStatus>,
    pub cord: Option<Cord>,
    pub proposer: Option<Player>,
    pub acceptor: Option<Player>,
}

impl ChallengeForm {
    pub fn from_entity(challenge: &Challenge) -> Self {
        Self {
            id: challenge.id,
            match_time: challenge.match_time.as_ref().map(format_date_time),
            challenge_status: challenge.challenge_status,
            status: challenge.status,
            cord: challenge.cord.clone(),
            proposer: challenge.proposer.clone(),
            acceptor: challenge.acceptor.clone(),
        }
    }

    /// Blank `match_time` text reads back as no match time.
    pub fn to_entity(&self) -> Result<Challenge, FormError> {
        let match_time = match self.match_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(parse_date_time(text)?),
        };
        Ok(Challenge {
            id: self.id,
            match_time,
            challenge_status: self.challenge_status,
            status: self.status,
            cord: self.cord.clone(),
            proposer: self.proposer.clone(),
            acceptor: self.acceptor.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CordForm {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub image: Option<String>,
    pub image_content_type: Option<String>,
    pub status: Option<GeneralStatus>,
}

impl CordForm {
    pub fn from_entity(cord: &Cord) -> Self {
        Self {
            id: cord.id,
            name: cord.name.clone(),
            address: cord.address.clone(),
            image: cord.image.clone(),
            image_content_type: cord.image_content_type.clone(),
            status: cord.status,
        }
    }

    pub fn to_entity(&self) -> Cord {
        Cord {
            id: self.id,
            name: self.name.clone(),
            address: self.address.clone(),
            image: self.image.clone(),
            image_content_type: self.image_content_type.clone(),
            status: self.status,
        }
    }

    /// Drops the image together with its content type.
    pub fn clear_image(&mut self) {
        self.image = None;
        self.image_content_type = None;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerForm {
    pub id: Option<i64>,
    pub full_name: Option<String>,
    pub gender: Option<Gender>,
    pub level: Option<Level>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    pub photo_content_type: Option<String>,
    pub status: Option<GeneralStatus>,
    pub internal_user: Option<User>,
}

impl PlayerForm {
    pub fn from_entity(player: &Player) -> Self {
        Self {
            id: player.id,
            full_name: player.full_name.clone(),
            gender: player.gender,
            level: player.level,
            phone: player.phone.clone(),
            photo: player.photo.clone(),
            photo_content_type: player.photo_content_type.clone(),
            status: player.status,
            internal_user: player.internal_user.clone(),
        }
    }

    pub fn to_entity(&self) -> Player {
        Player {
            id: self.id,
            full_name: self.full_name.clone(),
            gender: self.gender,
            level: self.level,
            phone: self.phone.clone(),
            photo: self.photo.clone(),
            photo_content_type: self.photo_content_type.clone(),
            status: self.status,
            internal_user: self.internal_user.clone(),
        }
    }

    pub fn clear_photo(&mut self) {
        self.photo = None;
        self.photo_content_type = None;
    }
}
