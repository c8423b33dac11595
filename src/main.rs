use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tennisly_client::account::{AccountClient, Session};
use tennisly_client::crud::{ApiClient, EntityService};
use tennisly_client::listing::ListView;
use tennisly_client::route::{self, EntityKind, Navigation, Resolution, View};
use tennisly_client::workflow::ChallengeWorkflow;
use tennisly_client::{
    Challenge, ChallengeStatus, ClientConfig, Cord, Entity, Player, RequestOptions,
};

const USAGE: &str = "usage: tennisly <route>
  cord | player | challenge           list
  <entity>/new                        new empty record
  <entity>/<id>/view | <id>/edit      fetch one record
  challenge/new/<playerId>            new challenge against a player
  challenge/<id>/accept|reject|cancel answer a challenge";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tennisly=debug,tennisly_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(path) = std::env::args().nth(1) else {
        bail!(USAGE);
    };
    let nav = Navigation::parse(&path).ok_or_else(|| anyhow!("unknown route `{path}`\n{USAGE}"))?;

    let config = ClientConfig::from_env();
    tracing::debug!(api_url = %config.api_url, "using API");
    let api = ApiClient::new(&config);

    match nav.kind {
        EntityKind::Cord => show(&api.entity::<Cord>(), &nav).await,
        EntityKind::Player => show(&api.entity::<Player>(), &nav).await,
        EntityKind::Challenge => {
            let challenges = api.entity::<Challenge>();
            match nav.view {
                View::Transition(target) => answer(&api, &challenges, &nav, target).await,
                View::List => list(&challenges).await,
                _ => print_resolution(route::resolve_challenge(&challenges, &nav.params).await?),
            }
        }
    }
}

async fn show<E: Entity, S: EntityService<E>>(service: &S, nav: &Navigation) -> Result<()> {
    match nav.view {
        View::List => list::<E, S>(service).await,
        View::Transition(_) => bail!("only challenges have a status"),
        _ => print_resolution(route::resolve::<E, S>(service, &nav.params).await?),
    }
}

async fn list<E: Entity, S: EntityService<E>>(service: &S) -> Result<()> {
    let mut view: ListView<E, &S> = ListView::new(service, RequestOptions::new().sort("id,asc"));
    view.load_all().await?;
    if let Some(total) = view.total_count() {
        tracing::info!(entity = E::NAME, total, "Loaded list");
    }
    print_json(view.items())
}

async fn answer<S: EntityService<Challenge>>(
    api: &ApiClient,
    challenges: &S,
    nav: &Navigation,
    target: ChallengeStatus,
) -> Result<()> {
    let mut challenge = match route::resolve_challenge(challenges, &nav.params).await? {
        Resolution::Resolved(c) => c,
        Resolution::Redirect(to) => return print_redirect(to),
    };

    let session = Session::load(&AccountClient::new(api.clone()))
        .await
        .context("loading current account")?;
    let mut workflow = ChallengeWorkflow::new(challenges, session);
    let saved = workflow.update_status(&mut challenge, target).await?;
    print_json(&saved)
}

fn print_resolution<E: Serialize>(resolution: Resolution<E>) -> Result<()> {
    match resolution {
        Resolution::Resolved(entity) => print_json(&entity),
        Resolution::Redirect(to) => print_redirect(to),
    }
}

fn print_redirect(to: &str) -> Result<()> {
    println!("redirect: /{to}");
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
