//! `cartrack` -- terminal front-end for the household vehicle-compliance
//! tracker.
//!
//! Talks to the cartrack backend API; the backend itself (persistence,
//! reminder delivery) is a separate service.
//!
//! # Environment variables
//!
//! | Variable           | Required            | Default                 | Description                      |
//! |--------------------|---------------------|-------------------------|----------------------------------|
//! | `CARTRACK_API_URL` | no                  | `http://localhost:8000` | Backend base URL                 |
//! | `CARTRACK_TOKEN`   | for authed commands | --                      | Bearer token printed by `login`  |
//!
//! # Commands
//!
//! ```text
//! cartrack signup <email> <password>
//! cartrack login <email> <password>
//! cartrack household create <name>
//! cartrack household show
//! cartrack cars [--archived]
//! cartrack car add <vrm> [make] [model]
//! cartrack car show <car-id>
//! cartrack car archive <car-id>
//! cartrack car unarchive <car-id>
//! cartrack renewal add <car-id> <kind> <valid-from> <valid-to> [provider] [cost-pence]
//! cartrack renewal delete <renewal-id>
//! cartrack upcoming [days]
//! cartrack reminders show
//! cartrack reminders set <kind> <days,csv>
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use cartrack_cli::commands::{self, CliError, Context};
use cartrack_client::client::DEFAULT_BASE_URL;
use cartrack_client::{ApiClient, Session};
use cartrack_core::model::RenewalKind;

/// Days window shown by `upcoming` when none is given.
const DEFAULT_UPCOMING_DAYS: i64 = 60;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cartrack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url =
        std::env::var("CARTRACK_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let session = match std::env::var("CARTRACK_TOKEN") {
        Ok(token) if !token.is_empty() => Session::with_token(token),
        _ => Session::new(),
    };
    let ctx = Context {
        client: ApiClient::new(base_url, session),
    };
    tracing::debug!(
        base_url = %ctx.client.base_url(),
        authenticated = ctx.client.session().is_authenticated(),
        "Configured API client",
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&ctx, &args).await {
        eprintln!("error: {e}");
        if matches!(e, CliError::Usage(_)) {
            eprintln!();
            eprintln!("{USAGE}");
        }
        std::process::exit(1);
    }
}

const USAGE: &str = "\
usage:
  cartrack signup <email> <password>
  cartrack login <email> <password>
  cartrack household create <name> | show
  cartrack cars [--archived]
  cartrack car add <vrm> [make] [model]
  cartrack car show|archive|unarchive <car-id>
  cartrack renewal add <car-id> <kind> <valid-from> <valid-to> [provider] [cost-pence]
  cartrack renewal delete <renewal-id>
  cartrack upcoming [days]
  cartrack reminders show | set <kind> <days,csv>

kinds: INSURANCE, MOT, TAX; dates: YYYY-MM-DD";

async fn run(ctx: &Context, args: &[String]) -> Result<(), CliError> {
    let mut words = args.iter().map(String::as_str);

    match words.next() {
        Some("signup") => {
            let email = require(&mut words, "email")?;
            let password = require(&mut words, "password")?;
            commands::signup(ctx, email, password).await
        }
        Some("login") => {
            let email = require(&mut words, "email")?;
            let password = require(&mut words, "password")?;
            commands::login(ctx, email, password).await
        }
        Some("household") => match words.next() {
            Some("create") => {
                let name = require(&mut words, "name")?;
                commands::household_create(ctx, name).await
            }
            Some("show") => commands::household_show(ctx).await,
            _ => usage("expected: household create <name> | household show"),
        },
        Some("cars") => {
            let include_archived = matches!(words.next(), Some("--archived"));
            commands::cars(ctx, include_archived).await
        }
        Some("car") => match words.next() {
            Some("add") => {
                let vrm = require(&mut words, "vrm")?;
                let make = words.next();
                let model = words.next();
                commands::car_add(ctx, vrm, make, model).await
            }
            Some("show") => {
                let car_id = parse_uuid(require(&mut words, "car-id")?)?;
                commands::car_show(ctx, car_id).await
            }
            Some("archive") => {
                let car_id = parse_uuid(require(&mut words, "car-id")?)?;
                commands::car_set_archived(ctx, car_id, true).await
            }
            Some("unarchive") => {
                let car_id = parse_uuid(require(&mut words, "car-id")?)?;
                commands::car_set_archived(ctx, car_id, false).await
            }
            _ => usage("expected: car add|show|archive|unarchive ..."),
        },
        Some("renewal") => match words.next() {
            Some("add") => {
                let car_id = parse_uuid(require(&mut words, "car-id")?)?;
                let kind = parse_kind(require(&mut words, "kind")?)?;
                let valid_from = require(&mut words, "valid-from")?;
                let valid_to = require(&mut words, "valid-to")?;
                let provider = words.next();
                let cost_pence = words.next().map(parse_i64).transpose()?;
                commands::renewal_add(ctx, car_id, kind, valid_from, valid_to, provider, cost_pence)
                    .await
            }
            Some("delete") => {
                let renewal_id = parse_uuid(require(&mut words, "renewal-id")?)?;
                commands::renewal_delete(ctx, renewal_id).await
            }
            _ => usage("expected: renewal add|delete ..."),
        },
        Some("upcoming") => {
            let days = match words.next() {
                Some(raw) => parse_i64(raw)?,
                None => DEFAULT_UPCOMING_DAYS,
            };
            commands::upcoming(ctx, days).await
        }
        Some("reminders") => match words.next() {
            Some("show") => commands::reminders_show(ctx).await,
            Some("set") => {
                let kind = parse_kind(require(&mut words, "kind")?)?;
                let offsets = parse_offsets(require(&mut words, "days,csv")?)?;
                commands::reminders_set(ctx, kind, offsets).await
            }
            _ => usage("expected: reminders show | reminders set <kind> <days,csv>"),
        },
        Some(other) => usage(&format!("unknown command '{other}'")),
        None => usage("no command given"),
    }
}

fn usage(message: &str) -> Result<(), CliError> {
    Err(CliError::Usage(message.to_string()))
}

fn require<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    name: &str,
) -> Result<&'a str, CliError> {
    words
        .next()
        .ok_or_else(|| CliError::Usage(format!("missing argument <{name}>")))
}

fn parse_uuid(raw: &str) -> Result<Uuid, CliError> {
    raw.parse()
        .map_err(|_| CliError::Usage(format!("'{raw}' is not a valid id")))
}

fn parse_kind(raw: &str) -> Result<RenewalKind, CliError> {
    RenewalKind::from_str_value(&raw.to_uppercase()).map_err(CliError::Usage)
}

fn parse_i64(raw: &str) -> Result<i64, CliError> {
    raw.parse()
        .map_err(|_| CliError::Usage(format!("'{raw}' is not a valid integer")))
}

fn parse_offsets(raw: &str) -> Result<Vec<i64>, CliError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_i64)
        .collect()
}
