//! Subcommand implementations.
//!
//! Each command drives the [`ApiClient`] (or a [`CarOverview`]) and prints
//! plain text via [`render`](crate::render). Output goes to stdout;
//! failures propagate as [`CliError`] and are reported by `main`.

use uuid::Uuid;

use cartrack_client::{ApiClient, CarOverview, ClientError};
use cartrack_core::date::{parse_iso_date, today_local};
use cartrack_core::model::{
    CarCreate, HouseholdCreate, LoginRequest, RenewalCreate, RenewalKind, SignupRequest,
};
use cartrack_core::reminders;

use crate::render;

/// Top-level CLI failure: bad usage or a failed API operation.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Shared context for every subcommand.
pub struct Context {
    pub client: ApiClient,
}

pub async fn signup(ctx: &Context, email: &str, password: &str) -> Result<(), CliError> {
    let user = ctx
        .client
        .signup(&SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?;
    println!("Registered {} ({})", user.email, user.id);
    println!("Log in with: cartrack login {email} <password>");
    Ok(())
}

pub async fn login(ctx: &Context, email: &str, password: &str) -> Result<(), CliError> {
    let token = ctx
        .client
        .login(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?;
    println!("Logged in. For authenticated commands, export the token:");
    println!("  export CARTRACK_TOKEN={}", token.access_token);
    Ok(())
}

pub async fn household_create(ctx: &Context, name: &str) -> Result<(), CliError> {
    let household = ctx
        .client
        .create_household(&HouseholdCreate {
            name: name.to_string(),
        })
        .await?;
    println!("Created household '{}' ({})", household.name, household.id);
    Ok(())
}

pub async fn household_show(ctx: &Context) -> Result<(), CliError> {
    let household = ctx.client.current_household().await?;
    println!("{}  {}", household.id, household.name);
    Ok(())
}

pub async fn cars(ctx: &Context, include_archived: bool) -> Result<(), CliError> {
    let cars = ctx.client.list_cars(include_archived).await?;
    if cars.is_empty() {
        println!("No cars yet.");
        return Ok(());
    }
    for car in &cars {
        println!("{}", render::car_line(car));
    }
    Ok(())
}

pub async fn car_add(
    ctx: &Context,
    vrm: &str,
    make: Option<&str>,
    model: Option<&str>,
) -> Result<(), CliError> {
    let car = ctx
        .client
        .create_car(&CarCreate {
            registration_number: vrm.to_string(),
            make: make.map(str::to_string),
            model: model.map(str::to_string),
        })
        .await?;
    println!("Added {}", render::car_line(&car));
    Ok(())
}

pub async fn car_show(ctx: &Context, car_id: Uuid) -> Result<(), CliError> {
    let mut overview = CarOverview::new(ctx.client.clone(), car_id);
    overview.refresh().await?;

    let car = overview.car().expect("refresh populates the car");
    println!("{}", render::car_line(car));
    println!(
        "Status: {}",
        if car.is_archived { "Archived" } else { "Active" }
    );

    let today = today_local();
    for kind in RenewalKind::ALL {
        println!();
        println!("{}", render::status_line(kind, &overview.status(kind, today)));
        let records = overview.records(kind);
        if records.is_empty() {
            println!("  No records yet.");
        } else {
            for record in records {
                println!("  {}", render::history_line(record));
            }
        }
    }
    Ok(())
}

pub async fn car_set_archived(ctx: &Context, car_id: Uuid, archived: bool) -> Result<(), CliError> {
    let car = if archived {
        ctx.client.archive_car(car_id).await?
    } else {
        ctx.client.unarchive_car(car_id).await?
    };
    println!("{}", render::car_line(&car));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn renewal_add(
    ctx: &Context,
    car_id: Uuid,
    kind: RenewalKind,
    valid_from: &str,
    valid_to: &str,
    provider: Option<&str>,
    cost_pence: Option<i64>,
) -> Result<(), CliError> {
    let valid_from = parse_iso_date(valid_from)
        .map_err(|e| CliError::Client(ClientError::Validation(e.to_string())))?;
    let valid_to = parse_iso_date(valid_to)
        .map_err(|e| CliError::Client(ClientError::Validation(e.to_string())))?;

    let payload = RenewalCreate {
        provider: provider.map(str::to_string),
        cost_pence,
        ..RenewalCreate::new(kind, valid_from, valid_to)
    };
    let record = ctx.client.create_renewal(car_id, &payload).await?;
    println!("Added {} renewal {}", kind.display_name(), record.id);
    println!("  {}", render::history_line(&record));
    Ok(())
}

pub async fn renewal_delete(ctx: &Context, renewal_id: Uuid) -> Result<(), CliError> {
    ctx.client.delete_renewal(renewal_id).await?;
    println!("Deleted renewal {renewal_id}");
    Ok(())
}

pub async fn upcoming(ctx: &Context, days: i64) -> Result<(), CliError> {
    let entries = ctx.client.upcoming_renewals(days).await?;
    if entries.is_empty() {
        println!("Nothing due in the next {days} days.");
        return Ok(());
    }
    for entry in &entries {
        println!("{}", render::upcoming_line(entry));
    }
    Ok(())
}

pub async fn reminders_show(ctx: &Context) -> Result<(), CliError> {
    let prefs = ctx.client.reminder_preferences().await?;
    for (kind, offsets) in &prefs.preferences {
        let days: Vec<String> = offsets.iter().map(i64::to_string).collect();
        println!("{:<12} {} days before expiry", kind.display_name(), days.join(", "));
    }
    Ok(())
}

pub async fn reminders_set(
    ctx: &Context,
    kind: RenewalKind,
    offsets: Vec<i64>,
) -> Result<(), CliError> {
    // Start from the saved preferences (or the defaults) so setting one
    // kind does not wipe the others.
    let mut prefs = match ctx.client.reminder_preferences().await {
        Ok(prefs) => prefs,
        Err(ClientError::Api { status: 404, .. }) => reminders::default_preferences(),
        Err(e) => return Err(e.into()),
    };
    prefs.preferences.insert(kind, offsets);

    let saved = ctx.client.save_reminder_preferences(&prefs).await?;
    let days: Vec<String> = saved.preferences[&kind].iter().map(i64::to_string).collect();
    println!("{}: {} days before expiry", kind.display_name(), days.join(", "));
    Ok(())
}
