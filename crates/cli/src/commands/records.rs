//! Record commands: get, list, mine, delete.
//!
//! Each command dispatches on [`EntityKind`] to the typed client of that
//! kind and prints the result as JSON.

use tracing::info;
use tripnest_client::api::EntityClient;
use tripnest_core::{EntityKind, Hotel, ProviderRecord, TourGuide, TravelAgency, Vehicle};

use super::{CommandError, Context, print_json, print_line};

/// Run `$body` with `$client` bound to the typed client for `$kind`.
macro_rules! with_client {
    ($ctx:expr, $kind:expr, |$client:ident| $body:expr) => {
        match $kind {
            EntityKind::Hotel => {
                let $client = client::<Hotel>($ctx)?;
                $body
            }
            EntityKind::TourGuide => {
                let $client = client::<TourGuide>($ctx)?;
                $body
            }
            EntityKind::TravelAgency => {
                let $client = client::<TravelAgency>($ctx)?;
                $body
            }
            EntityKind::Vehicle => {
                let $client = client::<Vehicle>($ctx)?;
                $body
            }
        }
    };
}

fn client<R: ProviderRecord>(ctx: &Context) -> Result<EntityClient<R>, CommandError> {
    Ok(EntityClient::new(ctx.api()?, ctx.snapshots()))
}

async fn get_one<R>(client: &EntityClient<R>, id: i64) -> Result<(), CommandError>
where
    R: ProviderRecord,
    R::Id: From<i64>,
{
    let record = client.get(R::Id::from(id)).await?;
    print_json(&record)
}

async fn delete_one<R>(client: &EntityClient<R>, id: i64) -> Result<(), CommandError>
where
    R: ProviderRecord,
    R::Id: From<i64>,
{
    let body = client.delete(R::Id::from(id)).await?;
    info!(kind = %R::KIND, id, "Deleted");
    print_line(&body.to_display_string());
    Ok(())
}

/// Fetch and print one record.
///
/// # Errors
///
/// Returns error if nobody is signed in or the request fails.
pub async fn get(ctx: &Context, kind: EntityKind, id: i64) -> Result<(), CommandError> {
    with_client!(ctx, kind, |c| get_one(&c, id).await)
}

/// Print every record of `kind`.
///
/// # Errors
///
/// Returns error if nobody is signed in or the request fails.
pub async fn list(ctx: &Context, kind: EntityKind) -> Result<(), CommandError> {
    with_client!(ctx, kind, |c| print_json(&c.all().await?))
}

/// Print the signed-in provider's records of `kind`.
///
/// # Errors
///
/// Returns error if nobody is signed in or the request fails.
pub async fn mine(ctx: &Context, kind: EntityKind) -> Result<(), CommandError> {
    with_client!(ctx, kind, |c| print_json(&c.mine().await?))
}

/// Delete one record and print the server's confirmation.
///
/// # Errors
///
/// Returns error if nobody is signed in or the server refuses.
pub async fn delete(ctx: &Context, kind: EntityKind, id: i64) -> Result<(), CommandError> {
    with_client!(ctx, kind, |c| delete_one(&c, id).await)
}
