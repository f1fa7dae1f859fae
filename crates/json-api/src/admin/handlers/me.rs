//! Admin Identity Handler

use salvo::prelude::*;

use crate::{
    admin::models::AdminResponse,
    envelope::{Envelope, ok},
    extensions::*,
};

/// Admin Identity Handler
#[endpoint(
    tags("admin"),
    summary = "Current Admin",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Envelope<AdminResponse>>, StatusError> {
    let email = depot.admin_email_or_403()?.to_string();

    Ok(ok(AdminResponse { email }))
}
