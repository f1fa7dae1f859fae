//! Database availability guard.

use std::sync::Arc;

use salvo::prelude::*;
use tracing::warn;

use crate::{extensions::*, state::State};

/// Refuse requests with 503 while the database cannot serve queries.
#[handler]
pub(crate) async fn require_database(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();

            return;
        }
    };

    if !state.app.database.is_available().await {
        warn!(path = %req.uri().path(), "database unavailable; request refused");

        res.render(StatusError::service_unavailable().brief("Database not connected"));
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}
