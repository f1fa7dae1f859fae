//! App Router

use salvo::Router;

use crate::{
    admin, auth,
    availability::require_database,
    carts, healthcheck,
    observability::{metrics_handler, request_logging},
    orders, payments, products, promocodes, rates, users,
};

/// Every route under `/api`.
///
/// Health and metrics answer without the database; everything else is refused with 503 while
/// it is unreachable.
pub(crate) fn api_router() -> Router {
    Router::with_path("api")
        .hoop(request_logging)
        .push(Router::with_path("health").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(
            Router::new()
                .hoop(require_database)
                .push(public_routes())
                .push(
                    Router::new()
                        .hoop(auth::middleware::handler)
                        .push(user_routes())
                        .push(admin_routes()),
                ),
        )
}

fn public_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("admin/login")
                .push(Router::with_path("init").post(admin::login_init::handler))
                .push(Router::with_path("verify").post(admin::login_verify::handler)),
        )
        .push(
            Router::with_path("users")
                .push(Router::with_path("signup/init").post(users::signup_init::handler))
                .push(Router::with_path("signup/verify").post(users::signup_verify::handler))
                .push(Router::with_path("login/init").post(users::login_init::handler))
                .push(Router::with_path("login/verify").post(users::login_verify::handler)),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(
                    Router::with_path("meta/material-types").get(rates::material_types::handler),
                )
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(Router::with_path("promocodes/validate").post(promocodes::validate::handler))
}

fn user_routes() -> Router {
    Router::new()
        .hoop(auth::middleware::user_only)
        .push(Router::with_path("users/me").get(users::me::handler))
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .post(carts::add::handler)
                .push(Router::with_path("{product}").delete(carts::remove::handler)),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
        .push(
            Router::with_path("payments")
                .push(Router::with_path("razorpay/order").post(payments::razorpay_order::handler))
                .push(
                    Router::with_path("razorpay/verify").post(payments::razorpay_verify::handler),
                )
                .push(Router::with_path("{payment}").get(payments::get::handler)),
        )
}

fn admin_routes() -> Router {
    Router::new()
        .hoop(auth::middleware::admin_only)
        .push(
            Router::with_path("admin")
                .push(Router::with_path("me").get(admin::me::handler))
                .push(
                    Router::with_path("users")
                        .get(admin::users_index::handler)
                        .push(Router::with_path("{user}/block").patch(admin::block_user::handler)),
                )
                .push(Router::with_path("orders").get(orders::admin_index::handler)),
        )
        .push(
            Router::with_path("products")
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("rates")
                .get(rates::index::handler)
                .post(rates::create::handler)
                .push(Router::with_path("{rate}").delete(rates::delete::handler)),
        )
        .push(
            Router::with_path("diamond-types")
                .get(rates::diamond_types_index::handler)
                .post(rates::diamond_types_create::handler),
        )
        .push(
            Router::with_path("promocodes")
                .get(promocodes::index::handler)
                .post(promocodes::create::handler)
                .push(
                    Router::with_path("{promo}")
                        .get(promocodes::get::handler)
                        .put(promocodes::update::handler)
                        .delete(promocodes::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders/{order}")
                .push(Router::with_path("status").patch(orders::update_status::handler))
                .push(Router::with_path("delivery").patch(orders::update_delivery::handler)),
        )
}
