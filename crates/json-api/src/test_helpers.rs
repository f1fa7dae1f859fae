//! Test helpers.

use std::sync::Arc;

use karat_app::{
    auth::{MockAuthService, Principal},
    context::AppContext,
    database::MockDatabaseProbe,
    domain::{
        carts::MockCartsService, orders::MockOrdersService, payments::MockPaymentsService,
        products::MockProductsService, promocodes::MockPromoCodesService,
        rates::MockRatesService, users::MockUsersService, users::models::UserUuid,
    },
};
use salvo::{affix_state::inject, catcher::Catcher, prelude::*};
use uuid::Uuid;

use crate::{envelope::render_errors, extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_ADMIN_EMAIL: &str = "admin@example.com";

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal::User {
        uuid: TEST_USER_UUID,
    });
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal::Admin {
        email: TEST_ADMIN_EMAIL.to_string(),
    });
    ctrl.call_next(req, depot, res).await;
}

fn strict_users_mock() -> MockUsersService {
    let mut users = MockUsersService::new();

    users.expect_get_user().never();
    users.expect_list_users().never();
    users.expect_set_blocked().never();

    users
}

fn strict_rates_mock() -> MockRatesService {
    let mut rates = MockRatesService::new();

    rates.expect_list_rates().never();
    rates.expect_create_rate().never();
    rates.expect_delete_rate().never();
    rates.expect_rate_book().never();
    rates.expect_material_types().never();
    rates.expect_list_diamond_types().never();
    rates.expect_create_diamond_type().never();

    rates
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();

    products
}

fn strict_promocodes_mock() -> MockPromoCodesService {
    let mut promocodes = MockPromoCodesService::new();

    promocodes.expect_list_promocodes().never();
    promocodes.expect_get_promocode().never();
    promocodes.expect_create_promocode().never();
    promocodes.expect_update_promocode().never();
    promocodes.expect_delete_promocode().never();
    promocodes.expect_validate().never();

    promocodes
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_remove_item().never();

    carts
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_list_orders().never();
    orders.expect_get_order().never();
    orders.expect_list_all_orders().never();
    orders.expect_update_status().never();
    orders.expect_set_delivery().never();

    orders
}

fn strict_payments_mock() -> MockPaymentsService {
    let mut payments = MockPaymentsService::new();

    payments.expect_create_razorpay_order().never();
    payments.expect_verify_razorpay().never();
    payments.expect_get_payment().never();

    payments
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_admin_login_init().never();
    auth.expect_admin_login_verify().never();
    auth.expect_signup_init().never();
    auth.expect_signup_verify().never();
    auth.expect_login_init().never();
    auth.expect_login_verify().never();
    auth.expect_authenticate().never();

    auth
}

fn strict_database_mock() -> MockDatabaseProbe {
    let mut database = MockDatabaseProbe::new();

    database.expect_is_available().never();

    database
}

/// An app whose services fail the test when called. Replace the ones under test.
pub(crate) fn strict_app() -> AppContext {
    AppContext {
        users: Arc::new(strict_users_mock()),
        rates: Arc::new(strict_rates_mock()),
        products: Arc::new(strict_products_mock()),
        promocodes: Arc::new(strict_promocodes_mock()),
        carts: Arc::new(strict_carts_mock()),
        orders: Arc::new(strict_orders_mock()),
        payments: Arc::new(strict_payments_mock()),
        auth: Arc::new(strict_auth_mock()),
        database: Arc::new(strict_database_mock()),
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    let mut app = strict_app();
    app.auth = Arc::new(auth);

    State::from_app_context(app)
}

fn service(app: AppContext, router: Router) -> Service {
    Service::new(router.hoop(inject(State::from_app_context(app))))
        .catcher(Catcher::default().hoop(render_errors))
}

/// Serve `route` without a caller.
pub(crate) fn public_service(app: AppContext, route: Router) -> Service {
    service(app, Router::new().push(route))
}

/// Serve `route` as [`TEST_USER_UUID`].
pub(crate) fn user_service(app: AppContext, route: Router) -> Service {
    service(app, Router::new().hoop(inject_user).push(route))
}

/// Serve `route` as [`TEST_ADMIN_EMAIL`].
pub(crate) fn admin_service(app: AppContext, route: Router) -> Service {
    service(app, Router::new().hoop(inject_admin).push(route))
}
