//! App Context

use std::{fmt, sync::Arc};

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;
use zeroize::Zeroizing;

use crate::{
    auth::{AuthService, AuthSettings, InMemoryOtpStore, PgAuthService, TokenError, TokenIssuer},
    database::{self, DatabaseProbe, Db, PgDatabaseProbe},
    domain::{
        carts::{CartsService, PgCartsService},
        orders::{OrdersService, PgOrdersService},
        payments::{
            GatewayError, PaymentGateway, PaymentsService, PgPaymentsService, RazorpayClient,
            RazorpayConfig,
        },
        products::{PgProductsService, ProductsService},
        promocodes::{PgPromoCodesService, PromoCodesService},
        rates::{PgRatesService, RatesService},
        users::{PgUsersService, UsersService},
    },
    notifications::{LogMailer, MailSettings, Notifier, spawn_outbox},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),

    #[error("failed to configure token signing")]
    Token(#[source] TokenError),

    #[error("failed to build payment gateway client")]
    Gateway(#[source] GatewayError),
}

/// Everything needed to wire the services together.
#[derive(Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub jwt_secret: Zeroizing<String>,
    pub auth: AuthSettings,

    /// Checkout is refused while this is unset.
    pub razorpay: Option<RazorpayConfig>,

    pub mail_from: String,
    pub brand: String,
    pub store_admin_email: Option<String>,

    /// Apply pending migrations before serving.
    pub migrate: bool,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("auth", &self.auth)
            .field("razorpay_configured", &self.razorpay.is_some())
            .field("mail_from", &self.mail_from)
            .field("brand", &self.brand)
            .field("store_admin_email", &self.store_admin_email)
            .field("migrate", &self.migrate)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub rates: Arc<dyn RatesService>,
    pub products: Arc<dyn ProductsService>,
    pub promocodes: Arc<dyn PromoCodesService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
    pub auth: Arc<dyn AuthService>,
    pub database: Arc<dyn DatabaseProbe>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Connect to the database, start the notification outbox and build every service.
    ///
    /// The returned handle completes once every notifier clone has been dropped.
    ///
    /// # Errors
    ///
    /// Returns an error when the database is unreachable, a migration fails, the signing
    /// secret is unusable or the payment client cannot be built.
    pub async fn from_settings(
        settings: AppSettings,
    ) -> Result<(Self, JoinHandle<()>), AppInitError> {
        let pool = database::connect(&settings.database_url)
            .await
            .map_err(AppInitError::Database)?;

        if settings.migrate {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;

            info!("database migrations applied");
        }

        let tokens = TokenIssuer::new(&settings.jwt_secret).map_err(AppInitError::Token)?;

        let gateway = match settings.razorpay {
            Some(config) => {
                let client = RazorpayClient::new(config).map_err(AppInitError::Gateway)?;
                Some(Arc::new(client) as Arc<dyn PaymentGateway>)
            }
            None => {
                info!("razorpay is not configured; checkout is disabled");
                None
            }
        };

        let (notifier, outbox) = spawn_outbox(
            Arc::new(LogMailer::new(settings.mail_from)),
            MailSettings {
                brand: settings.brand,
                store_admin_email: settings.store_admin_email,
            },
        );

        let notifier: Arc<dyn Notifier> = Arc::new(notifier);
        let db = Db::new(pool.clone());

        let context = Self {
            users: Arc::new(PgUsersService::new(db.clone())),
            rates: Arc::new(PgRatesService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            promocodes: Arc::new(PgPromoCodesService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), Arc::clone(&notifier))),
            payments: Arc::new(PgPaymentsService::new(
                db.clone(),
                gateway,
                Arc::clone(&notifier),
            )),
            auth: Arc::new(PgAuthService::new(
                db,
                tokens,
                Arc::new(InMemoryOtpStore::new()),
                settings.auth,
                notifier,
            )),
            database: Arc::new(PgDatabaseProbe::new(pool)),
        };

        Ok((context, outbox))
    }
}
