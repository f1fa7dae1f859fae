//! Test Helpers

use karat::{
    material::{GoldCarat, Material},
    pricing::WEIGHT_GRAMS_KEY,
    promo::DiscountType,
};
use rust_decimal::Decimal;
use serde_json::{Map, json};

use crate::{
    domain::{
        products::{
            ProductsService, ProductsServiceError,
            models::{NewProduct, PricedProduct, ProductUuid},
        },
        promocodes::models::{NewPromoCode, PromoCodeUuid},
        rates::{
            RatesService, RatesServiceError,
            models::{MaterialRate, NewMaterialRate, RateUuid},
        },
        users::{
            UsersServiceError,
            models::{NewUser, User, UserUuid},
            repository::PgUsersRepository,
        },
    },
    test::TestContext,
};

/// Accounts are only created through OTP signup, so tests insert them directly.
pub(crate) async fn create_user(ctx: &TestContext, email: &str) -> Result<User, UsersServiceError> {
    let mut tx = ctx.db.begin().await?;

    let user = PgUsersRepository::new()
        .create_user(
            &mut tx,
            &NewUser {
                uuid: UserUuid::new(),
                email: email.to_string(),
                full_name: "Test Customer".to_string(),
            },
        )
        .await?;

    tx.commit().await?;

    Ok(user)
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    product: NewProduct,
) -> Result<PricedProduct, ProductsServiceError> {
    ctx.products.create_product(product).await
}

/// A 5 g, 22 carat gold ring with ₹500 making cost and ₹100 other charges.
pub(crate) fn gold_ring(name: &str) -> NewProduct {
    let mut attributes = Map::new();
    attributes.insert(WEIGHT_GRAMS_KEY.to_string(), json!(5));

    NewProduct {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        slug: None,
        description: String::new(),
        making_cost: Some(Decimal::from(500)),
        other_charges: Some(Decimal::from(100)),
        stock: 10,
        material: Material::Gold {
            carat: GoldCarat::K22,
        },
        attributes,
        images: Vec::new(),
        is_active: true,
        is_featured: false,
        is_best_seller: false,
    }
}

pub(crate) async fn record_rate(
    ctx: &TestContext,
    material: Material,
    rate: i64,
) -> Result<MaterialRate, RatesServiceError> {
    ctx.rates
        .create_rate(NewMaterialRate {
            uuid: RateUuid::new(),
            material,
            rate: Decimal::from(rate),
            effective_at: None,
        })
        .await
}

/// An active fixed-amount promo with no limits or window.
pub(crate) fn fixed_promo(code: &str, amount: i64) -> NewPromoCode {
    NewPromoCode {
        uuid: PromoCodeUuid::new(),
        code: code.to_string(),
        description: String::new(),
        discount_type: DiscountType::Fixed,
        amount: Decimal::from(amount),
        max_discount: None,
        min_order_value: None,
        starts_at: None,
        ends_at: None,
        usage_limit: None,
        is_active: true,
    }
}
