use clap::Args;
use jiff::Timestamp;
use karat::material::Material;
use karat_app::{
    database::{self, Db},
    domain::rates::{
        PgRatesService, RatesService,
        models::{NewMaterialRate, RateUuid},
    },
};
use rust_decimal::Decimal;
use serde_json::Value;

#[derive(Debug, Args)]
pub(crate) struct AddRateArgs {
    /// Material kind: gold, silver or diamond
    #[arg(long)]
    material: String,

    /// Carat, purity or diamond type UUID
    #[arg(long)]
    material_type: String,

    /// Price per gram (per carat for diamonds) in rupees
    #[arg(long)]
    rate: Decimal,

    /// When the rate takes effect; defaults to now
    #[arg(long)]
    effective_at: Option<Timestamp>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: AddRateArgs) -> Result<(), String> {
    let material = Material::from_parts(
        Some(&args.material),
        Some(&Value::String(args.material_type)),
    )
    .map_err(|error| format!("invalid material: {error}"))?;

    if material == Material::None {
        return Err("a rate needs a material".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let rate = PgRatesService::new(Db::new(pool))
        .create_rate(NewMaterialRate {
            uuid: RateUuid::new(),
            material,
            rate: args.rate,
            effective_at: args.effective_at,
        })
        .await
        .map_err(|error| format!("failed to record rate: {error}"))?;

    println!("rate_uuid: {}", rate.uuid);
    println!("material: {}", rate.material.label().unwrap_or_default());
    println!("rate: {}", rate.rate);
    println!("effective_at: {}", rate.effective_at);

    Ok(())
}
