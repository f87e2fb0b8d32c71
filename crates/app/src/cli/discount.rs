use clap::{Args, Subcommand};
use jiff::Timestamp;
use rust_decimal::Decimal;
use storefront_app::domain::discounts::{
    data::NewDiscountCode,
    records::{DiscountCode, DiscountCodeUuid, DiscountKind},
};

use super::ServiceArgs;

#[derive(Debug, Args)]
pub(crate) struct DiscountCommand {
    #[command(subcommand)]
    command: DiscountSubcommand,
}

#[derive(Debug, Subcommand)]
enum DiscountSubcommand {
    /// Create a discount code
    Create(CreateArgs),

    /// Switch a discount code on
    Activate(ToggleArgs),

    /// Switch a discount code off
    Deactivate(ToggleArgs),
}

#[derive(Debug, Args)]
pub(crate) struct CreateArgs {
    #[command(flatten)]
    service: ServiceArgs,

    /// Code customers enter at checkout
    #[arg(long)]
    code: String,

    /// Discount kind (fixed, percentage)
    #[arg(long)]
    kind: DiscountKind,

    /// Amount in minor units for fixed codes, percent for percentage codes
    #[arg(long)]
    value: Decimal,

    /// Expiration timestamp, e.g. 2030-01-01T00:00:00Z
    #[arg(long)]
    expires_at: Timestamp,

    /// Create the code switched off
    #[arg(long)]
    inactive: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ToggleArgs {
    #[command(flatten)]
    service: ServiceArgs,

    /// Discount code
    #[arg(long)]
    code: String,
}

pub(crate) async fn run(command: DiscountCommand) -> Result<(), String> {
    match command.command {
        DiscountSubcommand::Create(args) => create(args).await,
        DiscountSubcommand::Activate(args) => toggle(args, true).await,
        DiscountSubcommand::Deactivate(args) => toggle(args, false).await,
    }
}

async fn create(args: CreateArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    let code = ctx
        .discount_codes
        .create_discount_code(
            &args.service.caller(),
            NewDiscountCode {
                uuid: DiscountCodeUuid::new(),
                code: args.code,
                kind: args.kind,
                value: args.value,
                expiration_date: args.expires_at,
                is_active: !args.inactive,
            },
        )
        .await
        .map_err(|error| format!("failed to create discount code: {error}"))?;

    print_code(&code);

    Ok(())
}

async fn toggle(args: ToggleArgs, active: bool) -> Result<(), String> {
    let ctx = args.service.context().await?;

    let code = ctx
        .discount_codes
        .set_discount_code_active(&args.service.caller(), &args.code, active)
        .await
        .map_err(|error| format!("failed to update discount code: {error}"))?;

    print_code(&code);

    Ok(())
}

fn print_code(code: &DiscountCode) {
    println!("code: {}", code.code);
    println!("kind: {}", code.kind());
    println!("value: {}", code.value.as_decimal());
    println!("expiration_date: {}", code.expiration_date);
    println!("is_active: {}", code.is_active);
}
