use clap::{Args, Subcommand};
use storefront_app::{
    config::{CheckoutConfig, DatabaseConfig},
    context::AppContext,
    domain::customers::{data::NewCustomer, records::CustomerUuid},
};
use uuid::Uuid;

use super::ServiceArgs;

#[derive(Debug, Args)]
pub(crate) struct CustomerCommand {
    #[command(subcommand)]
    command: CustomerSubcommand,
}

#[derive(Debug, Subcommand)]
enum CustomerSubcommand {
    /// Register a customer and create their cart
    Register(RegisterArgs),

    /// Delete a customer and their cart
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub(crate) struct RegisterArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    checkout: CheckoutConfig,

    /// Customer email address
    #[arg(long)]
    email: String,

    /// Customer display name
    #[arg(long)]
    name: String,

    /// Optional customer UUID; generated when omitted
    #[arg(long)]
    customer_uuid: Option<Uuid>,
}

#[derive(Debug, Args)]
pub(crate) struct DeleteArgs {
    #[command(flatten)]
    service: ServiceArgs,

    /// Email of the customer to delete
    #[arg(long)]
    email: String,
}

pub(crate) async fn run(command: CustomerCommand) -> Result<(), String> {
    match command.command {
        CustomerSubcommand::Register(args) => register(args).await,
        CustomerSubcommand::Delete(args) => delete(args).await,
    }
}

async fn register(args: RegisterArgs) -> Result<(), String> {
    let ctx = AppContext::from_database_url(&args.database.database_url, args.checkout)
        .await
        .map_err(|error| format!("failed to initialise application: {error}"))?;

    let customer = ctx
        .customers
        .register_customer(NewCustomer {
            uuid: args
                .customer_uuid
                .map_or_else(CustomerUuid::new, CustomerUuid::from_uuid),
            email: args.email,
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to register customer: {error}"))?;

    println!("customer_uuid: {}", customer.uuid);
    println!("email: {}", customer.email);
    println!("name: {}", customer.name);

    Ok(())
}

async fn delete(args: DeleteArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    ctx.customers
        .delete_customer(&args.service.caller(), &args.email)
        .await
        .map_err(|error| format!("failed to delete customer: {error}"))?;

    println!("deleted customer: {}", args.email);

    Ok(())
}
