use clap::{Args, Subcommand};
use storefront_app::domain::orders::records::OrderUuid;
use uuid::Uuid;

use super::{ServiceArgs, output::print_order};

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Show a single order
    Show(OrderArgs),

    /// List a customer's orders
    List(ListArgs),

    /// Mark an unpaid order as paid
    Pay(OrderArgs),

    /// Delete an order
    Delete(OrderArgs),
}

#[derive(Debug, Args)]
pub(crate) struct OrderArgs {
    #[command(flatten)]
    service: ServiceArgs,

    /// Order UUID
    #[arg(long)]
    order: Uuid,
}

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    service: ServiceArgs,

    /// Email of the customer
    #[arg(long)]
    email: String,
}

pub(crate) async fn run(command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::Show(args) => show(args).await,
        OrderSubcommand::List(args) => list(args).await,
        OrderSubcommand::Pay(args) => pay(args).await,
        OrderSubcommand::Delete(args) => delete(args).await,
    }
}

async fn show(args: OrderArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    let order = ctx
        .orders
        .get_order(&args.service.caller(), OrderUuid::from_uuid(args.order))
        .await
        .map_err(|error| format!("failed to load order: {error}"))?;

    print_order(&order);

    Ok(())
}

async fn list(args: ListArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    let orders = ctx
        .orders
        .list_customer_orders(&args.service.caller(), &args.email)
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if orders.is_empty() {
        println!("no orders found for {}", args.email);
        return Ok(());
    }

    for order in orders {
        print_order(&order);
        println!();
    }

    Ok(())
}

async fn pay(args: OrderArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    let order = ctx
        .orders
        .pay_order(&args.service.caller(), OrderUuid::from_uuid(args.order))
        .await
        .map_err(|error| format!("failed to pay order: {error}"))?;

    print_order(&order);

    Ok(())
}

async fn delete(args: OrderArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    ctx.orders
        .delete_order(&args.service.caller(), OrderUuid::from_uuid(args.order))
        .await
        .map_err(|error| format!("failed to delete order: {error}"))?;

    println!("deleted order: {}", args.order);

    Ok(())
}
