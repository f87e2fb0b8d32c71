use clap::{Args, Subcommand};
use storefront_app::domain::{carts::records::ItemRemoval, products::records::ProductUuid};
use uuid::Uuid;

use super::{
    ServiceArgs,
    output::{print_cart, print_order},
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show a customer's cart
    Show(ShowArgs),

    /// Add units of a product to a cart
    AddItem(ItemArgs),

    /// Remove units of a product from a cart
    RemoveItem(ItemArgs),

    /// Apply a discount code to a cart
    ApplyDiscount(DiscountArgs),

    /// Remove a discount code from a cart
    RemoveDiscount(DiscountArgs),

    /// Turn a cart into an order
    Checkout(CheckoutArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    service: ServiceArgs,

    /// Email of the cart owner
    #[arg(long)]
    email: String,
}

#[derive(Debug, Args)]
pub(crate) struct ItemArgs {
    #[command(flatten)]
    service: ServiceArgs,

    /// Email of the cart owner
    #[arg(long)]
    email: String,

    /// Product UUID
    #[arg(long)]
    product: Uuid,

    /// Number of units
    #[arg(long, default_value_t = 1)]
    quantity: u64,
}

#[derive(Debug, Args)]
pub(crate) struct DiscountArgs {
    #[command(flatten)]
    service: ServiceArgs,

    /// Email of the cart owner
    #[arg(long)]
    email: String,

    /// Discount code
    #[arg(long)]
    code: String,
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    #[command(flatten)]
    service: ServiceArgs,

    /// Email of the cart owner
    #[arg(long)]
    email: String,

    /// Payment status of the new order (paid, unpaid)
    #[arg(long)]
    payment_status: String,
}

pub(crate) async fn run(command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show(args) => show(args).await,
        CartSubcommand::AddItem(args) => add_item(args).await,
        CartSubcommand::RemoveItem(args) => remove_item(args).await,
        CartSubcommand::ApplyDiscount(args) => apply_discount(args).await,
        CartSubcommand::RemoveDiscount(args) => remove_discount(args).await,
        CartSubcommand::Checkout(args) => checkout(args).await,
    }
}

async fn show(args: ShowArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    let cart = ctx
        .carts
        .get_cart(&args.service.caller(), &args.email)
        .await
        .map_err(|error| format!("failed to load cart: {error}"))?;

    print_cart(&cart);

    Ok(())
}

async fn add_item(args: ItemArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    let item = ctx
        .carts
        .add_cart_item(
            &args.service.caller(),
            &args.email,
            ProductUuid::from_uuid(args.product),
            args.quantity,
        )
        .await
        .map_err(|error| format!("failed to add item: {error}"))?;

    println!("product: {}", item.product.name);
    println!("quantity: {}", item.quantity);
    println!("total_price: {}", item.total_price());

    Ok(())
}

async fn remove_item(args: ItemArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    let removal = ctx
        .carts
        .remove_cart_item(
            &args.service.caller(),
            &args.email,
            ProductUuid::from_uuid(args.product),
            args.quantity,
        )
        .await
        .map_err(|error| format!("failed to remove item: {error}"))?;

    match removal {
        ItemRemoval::Removed => println!("removed product {}", args.product),
        ItemRemoval::Updated(item) => {
            println!("product: {}", item.product.name);
            println!("quantity: {}", item.quantity);
        }
    }

    Ok(())
}

async fn apply_discount(args: DiscountArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    let cart = ctx
        .carts
        .add_discount_code(&args.service.caller(), &args.email, &args.code)
        .await
        .map_err(|error| format!("failed to apply discount code: {error}"))?;

    print_cart(&cart);

    Ok(())
}

async fn remove_discount(args: DiscountArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    let cart = ctx
        .carts
        .remove_discount_code(&args.service.caller(), &args.email, &args.code)
        .await
        .map_err(|error| format!("failed to remove discount code: {error}"))?;

    print_cart(&cart);

    Ok(())
}

async fn checkout(args: CheckoutArgs) -> Result<(), String> {
    let ctx = args.service.context().await?;

    let order = ctx
        .carts
        .convert_cart_to_order(&args.service.caller(), &args.email, &args.payment_status)
        .await
        .map_err(|error| format!("failed to place order: {error}"))?;

    print_order(&order);

    Ok(())
}
