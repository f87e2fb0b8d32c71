use clap::{Args, Parser, Subcommand};
use storefront_app::{
    auth::Caller,
    config::{CallerArgs, CheckoutConfig, DatabaseConfig, LoggingConfig},
    context::AppContext,
};

mod cart;
mod customer;
mod db;
mod discount;
mod order;
mod output;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Customer(customer::CustomerCommand),
    Discount(discount::DiscountCommand),
    Cart(cart::CartCommand),
    Order(order::OrderCommand),
}

impl Cli {
    pub(crate) fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Customer(command) => customer::run(command).await,
            Commands::Discount(command) => discount::run(command).await,
            Commands::Cart(command) => cart::run(command).await,
            Commands::Order(command) => order::run(command).await,
        }
    }
}

/// Connection, checkout and caller settings shared by every service command.
#[derive(Debug, Args)]
pub(crate) struct ServiceArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    checkout: CheckoutConfig,

    #[command(flatten)]
    caller: CallerArgs,
}

impl ServiceArgs {
    pub(crate) fn caller(&self) -> Caller {
        self.caller.caller()
    }

    pub(crate) async fn context(&self) -> Result<AppContext, String> {
        AppContext::from_database_url(&self.database.database_url, self.checkout)
            .await
            .map_err(|error| format!("failed to initialise application: {error}"))
    }
}
