use std::process::ExitCode;

use anyhow::Context;
use bookstore_cli::admin::{NewAdmin, create_admin};
use bookstore_cli::seeder::{self, SeedConfig};
use bookstore_db::{PgPool, init_db_pool, revert_migrations, run_migrations};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "bookstore-cli")]
#[command(about = "Bookstore CLI - Administrative tools for the Bookstore API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply or revert database migrations
    Migrate {
        #[command(subcommand)]
        direction: MigrateDirection,
    },
    /// Create an administrator account
    CreateAdmin {
        /// Login name
        #[arg(short = 'u', long)]
        user_name: Option<String>,

        #[arg(short = 'f', long)]
        first_name: Option<String>,

        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake authors, categories and books
    Seed {
        #[arg(long, default_value = "20")]
        authors: usize,

        #[arg(long, default_value = "8")]
        categories: usize,

        #[arg(long, default_value = "100")]
        books: usize,
    },
    /// Delete all books, authors and categories (keeps users)
    ClearSeed,
}

#[derive(Subcommand)]
enum MigrateDirection {
    /// Apply all pending migrations
    Up,
    /// Revert the most recent migrations
    Down {
        /// Number of migrations to revert
        #[arg(short = 's', long, default_value = "1")]
        steps: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = init_db_pool()
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Migrate { direction } => handle_migrate(&pool, direction).await,
        Commands::CreateAdmin {
            user_name,
            first_name,
            last_name,
            password,
        } => handle_create_admin(&pool, user_name, first_name, last_name, password).await,
        Commands::Seed {
            authors,
            categories,
            books,
        } => {
            let config = SeedConfig {
                authors,
                categories,
                books,
            };
            seeder::seed_all(&pool, &config).await?;
            println!("✅ Database seeded");
            Ok(())
        }
        Commands::ClearSeed => {
            seeder::clear_catalogue(&pool).await?;
            println!("✅ Catalogue cleared");
            Ok(())
        }
    }
}

async fn handle_migrate(pool: &PgPool, direction: MigrateDirection) -> anyhow::Result<()> {
    match direction {
        MigrateDirection::Up => {
            run_migrations(pool).await?;
            println!("✅ Migrations applied");
        }
        MigrateDirection::Down { steps } => {
            let version = revert_migrations(pool, steps).await?;
            println!("✅ Reverted {steps} migration(s), schema now at version {version}");
        }
    }
    Ok(())
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Failed to read {}", label.to_lowercase())),
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    user_name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let user_name = prompt(user_name, "User name")?;
    let first_name = prompt(first_name, "First name")?;
    let last_name = prompt(last_name, "Last name")?;
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    let id = create_admin(
        pool,
        NewAdmin {
            user_name: &user_name,
            first_name: &first_name,
            last_name: &last_name,
            password: &password,
        },
    )
    .await?;

    println!("\n✅ Admin created successfully!");
    println!("   ID: {id}");
    println!("   User name: {user_name}");
    println!("   Name: {first_name} {last_name}");
    Ok(())
}
