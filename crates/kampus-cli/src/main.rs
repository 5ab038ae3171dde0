use std::process;

use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use kampus_cli::{NewAdmin, clear_role, create_admin, set_role};
use kampus_db::{PgDirectory, init_db_pool, run_migrations};
use kampus_models::UserType;

#[derive(Parser)]
#[command(name = "kampus-cli")]
#[command(about = "Kampus CLI - Administrative tools for Kampus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a new administrator account
    CreateAdmin {
        /// First name of the administrator
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the administrator
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Attach or replace a user's profile
    SetRole {
        email: String,
        /// One of: student, teacher, admin
        #[arg(value_parser = parse_user_type)]
        user_type: UserType,
    },
    /// Remove a user's profile
    ClearRole { email: String },
}

fn parse_user_type(value: &str) -> Result<UserType, String> {
    value.parse()
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    kampus_observability::init_basic_console_logging();

    let cli = Cli::parse();

    let pool = match init_db_pool().await {
        Ok(pool) => pool,
        Err(e) => fail("Error connecting to database", e),
    };

    match cli.command {
        Commands::Migrate => match run_migrations(&pool).await {
            Ok(()) => println!("✅ Migrations applied"),
            Err(e) => fail("Error applying migrations", e),
        },
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        } => {
            let directory = PgDirectory::new(pool);
            let admin = NewAdmin {
                first_name: prompt_or(first_name, "First name"),
                last_name: prompt_or(last_name, "Last name"),
                email: prompt_or(email, "Email address"),
                password: password.unwrap_or_else(prompt_password),
            };
            match create_admin(&directory, admin).await {
                Ok(user) => {
                    println!("\n✅ Administrator created successfully!");
                    println!("   Email: {}", user.email);
                    println!("   Name: {}", user.full_name());
                }
                Err(e) => fail("Error creating administrator", e),
            }
        }
        Commands::SetRole { email, user_type } => {
            let directory = PgDirectory::new(pool);
            match set_role(&directory, &email, user_type).await {
                Ok(user) => println!("✅ {} is now {}", user.email, user_type),
                Err(e) => fail("Error setting role", e),
            }
        }
        Commands::ClearRole { email } => {
            let directory = PgDirectory::new(pool);
            match clear_role(&directory, &email).await {
                Ok(user) => println!("✅ Removed profile of {}", user.email),
                Err(e) => fail("Error clearing role", e),
            }
        }
    }
}

fn prompt_or(value: Option<String>, prompt: &str) -> String {
    value.unwrap_or_else(|| {
        Input::new()
            .with_prompt(prompt)
            .interact_text()
            .unwrap_or_else(|e| fail("Failed to read input", e))
    })
}

fn prompt_password() -> String {
    Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords don't match")
        .interact()
        .unwrap_or_else(|e| fail("Failed to read password", e))
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {}: {}", context, err);
    process::exit(1);
}
