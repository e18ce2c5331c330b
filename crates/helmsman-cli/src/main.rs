use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use helmsman_cli::seeder::{self, SeedConfig};
use helmsman_core::hash_password;
use helmsman_core::permissions::roles;
use helmsman_db::{MIGRATOR, PgPool, init_db_pool};

#[derive(Parser)]
#[command(name = "helmsman-cli")]
#[command(about = "Helmsman CLI - Administrative tools for the Helmsman API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create an administrator account
    CreateAdmin {
        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake formations, cours, formateurs, agents and sessions
    Seed {
        /// Number of formations to create
        #[arg(short = 'f', long, default_value = "8")]
        formations: usize,

        /// Number of cours per formation
        #[arg(long, default_value = "4")]
        cours: usize,

        /// Number of formateurs
        #[arg(long, default_value = "12")]
        formateurs: usize,

        /// Number of agents
        #[arg(short = 'a', long, default_value = "150")]
        agents: usize,

        /// Number of sessions per formation
        #[arg(short = 's', long, default_value = "3")]
        sessions: usize,

        /// Share of each session's seats to fill, in percent
        #[arg(long, default_value = "70", value_parser = clap::value_parser!(u8).range(0..=100))]
        fill: u8,
    },
    /// Clear all training data (keeps users, roles and permissions)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let pool = init_db_pool().await?;

    match command {
        Commands::Migrate => {
            MIGRATOR
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            println!("✅ Migrations applied");
        }
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => handle_create_admin(&pool, name, email, password).await?,
        Commands::Seed {
            formations,
            cours,
            formateurs,
            agents,
            sessions,
            fill,
        } => {
            let config = SeedConfig {
                formations,
                cours_per_formation: cours,
                formateurs,
                agents,
                sessions_per_formation: sessions,
                fill_percent: fill,
            };
            seeder::seed_all(&pool, &config)
                .await
                .context("Error seeding database")?;
        }
        Commands::ClearSeed => seeder::clear_all(&pool)
            .await
            .context("Error clearing seeded data")?,
    }

    Ok(())
}

async fn handle_create_admin(
    pool: &PgPool,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email: String = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };
    let email = email.trim().to_lowercase();

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    create_admin(pool, &name, &email, &password).await?;

    println!("\n✅ Administrator created successfully!");
    println!("   Email: {}", email);
    println!("   Name: {}", name);
    Ok(())
}

async fn create_admin(db: &PgPool, name: &str, email: &str, password: &str) -> anyhow::Result<()> {
    let hashed_password = hash_password(password).map_err(|e| e.error)?;

    let inserted = sqlx::query_scalar::<_, uuid::Uuid>(
        "INSERT INTO users (name, email, role, password_hash, email_verified)
         VALUES ($1, $2, $3, $4, TRUE)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(roles::ADMIN)
    .bind(&hashed_password)
    .fetch_optional(db)
    .await?;

    if inserted.is_none() {
        bail!("A user with email {} already exists", email);
    }

    Ok(())
}
