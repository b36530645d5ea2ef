use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fusebox::cli::create_superadmin;
use fusebox::config::database::init_db_pool;
use fusebox::config::seed::SeedConfig;
use fusebox::modules::rbac::seed;
use fusebox::router::init_router;
use fusebox::state::init_app_state;

#[derive(Parser)]
#[command(name = "fusebox")]
#[command(about = "Fusebox API - role-gated dashboard backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default when no subcommand is given)
    Serve,
    /// Create a Super-Admin account with the full default grant set
    CreateSuperadmin {
        /// Login name
        #[arg(short = 'u', long)]
        username: String,

        /// Email address
        #[arg(short = 'e', long)]
        email: String,

        /// Password
        #[arg(short = 'p', long)]
        password: String,

        /// Display name
        #[arg(short = 'f', long)]
        full_name: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::CreateSuperadmin {
            username,
            email,
            password,
            full_name,
        }) => handle_create_superadmin(username, email, password, full_name).await,
        Some(Commands::Serve) | None => run_server().await,
    }
}

async fn run_server() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = init_app_state().await;

    seed::initialize(&state.db, &state.seed_config)
        .await
        .expect("Failed to apply authorization seed");

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    axum::serve(listener, app).await.unwrap();
}

async fn handle_create_superadmin(
    username: String,
    email: String,
    password: String,
    full_name: Option<String>,
) {
    let db = init_db_pool().await;

    sqlx::migrate!()
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    let seed_config = SeedConfig::from_env();

    match create_superadmin(
        &db,
        &seed_config,
        &username,
        &email,
        &password,
        full_name.as_deref(),
    )
    .await
    {
        Ok(_) => {
            println!("✅ Super-Admin created successfully!");
            println!("   Username: {}", username);
            println!("   Email: {}", email);
        }
        Err(e) => {
            eprintln!("❌ Error creating Super-Admin: {}", e);
            std::process::exit(1);
        }
    }
}
