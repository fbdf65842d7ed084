use anyhow::{Result, anyhow};
use nudge_bot::config::Config;
use nudge_bot::database::connection::DatabaseManager;
use nudge_bot::database::models::Person;
use nudge_bot::utils::validation::{parse_chat_id, validate_person_name};
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize basic logging for the migration
    env_logger::init();
    dotenvy::dotenv().ok();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "add-user" => add_user(&args[2..]).await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Nudge Bot - Database Migration Tool");
    println!("======================================");

    let database_url = Config::database_url_from_env();
    println!("📊 Database URL: {}", mask_url(&database_url));

    ensure_sqlite_directory(&database_url)?;

    println!("🚀 Running database migrations...");

    let db_manager = DatabaseManager::new(&database_url).await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    match db_manager.run_migrations().await {
        Ok(_) => {
            println!("✅ Migrations completed successfully!");
            println!("\n🎯 Your Nudge Bot database is ready!");
        }
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let database_url = Config::database_url_from_env();
    println!("📊 Database URL: {}", mask_url(&database_url));

    let db_manager = DatabaseManager::new(&database_url).await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    // Try to query the database to check if tables exist
    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in tables {
                println!("  • {table}");
            }
            match Person::count(&db_manager.pool).await {
                Ok(count) => println!("👥 Registered people: {count}"),
                Err(e) => println!("⚠️  Could not count people: {e}"),
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL people, cooldowns and wake logs!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let database_url = Config::database_url_from_env();

    // For SQLite, we can just delete the file
    match sqlite_path(&database_url) {
        Some(db_path) => {
            if Path::new(db_path).exists() {
                std::fs::remove_file(db_path)?;
                println!("🗑️  Deleted database file: {db_path}");
            }
        }
        None => return Err(anyhow!("Reset is only supported for SQLite databases")),
    }

    // Run migrations to recreate the schema
    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");

    Ok(())
}

async fn add_user(args: &[String]) -> Result<()> {
    let (name, chat_id) = match args {
        [name, chat_id, ..] => (name.trim(), chat_id.trim()),
        _ => {
            print_help();
            return Err(anyhow!("add-user needs a name and a chat id"));
        }
    };
    let tracking_token = args.get(2).map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

    validate_person_name(name)?;
    let chat_id = parse_chat_id(chat_id)?;

    let database_url = Config::database_url_from_env();
    ensure_sqlite_directory(&database_url)?;
    let db_manager = DatabaseManager::new(&database_url).await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;
    db_manager.run_migrations().await?;

    if Person::find_by_name(&db_manager.pool, name).await?.is_some() {
        return Err(anyhow!("A person named '{}' already exists", name));
    }

    let person = Person::create(&db_manager.pool, name, Some(chat_id.to_string()), tracking_token).await?;
    println!(
        "✅ Added {} (chat {}, Toggl {})",
        person.name,
        chat_id,
        if person.tracking_token.is_some() { "linked" } else { "not linked" }
    );

    Ok(())
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name"
    )
    .fetch_all(&db_manager.pool)
    .await?;

    Ok(tables)
}

fn sqlite_path(url: &str) -> Option<&str> {
    url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))
}

fn ensure_sqlite_directory(url: &str) -> Result<()> {
    if let Some(db_path) = sqlite_path(url) {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                println!("📁 Creating directory: {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}

fn mask_url(url: &str) -> String {
    // Simple URL masking for security (don't show full paths in production)
    match sqlite_path(url).and_then(|path| Path::new(path).file_name()) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("⏰ Nudge Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up                               Run database migrations (default)");
    println!("    check                                     Check database connection and schema");
    println!("    reset                                     Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    add-user <name> <chat_id> [toggl_token]   Register someone who can be woken");
    println!("    help                                      Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: sqlite:./data/nudge.db)");
    println!();
    println!("EXAMPLES:");
    println!("    migrate                              # Run migrations");
    println!("    migrate add-user alice 123456789     # Register alice");
    println!("    migrate check                        # Check database status");
    println!();
}
