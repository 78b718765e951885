use clap::Parser;
use db_connect::{connect, ConnectionParams, EnvConfig};
use migration_engine::{apply_pending, revert_last, status, FileMigrationSource};
use tracing_subscriber::EnvFilter;

/// Where migration files live, relative to the working directory.
const MIGRATIONS_DIR: &str = "db/migrations";

#[derive(Parser)]
#[command(name = "migration")]
#[command(about = "Applies pending SQL migrations from db/migrations")]
struct Args {
    /// Migration command to run: up | down | status
    #[arg(default_value = "up")]
    command: String,
}

enum Command {
    Up,
    Down,
    Status,
}

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("migration=info,migration_engine=info,db_connect=info"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter(env_filter)
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let command = match args.command.as_str() {
        "up" => Command::Up,
        "down" => Command::Down,
        "status" => Command::Status,
        other => {
            eprintln!("Unknown command: {other}. Use: up | down | status");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(command).await {
        // The failure message goes to stdout; the exit status carries the error.
        println!("Migration failed: {e}");
        std::process::exit(1);
    }

    println!("Migration finished ...");
}

async fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    println!("Setup db connection for migrations ...");
    let env = EnvConfig::from_env();
    let mut client = connect(&ConnectionParams::default(), &env).await?;

    let source = FileMigrationSource::new(MIGRATIONS_DIR);
    match command {
        Command::Up => {
            let applied = apply_pending(&mut client, &source).await?;
            println!("{applied} new migrations applied");
        }
        Command::Down => {
            let reverted = revert_last(&mut client, &source).await?;
            println!("{reverted} migrations reverted");
        }
        Command::Status => {
            for entry in status(&client, &source).await? {
                let state = if entry.applied { "applied" } else { "pending" };
                println!("{state:<8} {}", entry.file_name);
            }
        }
    }

    Ok(())
}
