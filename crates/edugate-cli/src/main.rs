use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use uuid::Uuid;

use edugate_audit::{Auditor, PgDenialStore};
use edugate_authz::{Action, LenientMatrix, Module, Role, StrictMatrix};
use edugate_cli::report;
use edugate_config::AuditConfig;

#[derive(Parser)]
#[command(name = "edugate-cli")]
#[command(about = "Edugate CLI - Inspect authorization rules and denials", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List roles with their rank and home portal
    Roles,
    /// Show the lenient permission projection for a role
    Matrix {
        /// Role name or alias
        #[arg(short = 'r', long)]
        role: String,
    },
    /// Evaluate a single role/module/action triple
    Check {
        #[arg(short = 'r', long)]
        role: String,

        #[arg(short = 'm', long)]
        module: String,

        #[arg(short = 'a', long, default_value = "read")]
        action: String,

        /// Use the strict matrix instead of the lenient one
        #[arg(long)]
        strict: bool,
    },
    /// Report every entry where the lenient and strict matrices disagree
    Lint,
    /// Show recent authorization denials for a tenant
    Denials {
        #[arg(short = 't', long)]
        tenant: Uuid,

        /// Only denials for this user
        #[arg(short = 'u', long)]
        user: Option<Uuid>,

        #[arg(short = 'l', long)]
        limit: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<ExitCode> {
    let lenient = LenientMatrix::builtin();
    let strict = StrictMatrix::builtin();

    match command {
        Commands::Roles => print!("{}", report::roles()),
        Commands::Matrix { role } => {
            let role = Role::normalize(&role)?;
            print!("{}", report::matrix(&lenient, role));
        }
        Commands::Check {
            role,
            module,
            action,
            strict: use_strict,
        } => {
            let role = Role::normalize(&role)?;
            let module: Module = module.parse()?;
            let action: Action = action.parse()?;

            let allowed = report::check(&lenient, &strict, role, module, action, use_strict);
            let path = if use_strict { "strict" } else { "lenient" };
            println!(
                "{} {role} {action} {module} ({path})",
                if allowed { "✅ allowed" } else { "⛔ denied" }
            );
            if !allowed {
                return Ok(ExitCode::from(2));
            }
        }
        Commands::Lint => {
            let drifts = report::lint(&lenient, &strict);
            if drifts.is_empty() {
                println!("✅ Lenient and strict matrices agree");
            } else {
                for drift in &drifts {
                    println!("{drift}");
                }
                eprintln!("❌ {} disagreements", drifts.len());
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Denials {
            tenant,
            user,
            limit,
        } => {
            let pool = edugate_db::init_db_pool().await?;
            let auditor = Auditor::new(Arc::new(PgDenialStore::new(pool)), AuditConfig::from_env());

            let records = match user {
                Some(user_id) => auditor.for_user(tenant, user_id, limit).await?,
                None => auditor.recent(tenant, limit).await?,
            };
            print!("{}", report::denials(&records));
        }
    }

    Ok(ExitCode::SUCCESS)
}
