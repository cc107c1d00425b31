//! Load the demo users and projects into the configured database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use devmatch::domain::DemoDataSeeder;
use devmatch::outbound::auth::{JwtTokenIssuer, TokenLifetimes};
use devmatch::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use devmatch::server::{Repositories, build_http_state};
use mockable::DefaultClock;
use rand::RngCore;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

/// `seed-demo-data` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-demo-data",
    about = "Create the demo developers and projects; existing ones are left alone",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `DEVMATCH_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Skip applying pending migrations first.
    #[arg(long = "skip-migrations")]
    skip_migrations: bool,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(error = %e, "tracing init failed");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url)?;

    if !args.skip_migrations {
        run_migrations(&database_url)
            .await
            .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    }
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_connections(2))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let repositories = Repositories::diesel(&pool);
    let identities = repositories.identities.clone();
    let projects = repositories.projects.clone();
    let state = build_http_state(
        repositories,
        Arc::new(throwaway_issuer()),
        Arc::new(DefaultClock),
    );

    let seeder = DemoDataSeeder::new(
        state.accounts,
        state.auth,
        identities,
        projects,
        Arc::new(DefaultClock),
    );
    let outcome = seeder
        .seed()
        .await
        .map_err(|error| io::Error::other(format!("seed demo data: {error}")))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "users_created={}", outcome.users_created)?;
    writeln!(stdout, "users_existing={}", outcome.users_existing)?;
    writeln!(stdout, "projects_created={}", outcome.projects_created)?;
    writeln!(stdout, "projects_existing={}", outcome.projects_existing)
}

/// Seeding never hands out tokens, so the signing key is random.
fn throwaway_issuer() -> JwtTokenIssuer {
    let mut secret = Zeroizing::new(vec![0_u8; 32]);
    rand::thread_rng().fill_bytes(&mut secret);
    JwtTokenIssuer::new(&secret, TokenLifetimes::default(), Arc::new(DefaultClock))
}

fn resolve_database_url(cli_value: Option<String>) -> io::Result<String> {
    cli_value
        .or_else(|| env::var("DEVMATCH_DATABASE_URL").ok())
        .or_else(|| env::var("DATABASE_URL").ok())
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            io::Error::other("database URL missing: pass --database-url or set DATABASE_URL")
        })
}
