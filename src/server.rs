use crate::config::Config;
use crate::{routes, state};
use anyhow::Context;
use sqlx::migrate::Migrator;
use sqlx::sqlite;
use std::path::Path;
use std::str::FromStr;
use tokio::{net::TcpListener, signal, task::JoinSet};
use tokio_util::sync::CancellationToken;

pub(crate) static MIGRATOR: Migrator = sqlx::migrate!();

async fn connect_database(dir: &Path) -> anyhow::Result<sqlx::SqlitePool> {
    let path = dir.join("registrar.db");
    if !path.exists() {
        std::fs::File::create(&path).with_context(|| {
            format!("Failed to create SQLite database file: {}", path.display())
        })?;
    }
    let database_url = format!(
        "sqlite:///{}?mode=rwc",
        path.to_str()
            .context("Database path is not valid UTF-8")?
            .trim_start_matches(r"\\?\")
    );

    let options = sqlite::SqliteConnectOptions::from_str(&database_url)
        .with_context(|| format!("Failed to parse SQLite url: '{}'", database_url))?;
    let pool = sqlx::SqlitePool::connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to SQLite database: {}", path.display()))?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

pub async fn run_until_done(config: &Config, bind: TcpListener) -> anyhow::Result<()> {
    let mut join_set: JoinSet<anyhow::Result<()>> = JoinSet::new();
    let shutdown_signal = CancellationToken::new();
    // axum serve
    {
        let shutdown_signal = shutdown_signal.clone();
        let dir = config.database.parse_dir()?;
        let admin = config.admin.clone();
        join_set.spawn(async move {
            let pool = connect_database(&dir).await?;
            let state = state::AppState::build(pool, admin);
            let routes = routes::build().with_state(state);
            axum::serve(bind, routes.into_make_service())
                .with_graceful_shutdown(async move {
                    shutdown_signal.cancelled().await;
                })
                .await?;
            Ok(())
        });
    }
    // register ctrl+c signal
    {
        let shutdown_signal = shutdown_signal.clone();
        join_set.spawn(async move {
            let _ = signal::ctrl_c().await;
            shutdown_signal.cancel();
            Ok(())
        });
    }
    // register sigterm signal
    #[cfg(target_os = "linux")]
    {
        let shutdown_signal = shutdown_signal.clone();
        join_set.spawn(async move {
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
            let _ = sigterm.recv().await;
            tracing::debug!("Received SIGTERM signal, start terminating");
            shutdown_signal.cancel();
            Ok(())
        });
    }
    while let Some(r) = join_set.join_next().await {
        if shutdown_signal.is_cancelled() {
            join_set.shutdown().await;
            break;
        }
        match r {
            Ok(Ok(())) => (),
            Ok(Err(e)) => return Err(e),
            Err(e) => anyhow::bail!("Internal error in spawn: {e}"),
        }
    }
    Ok(())
}
