use anyhow::Result;
use authgate::application::{
    ports::{
        authorization_code::AuthorizationCodeStore,
        client_registry::ClientRegistry,
        security::{AccessTokenIssuer, SecretGenerator, SecretHasher},
        ticket_store::TicketStore,
        time::Clock,
        token_store::TokenStore,
    },
    services::ApplicationServices,
};
use authgate::config::AppConfig;
use authgate::infrastructure::{
    security::{
        authorization_code_store::InMemoryAuthorizationCodeStore,
        client_registry::InMemoryClientRegistry,
        random::OsRngSecretGenerator,
        redis_store::{self, RedisAuthorizationCodeStore, RedisTicketStore, RedisTokenStore},
        secret_hasher::Argon2SecretHasher,
        ticket_store::InMemoryTicketStore,
        token::BiscuitAccessTokenIssuer,
        token_store::InMemoryTokenStore,
    },
    time::SystemClock,
};
use authgate::presentation::http::{
    routes::{RouterOptions, build_router},
    state::HttpState,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

struct Stores {
    tickets: Arc<dyn TicketStore>,
    codes: Arc<dyn AuthorizationCodeStore>,
    tokens: Arc<dyn TokenStore>,
}

fn build_stores(config: &AppConfig) -> Result<Stores> {
    if let Some(url) = config.redis_url() {
        let pool = redis_store::create_pool(url)?;
        tracing::info!("using redis-backed stores");
        return Ok(Stores {
            tickets: Arc::new(RedisTicketStore::new(pool.clone())),
            codes: Arc::new(RedisAuthorizationCodeStore::new(pool.clone())),
            tokens: Arc::new(RedisTokenStore::new(pool)),
        });
    }

    tracing::info!("using in-memory stores");
    Ok(Stores {
        tickets: Arc::new(InMemoryTicketStore::new()),
        codes: Arc::new(InMemoryAuthorizationCodeStore::new()),
        tokens: Arc::new(InMemoryTokenStore::new()),
    })
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let secret_hasher: Arc<dyn SecretHasher> = Arc::new(Argon2SecretHasher);
    let registry =
        InMemoryClientRegistry::from_seeds(config.clients(), secret_hasher.as_ref()).await?;
    if registry.is_empty() {
        tracing::warn!("no OAuth clients configured; set OAUTH_CLIENTS");
    } else {
        tracing::info!(clients = registry.len(), "client registry loaded");
    }
    let client_registry: Arc<dyn ClientRegistry> = Arc::new(registry);

    let access_tokens: Arc<dyn AccessTokenIssuer> = Arc::new(BiscuitAccessTokenIssuer::new(
        config.biscuit_private_key(),
        config.issuer(),
    )?);
    let generator: Arc<dyn SecretGenerator> = Arc::new(OsRngSecretGenerator);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let stores = build_stores(&config)?;

    let policy = config.service_policy();
    let services = Arc::new(ApplicationServices::new(
        stores.tickets,
        stores.codes,
        stores.tokens,
        client_registry,
        secret_hasher,
        access_tokens,
        generator,
        clock,
        policy,
    ));

    let sweeper = services.sweeper().spawn(config.sweep_interval());

    let state = HttpState {
        services: Arc::clone(&services),
        issuer: Arc::from(config.issuer()),
        introspection_key: config.introspection_api_key().map(Arc::from),
        allow_plain_pkce: policy.allow_plain_pkce,
    };

    let app = build_router(
        state,
        &RouterOptions {
            allowed_origins: config.allowed_origins().to_vec(),
            rate_limit: config.rate_limit_enabled(),
        },
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweeper.abort();
    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
