use crate::clients::ConnectionRegistry;
use crate::config::Config;
use crate::engine::{IntakeDefaults, OrderLifecycleEngine};
use crate::gateway::ConnectionGateway;
use crate::router::{NotificationRouter, Transport};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Actor task failed: {0}")]
    ActorTask(#[from] tokio::task::JoinError),
}

/// The runtime orchestrator for the order relay.
///
/// `OrderSystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping both store actors and the sweeper
/// - **Dependency Wiring**: One [`Config`], one registry, one transport, shared by
///   the engine, the router and the gateway
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(Config::from_env()?, Arc::new(ChannelTransport::new()));
///
/// system.gateway.on_connect(event).await;
/// let created = system.engine.create_order(intake).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Order creation, transitions and reads
    pub engine: OrderLifecycleEngine,

    /// Direct access to the live-connection index
    pub registry: ConnectionRegistry,

    /// Connect/disconnect adapter for the transport layer
    pub gateway: ConnectionGateway,

    config: Config,

    /// Passive-expiry task, absent when sweeping is disabled
    sweeper: Option<JoinHandle<()>>,

    /// Store actor tasks (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl OrderSystem {
    /// Spawns both store actors and wires every component to them.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        // 1. Create the stores
        let (order_actor, order_store) = crate::order_actor::new(config.store_buffer);
        let (connection_actor, registry) =
            crate::connection_actor::new(config.store_buffer, config.connection_ttl);

        // 2. Start them
        let handles = vec![
            tokio::spawn(order_actor.run()),
            tokio::spawn(connection_actor.run()),
        ];

        // 3. Wire the components that share them
        let router = NotificationRouter::new(registry.clone(), transport);
        let engine = OrderLifecycleEngine::new(
            order_store,
            router,
            IntakeDefaults {
                payment_method: config.default_payment_method.clone(),
                preparation_minutes: config.default_preparation_minutes,
            },
        );
        let gateway = ConnectionGateway::new(registry.clone());
        let sweeper = config
            .sweep_interval
            .map(|period| tokio::spawn(sweep_expired(registry.clone(), period)));

        info!(?config, "Order system started");
        Self {
            engine,
            registry,
            gateway,
            config,
            sweeper,
            handles,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Stops the sweeper, drops every client so the actors' channels close, then waits
    /// for both actors to drain and exit.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        // The sweeper holds a registry client; it has to go first.
        if let Some(sweeper) = self.sweeper {
            sweeper.abort();
            let _ = sweeper.await;
        }

        drop(self.engine);
        drop(self.gateway);
        drop(self.registry);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e.into());
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

async fn sweep_expired(registry: ConnectionRegistry, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately; nothing can have expired yet.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if let Err(e) = registry.purge_expired().await {
            warn!(error = %e, "Expiry sweep failed");
        }
    }
}
