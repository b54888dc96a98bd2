//! Bot controllers and their registry.
//!
//! A controller is a feature that needs to start once the Discord connection is
//! ready and to clean up before the process exits. Controllers are registered
//! explicitly in [`crate::startup::build_controllers`].

pub mod assistant;
pub mod round_status;

use std::sync::Arc;

use serenity::{all::Context, async_trait};

use crate::error::AppError;

#[async_trait]
pub trait BotController: Send + Sync {
    fn name(&self) -> &'static str;

    /// Called after the gateway reports ready. Errors are fatal to the bot.
    async fn on_ready(&self, ctx: &Context) -> Result<(), AppError>;

    /// Called once during shutdown, after all loops have stopped.
    async fn on_shutdown(&self) -> Result<(), AppError>;
}

/// Ordered list of controllers.
#[derive(Default, Clone)]
pub struct ControllerRegistry {
    controllers: Vec<Arc<dyn BotController>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, controller: Arc<dyn BotController>) {
        tracing::debug!("Registered controller '{}'", controller.name());
        self.controllers.push(controller);
    }

    /// Runs every controller's ready hook in registration order.
    ///
    /// Stops at the first failure and returns it.
    pub async fn on_ready(&self, ctx: &Context) -> Result<(), AppError> {
        tracing::debug!("Starting {} controllers", self.controllers.len());

        for controller in &self.controllers {
            controller.on_ready(ctx).await?;
            tracing::info!("Controller '{}' ready", controller.name());
        }

        Ok(())
    }

    /// Runs every controller's shutdown hook in reverse registration order.
    ///
    /// Failures are logged and do not stop the remaining hooks.
    pub async fn on_shutdown(&self) {
        for controller in self.controllers.iter().rev() {
            if let Err(e) = controller.on_shutdown().await {
                tracing::error!("Controller '{}' failed to shut down: {}", controller.name(), e);
            }
        }
    }
}
