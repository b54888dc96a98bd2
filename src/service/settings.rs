//! Settings changed through slash commands.
//!
//! Every operation checks the invoking member's roles first. Changes are applied to
//! a copy of the shared configuration, saved, and only then published, so a failed
//! save leaves the running configuration untouched.

use std::net::IpAddr;

use serenity::all::RoleId;

use crate::{
    config::{
        open_ai::{AssistantMode, OpenAiConfig},
        round_status::RoundStatusConfig,
        store::{ConfigStore, Configuration},
        RoleGated, SharedConfig,
    },
    error::{settings::SettingsError, AppError},
};

/// Role-gated editor for one shared configuration.
pub struct SettingsService<'a, T> {
    store: &'a ConfigStore,
    config: &'a SharedConfig<T>,
}

pub type RoundStatusSettingsService<'a> = SettingsService<'a, RoundStatusConfig>;

pub type OpenAiSettingsService<'a> = SettingsService<'a, OpenAiConfig>;

impl<'a, T> SettingsService<'a, T>
where
    T: Configuration + RoleGated + Clone,
{
    pub fn new(store: &'a ConfigStore, config: &'a SharedConfig<T>) -> Self {
        Self { store, config }
    }

    /// Whether a member with `roles` holds the main role or an allowed role.
    pub async fn has_access(&self, roles: &[RoleId]) -> bool {
        let config = self.config.read().await;
        config.grants_access(roles.iter().map(|role| role.get()))
    }

    /// Grants a role access to the commands of this configuration.
    ///
    /// # Returns
    /// - `Ok(())` - Role added and saved
    /// - `Err(AppError::SettingsErr(CannotAddMainRole))` - Role is the main role
    /// - `Err(AppError::SettingsErr(RoleAlreadyAdded))` - Role already allowed
    pub async fn add_allowed_role(&self, roles: &[RoleId], role: RoleId) -> Result<(), AppError> {
        self.ensure_access(roles).await?;

        self.update(|config| {
            if role.get() == config.main_role_id() {
                return Err(SettingsError::CannotAddMainRole);
            }
            if !config.allowed_role_ids_mut().insert(role.get()) {
                return Err(SettingsError::RoleAlreadyAdded);
            }
            Ok(())
        })
        .await?;

        tracing::info!("Added allowed role {} to {}", role, T::NAME);
        Ok(())
    }

    /// Revokes a previously allowed role.
    ///
    /// # Returns
    /// - `Ok(())` - Role removed and saved
    /// - `Err(AppError::SettingsErr(CannotRemoveMainRole))` - Role is the main role
    /// - `Err(AppError::SettingsErr(RoleNotFound))` - Role was not allowed
    pub async fn remove_allowed_role(
        &self,
        roles: &[RoleId],
        role: RoleId,
    ) -> Result<(), AppError> {
        self.ensure_access(roles).await?;

        self.update(|config| {
            if role.get() == config.main_role_id() {
                return Err(SettingsError::CannotRemoveMainRole);
            }
            if !config.allowed_role_ids_mut().remove(&role.get()) {
                return Err(SettingsError::RoleNotFound);
            }
            Ok(())
        })
        .await?;

        tracing::info!("Removed allowed role {} from {}", role, T::NAME);
        Ok(())
    }

    async fn ensure_access(&self, roles: &[RoleId]) -> Result<(), SettingsError> {
        if self.has_access(roles).await {
            Ok(())
        } else {
            Err(SettingsError::AccessDenied)
        }
    }

    /// Applies `change` to a copy, saves it, then publishes it.
    async fn update<F>(&self, change: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut T) -> Result<(), SettingsError>,
    {
        let mut config = self.config.write().await;

        let mut updated = config.clone();
        change(&mut updated)?;
        self.store.save(&updated).await?;

        *config = updated;
        Ok(())
    }
}

impl SettingsService<'_, RoundStatusConfig> {
    /// Sets the game server host.
    ///
    /// # Arguments
    /// - `roles` - Roles of the invoking member
    /// - `host` - Literal IPv4 or IPv6 address
    ///
    /// # Returns
    /// - `Ok(())` - Host saved
    /// - `Err(AppError::SettingsErr(AccessDenied))` - Member lacks a permitted role
    /// - `Err(AppError::SettingsErr(InvalidHost))` - Not an IP address
    /// - `Err(AppError::ConfigErr)` - Configuration could not be saved
    pub async fn set_host(&self, roles: &[RoleId], host: &str) -> Result<(), AppError> {
        self.ensure_access(roles).await?;

        let address: IpAddr = host.trim().parse().map_err(|_| SettingsError::InvalidHost)?;

        self.update(|config| {
            config.host = address.to_string();
            Ok(())
        })
        .await?;

        tracing::info!("Round status host set to {}", address);
        Ok(())
    }

    /// Sets the game server port; must be within `1..=65535`.
    pub async fn set_port(&self, roles: &[RoleId], port: i64) -> Result<(), AppError> {
        self.ensure_access(roles).await?;

        let port = u16::try_from(port)
            .ok()
            .filter(|port| *port != 0)
            .ok_or(SettingsError::InvalidPort)?;

        self.update(|config| {
            config.port = port;
            Ok(())
        })
        .await?;

        tracing::info!("Round status port set to {}", port);
        Ok(())
    }
}

impl SettingsService<'_, OpenAiConfig> {
    /// Switches between streamed and single replies.
    ///
    /// # Returns
    /// - `Ok(AssistantMode)` - Mode saved
    /// - `Err(AppError::SettingsErr(InvalidMode))` - Neither `stream` nor `no_stream`
    pub async fn set_mode(&self, roles: &[RoleId], mode: &str) -> Result<AssistantMode, AppError> {
        self.ensure_access(roles).await?;

        let mode: AssistantMode = mode.parse()?;

        self.update(|config| {
            config.mode = mode;
            Ok(())
        })
        .await?;

        tracing::info!("Assistant mode set to {}", mode);
        Ok(mode)
    }
}
