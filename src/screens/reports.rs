//! Player and provider performance reports.
//!
//! Read-only screens: filter, page, sort, and export. The two collections
//! refresh together but stay independently owned, so a failure in one
//! leaves the other's data on screen.

use std::sync::Arc;

use serde::Deserialize;

use crate::api::{ApiClient, ExportDownload, ExportFormat, HttpListBackend, ListRoute};
use crate::config::ConsoleConfig;
use crate::error::Result;
use crate::list::{ListBackend, RemoteListController};
use crate::query::{FilterSet, FilterValue};
use crate::types::HasId;

const PLAYERS_RESOURCE: &str = "reports/player-performance";
const PROVIDERS_RESOURCE: &str = "reports/provider-performance";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerPerformanceRow {
    pub player_id: String,
    pub player_name: String,
    pub wagered: f64,
    pub won: f64,
    pub net: f64,
    pub sessions: u64,
}

impl HasId for PlayerPerformanceRow {
    fn id(&self) -> &str {
        &self.player_id
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderPerformanceRow {
    pub provider_id: String,
    pub provider_name: String,
    pub ggr: f64,
    pub bet_count: u64,
    pub rtp: f64,
}

impl HasId for ProviderPerformanceRow {
    fn id(&self) -> &str {
        &self.provider_id
    }
}

pub struct ReportsScreen {
    pub players: RemoteListController<PlayerPerformanceRow>,
    pub providers: RemoteListController<ProviderPerformanceRow>,
    client: Option<ApiClient>,
}

impl ReportsScreen {
    pub fn new(client: &ApiClient, config: &ConsoleConfig) -> Self {
        let mut screen = Self::from_parts(
            Arc::new(HttpListBackend::new(
                client.clone(),
                ListRoute::Filtered(PLAYERS_RESOURCE.to_string()),
            )),
            Arc::new(HttpListBackend::new(
                client.clone(),
                ListRoute::Filtered(PROVIDERS_RESOURCE.to_string()),
            )),
            config.page_size,
        );
        screen.client = Some(client.clone());
        screen
    }

    pub fn from_parts(
        players: Arc<dyn ListBackend<PlayerPerformanceRow>>,
        providers: Arc<dyn ListBackend<ProviderPerformanceRow>>,
        page_size: u32,
    ) -> Self {
        Self {
            players: RemoteListController::new(players, page_size),
            providers: RemoteListController::new(providers, page_size),
            client: None,
        }
    }

    /// Fetch both reports concurrently. Each controller records its own
    /// error state; the first failure is returned after both settle.
    pub async fn refresh_all(&self) -> Result<()> {
        let (players, providers) =
            futures::future::join(self.players.reload(), self.providers.reload()).await;
        players?;
        providers?;
        Ok(())
    }

    /// Constrain both reports to a reporting window.
    pub async fn set_date_range(&self, from: Option<String>, to: Option<String>) -> Result<()> {
        let range = FilterValue::DateRange { from, to };

        let mut player_filters = self.players.filters();
        player_filters.set("period", range.clone());
        let mut provider_filters = self.providers.filters();
        provider_filters.set("period", range);

        let (players, providers) = futures::future::join(
            self.players.set_filters(player_filters),
            self.providers.set_filters(provider_filters),
        )
        .await;
        players?;
        providers?;
        Ok(())
    }

    /// Download the player report under the current filters.
    pub async fn export_players(&self, format: ExportFormat) -> Result<ExportDownload> {
        self.export(PLAYERS_RESOURCE, "player-performance", format, self.players.filters())
            .await
    }

    /// Download the provider report under the current filters.
    pub async fn export_providers(&self, format: ExportFormat) -> Result<ExportDownload> {
        self.export(
            PROVIDERS_RESOURCE,
            "provider-performance",
            format,
            self.providers.filters(),
        )
        .await
    }

    async fn export(
        &self,
        resource: &str,
        report_name: &str,
        format: ExportFormat,
        filters: FilterSet,
    ) -> Result<ExportDownload> {
        let client = self.client.as_ref().ok_or_else(|| {
            crate::error::ConsoleError::Config("reports screen has no API client".to_string())
        })?;
        client
            .download_export(&format!("{resource}/export"), report_name, format, &filters)
            .await
    }
}
