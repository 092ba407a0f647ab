// src/panel.rs
use std::sync::Arc;

use crate::data_types::TableSnapshot;
use crate::error::LoadError;

pub const TITLE: &str = "💰 Painel de Preços Chevrolet";
pub const REFRESH_LABEL: &str = "Puxar Dados Mais Recentes";
pub const EXPORT_LABEL: &str = "Baixar CSV";
pub const LOADING_LABEL: &str = "Carregando dados da planilha...";

const NOT_LOADED_WARNING: &str =
    "Não foi possível carregar os dados. Verifique as credenciais ou o compartilhamento da planilha.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Warning(String),
    Error(String),
}

impl Banner {
    pub fn text(&self) -> &str {
        match self {
            Banner::Success(text) | Banner::Warning(text) | Banner::Error(text) => text,
        }
    }
}

/// What the panel shows for the outcome of one load.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub snapshot: Arc<TableSnapshot>,
    pub banners: Vec<Banner>,
}

impl PanelState {
    /// A failed load falls back to the empty snapshot, never a stale one.
    pub fn from_load(result: Result<Arc<TableSnapshot>, LoadError>) -> Self {
        let mut banners = Vec::new();
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                banners.push(Banner::Error(format!(
                    "⚠️ Erro ao carregar os dados. Verifique a chave 'gcp_service_account' no Secrets. Erro: {}",
                    e
                )));
                Arc::new(TableSnapshot::empty())
            }
        };

        if snapshot.has_no_rows() {
            banners.push(Banner::Warning(NOT_LOADED_WARNING.to_string()));
        } else {
            banners.push(Banner::Success(format!(
                "Dados carregados com sucesso. Total de {} linhas.",
                snapshot.row_count()
            )));
        }

        PanelState { snapshot, banners }
    }

    pub fn shows_table(&self) -> bool {
        !self.snapshot.has_no_rows()
    }

    pub fn subheader(&self, worksheet: &str) -> String {
        format!("Dados Carregados da Aba: {}", worksheet)
    }

    pub fn updated_caption(&self) -> String {
        format!(
            "Atualizado em {}",
            self.snapshot.fetched_at.format("%d/%m/%Y %H:%M:%S")
        )
    }
}
