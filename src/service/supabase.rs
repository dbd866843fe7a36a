//! PostgREST client for the hosted Supabase project.

use super::{MatchDataService, MatchJoins, ResultQuery, ServiceError};
use crate::models::{
    Club, ClubId, MatchId, MatchResult, MatchStatus, MatchView, NewFriendly, NewResult,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const TABLE_CLUBS: &str = "tab_clube";
const TABLE_MATCHES: &str = "tab_partida";
const TABLE_RESULTS: &str = "tab_resultado_partida";
const TABLE_FRIENDLIES: &str = "tab_amistoso";

const MATCH_COLUMNS: &str = "id_partida,rodada,status_partida,id_clube_mandante,id_clube_visitante,\
clubes_mandante:tab_clube!id_clube_mandante(descricao),\
clubes_visitante:tab_clube!id_clube_visitante(descricao)";
const MATCH_HISTORY_JOIN: &str = ",resultados:tab_resultado_partida(*)";

/// Backend handle. Cheap to clone; share one per process.
#[derive(Debug, Clone)]
pub struct SupabaseService {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct ClubName {
    descricao: Option<String>,
}

#[derive(Deserialize)]
struct MatchRow {
    id_partida: MatchId,
    rodada: Option<i64>,
    status_partida: Option<String>,
    id_clube_mandante: ClubId,
    id_clube_visitante: ClubId,
    clubes_mandante: Option<ClubName>,
    clubes_visitante: Option<ClubName>,
    #[serde(default)]
    resultados: Option<Vec<MatchResult>>,
}

#[derive(Serialize)]
struct StatusPatch<'a> {
    status_partida: &'a str,
}

#[derive(Deserialize)]
struct PostgrestError {
    message: Option<String>,
}

fn club_name(c: Option<ClubName>) -> String {
    c.and_then(|c| c.descricao).unwrap_or_default()
}

impl SupabaseService {
    /// `base_url` is the project URL (e.g. `https://xyz.supabase.co`); the REST path is appended.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("fossa-results/0.1")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Per-request timeout (default [`DEFAULT_TIMEOUT`]).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Every stored result exactly as the backend returns it, unmodeled columns included.
    pub async fn list_results_raw(&self) -> Result<serde_json::Value, ServiceError> {
        self.get(TABLE_RESULTS, &[("select", "*".to_string())]).await
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
    }

    async fn send(&self, req: RequestBuilder, url: &str) -> Result<Response, ServiceError> {
        let response = self
            .authorized(req)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(format!("{url}: {e}")))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<PostgrestError>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| body.clone());
        Err(ServiceError::Rejected {
            status: status.as_u16(),
            message,
            body,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<T, ServiceError> {
        let url = self.table_url(table);
        let response = self.send(self.client.get(&url).query(query), &url).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(format!("{url}: {e}")))
    }

    async fn insert<T: Serialize>(&self, table: &str, record: &T) -> Result<(), ServiceError> {
        let url = self.table_url(table);
        let req = self
            .client
            .post(&url)
            .header("Prefer", "return=minimal")
            .json(record);
        self.send(req, &url).await.map(|_| ())
    }
}

impl MatchDataService for SupabaseService {
    async fn list_clubs(&self) -> Result<Vec<Club>, ServiceError> {
        self.get(
            TABLE_CLUBS,
            &[
                ("select", "id_clube,descricao".to_string()),
                ("order", "descricao.asc".to_string()),
            ],
        )
        .await
    }

    async fn list_matches(&self, joins: MatchJoins) -> Result<Vec<MatchView>, ServiceError> {
        let mut select = MATCH_COLUMNS.to_string();
        if joins.results_history {
            select.push_str(MATCH_HISTORY_JOIN);
        }
        let rows: Vec<MatchRow> = self
            .get(
                TABLE_MATCHES,
                &[
                    ("select", select),
                    ("order", "rodada.asc,id_partida.asc".to_string()),
                ],
            )
            .await?;

        let mut matches = Vec::with_capacity(rows.len());
        for row in rows {
            let status = row
                .status_partida
                .as_deref()
                .map(MatchStatus::from_literal)
                .unwrap_or_default();
            match MatchView::new(
                row.id_partida,
                row.rodada.unwrap_or_default(),
                status,
                (row.id_clube_mandante, club_name(row.clubes_mandante)),
                (row.id_clube_visitante, club_name(row.clubes_visitante)),
            ) {
                Ok(view) => matches.push(view.with_results(row.resultados.unwrap_or_default())),
                Err(e) => log::warn!("Skipping match row: {}", e),
            }
        }
        Ok(matches)
    }

    async fn list_results(&self, query: ResultQuery) -> Result<Vec<MatchResult>, ServiceError> {
        let mut params = vec![("select", "*".to_string())];
        if query.newest_first {
            params.push(("order", "data_criacao.desc".to_string()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        self.get(TABLE_RESULTS, &params).await
    }

    async fn insert_result(&self, record: &NewResult) -> Result<(), ServiceError> {
        self.insert(TABLE_RESULTS, record).await
    }

    async fn update_match_status(
        &self,
        match_id: MatchId,
        status: MatchStatus,
    ) -> Result<(), ServiceError> {
        let url = self.table_url(TABLE_MATCHES);
        let req = self
            .client
            .patch(&url)
            .query(&[("id_partida", format!("eq.{match_id}"))])
            .header("Prefer", "return=minimal")
            .json(&StatusPatch {
                status_partida: status.as_str(),
            });
        self.send(req, &url).await.map(|_| ())
    }

    async fn insert_friendly(&self, record: &NewFriendly) -> Result<(), ServiceError> {
        self.insert(TABLE_FRIENDLIES, record).await
    }
}
