//! "All matches" table: one row per launched result, or a bare row for matches without one.

use crate::models::{MatchResult, MatchView};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    rodada: i64,
    id_partida: i64,
    status: &'static str,
    mandante: &'a str,
    visitante: &'a str,
    placar: String,
    vencedor: &'a str,
    felinos: String,
    penalidades: String,
    sinucas: String,
    arbitro: &'a str,
    data_criacao: String,
}

fn pair(a: u32, b: u32) -> String {
    format!("{} x {}", a, b)
}

fn history_row<'a>(m: &'a MatchView, r: Option<&'a MatchResult>) -> HistoryRow<'a> {
    let counts = |f: fn(&MatchResult) -> (u32, u32)| {
        r.map(|r| {
            let (a, b) = f(r);
            pair(a, b)
        })
        .unwrap_or_default()
    };
    HistoryRow {
        rodada: m.round,
        id_partida: m.id,
        status: m.status.as_str(),
        mandante: &m.home_name,
        visitante: &m.away_name,
        placar: counts(|r| (r.counters.home_score, r.counters.away_score)),
        vencedor: r.map(|r| r.winner.as_str()).unwrap_or(""),
        felinos: counts(|r| (r.counters.home_felinos, r.counters.away_felinos)),
        penalidades: counts(|r| (r.counters.home_penalties, r.counters.away_penalties)),
        sinucas: counts(|r| (r.counters.home_sinucas, r.counters.away_sinucas)),
        arbitro: r.map(|r| r.referee.as_str()).unwrap_or(""),
        data_criacao: r
            .and_then(|r| r.created_at)
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
    }
}

/// Render the match history as CSV, matches in the given order, results oldest first.
pub fn export_history_csv(matches: &[MatchView]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for m in matches {
        if m.results.is_empty() {
            wtr.serialize(history_row(m, None))?;
        } else {
            for r in &m.results {
                wtr.serialize(history_row(m, Some(r)))?;
            }
        }
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Counters, MatchStatus};
    use chrono::{TimeZone, Utc};

    #[test]
    fn one_row_per_result_and_bare_rows() {
        let played = MatchView::new(42, 3, MatchStatus::Launched, (1, "Leões"), (2, "Tigres"))
            .unwrap()
            .with_results(vec![MatchResult {
                match_id: 42,
                referee: "Douglas".into(),
                winner: "Leões".into(),
                counters: Counters {
                    home_score: 3,
                    away_score: 1,
                    ..Counters::default()
                },
                created_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()),
            }]);
        let pending =
            MatchView::new(50, 4, MatchStatus::Pending, (2, "Tigres"), (3, "Panteras")).unwrap();

        let out = String::from_utf8(export_history_csv(&[played, pending]).unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("rodada,id_partida,status"));
        assert_eq!(
            lines[1],
            "3,42,LANÇADA,Leões,Tigres,3 x 1,Leões,0 x 0,0 x 0,0 x 0,Douglas,2025-03-01T12:00:00+00:00"
        );
        assert_eq!(lines[2], "4,50,PENDENTE,Tigres,Panteras,,,,,,,");
    }
}
