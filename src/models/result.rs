//! Launched results, their counters, and lenient number coercion for form input.

use crate::models::game::MatchId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Which side of the match a counter belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

/// The four counters tracked per side.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Score,
    Felinos,
    Penalties,
    Sinucas,
}

impl Counter {
    pub const ALL: [Counter; 4] = [
        Counter::Score,
        Counter::Felinos,
        Counter::Penalties,
        Counter::Sinucas,
    ];
}

/// A single +1 / -1 press on a counter button.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Up,
    Down,
}

/// Score and secondary counters for both sides. Column names match `tab_resultado_partida`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Counters {
    #[serde(rename = "placar_mandante", default, deserialize_with = "lenient_count")]
    pub home_score: u32,
    #[serde(rename = "placar_visitante", default, deserialize_with = "lenient_count")]
    pub away_score: u32,
    #[serde(rename = "felinos_mandante", default, deserialize_with = "lenient_count")]
    pub home_felinos: u32,
    #[serde(rename = "felinos_visitante", default, deserialize_with = "lenient_count")]
    pub away_felinos: u32,
    #[serde(rename = "penalidades_mandante", default, deserialize_with = "lenient_count")]
    pub home_penalties: u32,
    #[serde(rename = "penalidades_visitante", default, deserialize_with = "lenient_count")]
    pub away_penalties: u32,
    #[serde(rename = "sinucas_mandante", default, deserialize_with = "lenient_count")]
    pub home_sinucas: u32,
    #[serde(rename = "sinucas_visitante", default, deserialize_with = "lenient_count")]
    pub away_sinucas: u32,
}

impl Counters {
    pub fn get(&self, counter: Counter, side: Side) -> u32 {
        *self.slot(counter, side)
    }

    pub fn set(&mut self, counter: Counter, side: Side, value: u32) {
        *self.slot_mut(counter, side) = value;
    }

    /// Apply one step, never going below zero. There is no upper bound.
    pub fn adjust(&mut self, counter: Counter, side: Side, step: Step) -> u32 {
        let slot = self.slot_mut(counter, side);
        *slot = match step {
            Step::Up => slot.saturating_add(1),
            Step::Down => slot.saturating_sub(1),
        };
        *slot
    }

    fn slot(&self, counter: Counter, side: Side) -> &u32 {
        match (counter, side) {
            (Counter::Score, Side::Home) => &self.home_score,
            (Counter::Score, Side::Away) => &self.away_score,
            (Counter::Felinos, Side::Home) => &self.home_felinos,
            (Counter::Felinos, Side::Away) => &self.away_felinos,
            (Counter::Penalties, Side::Home) => &self.home_penalties,
            (Counter::Penalties, Side::Away) => &self.away_penalties,
            (Counter::Sinucas, Side::Home) => &self.home_sinucas,
            (Counter::Sinucas, Side::Away) => &self.away_sinucas,
        }
    }

    fn slot_mut(&mut self, counter: Counter, side: Side) -> &mut u32 {
        match (counter, side) {
            (Counter::Score, Side::Home) => &mut self.home_score,
            (Counter::Score, Side::Away) => &mut self.away_score,
            (Counter::Felinos, Side::Home) => &mut self.home_felinos,
            (Counter::Felinos, Side::Away) => &mut self.away_felinos,
            (Counter::Penalties, Side::Home) => &mut self.home_penalties,
            (Counter::Penalties, Side::Away) => &mut self.away_penalties,
            (Counter::Sinucas, Side::Home) => &mut self.home_sinucas,
            (Counter::Sinucas, Side::Away) => &mut self.away_sinucas,
        }
    }
}

/// Coerce form text to a counter value: empty, non-numeric or negative input is 0,
/// fractions are truncated.
pub fn coerce_count(text: &str) -> u32 {
    let text = text.trim();
    if let Ok(n) = text.parse::<u32>() {
        return n;
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => f.min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

fn coerce_json(value: &serde_json::Value) -> u32 {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u.min(u32::MAX as u64) as u32
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f.min(u32::MAX as f64) as u32)
                    .unwrap_or(0)
            }
        }
        serde_json::Value::String(s) => coerce_count(s),
        _ => 0,
    }
}

/// Serde helper: accept a JSON number, a numeric string, or null, coercing like [`coerce_count`].
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_json).unwrap_or(0))
}

fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde helper: RFC 3339 timestamps, or offset-less ones (`timestamp` columns) read as UTC.
/// Null, missing or unparseable values read as `None`.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let Some(raw) = raw.as_str() else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    Ok(chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc()))
}

/// Payload inserted into `tab_resultado_partida`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewResult {
    #[serde(rename = "id_partida")]
    pub match_id: MatchId,
    #[serde(rename = "arbitro")]
    pub referee: String,
    #[serde(rename = "vencedor")]
    pub winner: String,
    #[serde(flatten)]
    pub counters: Counters,
}

/// A result row as stored by the backend.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "id_partida")]
    pub match_id: MatchId,
    #[serde(rename = "arbitro", default, deserialize_with = "nullable_text")]
    pub referee: String,
    #[serde(rename = "vencedor", default, deserialize_with = "nullable_text")]
    pub winner: String,
    #[serde(flatten)]
    pub counters: Counters,
    #[serde(rename = "data_criacao", default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_clamps_at_zero_for_every_counter() {
        let mut c = Counters::default();
        for counter in Counter::ALL {
            for side in [Side::Home, Side::Away] {
                assert_eq!(c.adjust(counter, side, Step::Down), 0);
            }
        }
        assert_eq!(c, Counters::default());
    }

    #[test]
    fn up_then_down_restores_value() {
        let mut c = Counters::default();
        for start in [0u32, 1, 7, 250] {
            c.set(Counter::Sinucas, Side::Away, start);
            c.adjust(Counter::Sinucas, Side::Away, Step::Up);
            c.adjust(Counter::Sinucas, Side::Away, Step::Down);
            assert_eq!(c.get(Counter::Sinucas, Side::Away), start);
        }
    }

    #[test]
    fn coerce_count_treats_garbage_as_zero() {
        assert_eq!(coerce_count(""), 0);
        assert_eq!(coerce_count("   "), 0);
        assert_eq!(coerce_count("abc"), 0);
        assert_eq!(coerce_count("-4"), 0);
        assert_eq!(coerce_count("3.9"), 3);
        assert_eq!(coerce_count(" 12 "), 12);
    }

    #[test]
    fn stored_row_tolerates_null_and_string_counters() {
        let row: MatchResult = serde_json::from_value(serde_json::json!({
            "id_partida": 5,
            "arbitro": "Pedro",
            "vencedor": "Tigres",
            "placar_mandante": null,
            "placar_visitante": "2",
            "felinos_mandante": 1,
            "data_criacao": "2025-03-01T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(row.counters.home_score, 0);
        assert_eq!(row.counters.away_score, 2);
        assert_eq!(row.counters.home_felinos, 1);
        assert_eq!(row.counters.away_sinucas, 0);
    }

    #[test]
    fn timestamp_without_offset_is_utc() {
        let row: MatchResult = serde_json::from_value(serde_json::json!({
            "id_partida": 5,
            "data_criacao": "2025-03-01T12:00:00.250"
        }))
        .unwrap();
        assert_eq!(
            row.created_at.map(|t| t.to_rfc3339()).as_deref(),
            Some("2025-03-01T12:00:00.250+00:00")
        );
    }

    #[test]
    fn null_or_missing_timestamp_still_decodes() {
        let rows: Vec<MatchResult> = serde_json::from_value(serde_json::json!([
            { "id_partida": 43, "arbitro": null, "vencedor": null, "data_criacao": null },
            { "id_partida": 44 }
        ]))
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].created_at, None);
        assert_eq!(rows[0].referee, "");
        assert_eq!(rows[1].created_at, None);
    }

    #[test]
    fn new_result_uses_backend_column_names() {
        let record = NewResult {
            match_id: 42,
            referee: "Douglas".into(),
            winner: "Leões".into(),
            counters: Counters {
                home_score: 3,
                away_score: 1,
                ..Counters::default()
            },
        };
        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["id_partida"], 42);
        assert_eq!(v["arbitro"], "Douglas");
        assert_eq!(v["placar_mandante"], 3);
        assert_eq!(v["sinucas_visitante"], 0);
    }
}
