//! Flattening of API-Football fixture records into the shape the scoreboard
//! page renders.
//!
//! Upstream payloads are read permissively: a missing or mistyped field
//! becomes an empty/`None` value and never an error.

use serde::Serialize;
use serde_json::Value;

/// Status codes of a match in progress: halves, half-time, extra time,
/// penalties and the break before extra time.
pub const LIVE_STATUSES: &[&str] = &["1H", "2H", "HT", "ET", "P", "BT"];

/// Status code of a scheduled match that has not kicked off.
pub const NOT_STARTED: &str = "NS";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFixture {
    pub id: String,
    pub league_id: i64,
    pub status_short: String,
    pub is_live: bool,
    pub is_upcoming: bool,
    /// Kickoff as sent by the API (ISO 8601, already in the requested zone)
    #[serde(rename = "kickoffISO")]
    pub kickoff_iso: Option<String>,
    /// "67'", "45+2'", "HT", or empty before kickoff
    pub minute: String,
    pub home: String,
    pub away: String,
    pub home_name: Option<String>,
    pub away_name: Option<String>,
    pub home_goals: Option<i64>,
    pub away_goals: Option<i64>,
    pub venue: Option<String>,
}

impl NormalizedFixture {
    pub fn from_api(item: &Value) -> Self {
        let fixture = &item["fixture"];
        let status = &fixture["status"];
        let home = &item["teams"]["home"];
        let away = &item["teams"]["away"];
        let goals = &item["goals"];

        let status_short = status["short"].as_str().unwrap_or_default().to_string();
        let is_live = LIVE_STATUSES.contains(&status_short.as_str());
        let is_upcoming = status_short == NOT_STARTED;

        NormalizedFixture {
            id: id_text(&fixture["id"]),
            league_id: item["league"]["id"].as_i64().unwrap_or(0),
            minute: format_minute(status),
            status_short,
            is_live,
            is_upcoming,
            kickoff_iso: text(&fixture["date"]),
            home: team_abbr(home),
            away: team_abbr(away),
            home_name: text(&home["name"]),
            away_name: text(&away["name"]),
            home_goals: goals["home"].as_i64(),
            away_goals: goals["away"].as_i64(),
            venue: text(&fixture["venue"]["name"]),
        }
    }
}

/// Clock text for a fixture's `status` object.
pub fn format_minute(status: &Value) -> String {
    if status["short"].as_str() == Some("HT") {
        return "HT".to_string();
    }
    let Some(elapsed) = status["elapsed"].as_i64() else {
        return String::new();
    };
    match status["extra"].as_i64() {
        Some(extra) if extra != 0 => format!("{}+{}'", elapsed, extra),
        _ => format!("{}'", elapsed),
    }
}

/// Three-letter-ish team code. Uses the API's `code` when present,
/// otherwise builds one from the first three letters of each word of the
/// name, cut to three characters.
pub fn team_abbr(team: &Value) -> String {
    let code = team["code"].as_str().unwrap_or_default().trim();
    if !code.is_empty() {
        return code.to_uppercase();
    }

    let name = team["name"].as_str().unwrap_or_default().trim().to_uppercase();
    let compact: String = name
        .split_whitespace()
        .flat_map(|word| word.chars().take(3))
        .collect();

    if compact.chars().count() >= 3 {
        compact.chars().take(3).collect()
    } else {
        name.chars().take(3).collect()
    }
}

fn text(v: &Value) -> Option<String> {
    v.as_str().map(str::to_string)
}

fn id_text(v: &Value) -> String {
    match v {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(short: &str) -> Value {
        json!({
            "fixture": {
                "id": 1208021,
                "date": "2025-08-16T15:00:00+01:00",
                "status": { "short": short, "elapsed": null, "extra": null },
                "venue": { "name": "Emirates Stadium" }
            },
            "league": { "id": 39 },
            "teams": {
                "home": { "name": "Arsenal", "code": "ars" },
                "away": { "name": "Manchester United", "code": null }
            },
            "goals": { "home": null, "away": null }
        })
    }

    #[test]
    fn test_live_statuses() {
        for short in LIVE_STATUSES {
            let f = NormalizedFixture::from_api(&item(short));
            assert!(f.is_live, "{} should be live", short);
            assert!(!f.is_upcoming, "{} should not be upcoming", short);
        }
    }

    #[test]
    fn test_not_started_is_upcoming() {
        let f = NormalizedFixture::from_api(&item("NS"));
        assert!(f.is_upcoming);
        assert!(!f.is_live);
    }

    #[test]
    fn test_other_statuses_are_neither() {
        for short in ["FT", "AET", "PEN", "PST", "CANC", "ABD", "TBD", "SUSP", ""] {
            let f = NormalizedFixture::from_api(&item(short));
            assert!(!f.is_live && !f.is_upcoming, "{} should be neither", short);
        }
    }

    #[test]
    fn test_format_minute() {
        assert_eq!(format_minute(&json!({ "short": "HT", "elapsed": 45 })), "HT");
        assert_eq!(
            format_minute(&json!({ "short": "2H", "elapsed": 45, "extra": 2 })),
            "45+2'"
        );
        assert_eq!(
            format_minute(&json!({ "short": "2H", "elapsed": 67, "extra": 0 })),
            "67'"
        );
        assert_eq!(format_minute(&json!({ "short": "NS", "elapsed": null })), "");
        assert_eq!(format_minute(&json!({})), "");
    }

    #[test]
    fn test_team_abbr_prefers_code() {
        assert_eq!(team_abbr(&json!({ "code": "mun", "name": "Manchester United" })), "MUN");
        assert_eq!(team_abbr(&json!({ "code": "  lei " })), "LEI");
    }

    #[test]
    fn test_team_abbr_from_name() {
        assert_eq!(team_abbr(&json!({ "name": "Manchester United" })), "MAN");
        assert_eq!(team_abbr(&json!({ "name": "AFC Wimbledon", "code": "" })), "AFC");
        // Short words still combine to three letters.
        assert_eq!(team_abbr(&json!({ "name": "M K Dons" })), "MKD");
        assert_eq!(team_abbr(&json!({ "name": "Luton Town" })).chars().count(), 3);
    }

    #[test]
    fn test_team_abbr_short_names() {
        assert_eq!(team_abbr(&json!({ "name": "QP" })), "QP");
        assert_eq!(team_abbr(&json!({ "name": "a b" })), "A B");
        assert_eq!(team_abbr(&json!({})), "");
    }

    #[test]
    fn test_from_api_passes_fields_through() {
        let mut raw = item("2H");
        raw["fixture"]["status"] = json!({ "short": "2H", "elapsed": 90, "extra": 4 });
        raw["goals"] = json!({ "home": 2, "away": 1 });

        let f = NormalizedFixture::from_api(&raw);
        assert_eq!(f.id, "1208021");
        assert_eq!(f.league_id, 39);
        assert_eq!(f.status_short, "2H");
        assert_eq!(f.minute, "90+4'");
        assert_eq!(f.kickoff_iso.as_deref(), Some("2025-08-16T15:00:00+01:00"));
        assert_eq!(f.home, "ARS");
        assert_eq!(f.away, "MAN");
        assert_eq!(f.home_name.as_deref(), Some("Arsenal"));
        assert_eq!(f.away_name.as_deref(), Some("Manchester United"));
        assert_eq!((f.home_goals, f.away_goals), (Some(2), Some(1)));
        assert_eq!(f.venue.as_deref(), Some("Emirates Stadium"));
    }

    #[test]
    fn test_from_api_tolerates_missing_structure() {
        let f = NormalizedFixture::from_api(&json!({}));
        assert_eq!(f.id, "");
        assert_eq!(f.league_id, 0);
        assert_eq!(f.status_short, "");
        assert!(!f.is_live && !f.is_upcoming);
        assert_eq!(f.kickoff_iso, None);
        assert_eq!(f.minute, "");
        assert_eq!(f.home, "");
        assert_eq!(f.home_goals, None);
        assert_eq!(f.venue, None);

        let f = NormalizedFixture::from_api(&json!({ "fixture": null, "teams": "oops" }));
        assert_eq!(f.home, "");
    }

    #[test]
    fn test_serializes_camel_case() {
        let v = serde_json::to_value(NormalizedFixture::from_api(&item("NS"))).unwrap();
        assert_eq!(v["leagueId"], 39);
        assert_eq!(v["statusShort"], "NS");
        assert_eq!(v["isUpcoming"], true);
        assert_eq!(v["kickoffISO"], "2025-08-16T15:00:00+01:00");
        assert_eq!(v["homeGoals"], Value::Null);
        assert_eq!(v["homeName"], "Arsenal");
    }
}
