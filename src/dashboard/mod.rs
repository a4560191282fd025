use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::scores::ScoreService;

#[derive(Clone)]
pub struct AppState {
    pub scores: Arc<ScoreService>,
}

/// Build the Axum router for the scoreboard page and its API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/scores", get(scores_handler))
        .route("/healthz", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve the single-page scoreboard.
async fn index_handler() -> impl IntoResponse {
    Html(SCOREBOARD_HTML)
}

/// GET /api/scores
///
/// Upstream failures become a 502 with no partial data.
async fn scores_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.scores.current().await {
        Ok(board) => Json(board).into_response(),
        Err(e) => {
            error!("Scoreboard failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Embedded single-file scoreboard (HTML + CSS + JS). Polls `/api/scores`.
const SCOREBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Football Scores</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --green: #00c896;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: baseline; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  header .meta { color: var(--muted); font-size: .8rem; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; }
  .row { display: grid; grid-template-columns: 4rem 1fr 3rem 1fr; gap: .5rem; padding: .6rem 1.2rem; font-size: .9rem; border-bottom: 1px solid #1e2130; }
  .row:last-child { border-bottom: none; }
  .row .clock { color: var(--muted); }
  .row.live .clock { color: var(--green); font-weight: 700; }
  .row .score { text-align: center; font-weight: 700; }
  .row .away { text-align: right; }
  .empty { padding: .8rem 1.2rem; color: var(--muted); font-size: .85rem; }
  .error { color: #ff4f6a; padding: 1rem 2rem; }
</style>
</head>
<body>
<header>
  <h1>Football Scores</h1>
  <span class="meta" id="meta">loading…</span>
</header>
<div class="error" id="error" hidden></div>
<main id="leagues"></main>
<script>
const POLL_MS = 30000;

function kickoff(iso, tz) {
  if (!iso) return '';
  return new Date(iso).toLocaleTimeString('en-GB', { hour: '2-digit', minute: '2-digit', timeZone: tz });
}

function row(f, tz) {
  const live = f.isLive;
  const clock = live ? (f.minute || f.statusShort) : kickoff(f.kickoffISO, tz);
  const score = live ? `${f.homeGoals ?? 0} - ${f.awayGoals ?? 0}` : 'v';
  return `<div class="row ${live ? 'live' : ''}">
    <span class="clock">${clock}</span>
    <span class="home" title="${f.homeName ?? ''}">${f.home}</span>
    <span class="score">${score}</span>
    <span class="away" title="${f.awayName ?? ''}">${f.away}</span>
  </div>`;
}

function render(data) {
  document.getElementById('meta').textContent =
    `Season ${data.season}/${(data.season + 1) % 100} · ${data.timezone} · updated ${new Date(data.generatedAt).toLocaleTimeString()}`;
  document.getElementById('leagues').innerHTML = Object.values(data.leagues).map(lg => {
    const fixtures = lg.live.length ? lg.live : lg.upcoming;
    const body = fixtures.length
      ? fixtures.map(f => row(f, data.timezone)).join('')
      : '<div class="empty">No live or upcoming matches today</div>';
    return `<section class="panel"><div class="panel-header">${lg.leagueName}</div>${body}</section>`;
  }).join('');
}

async function refresh() {
  const err = document.getElementById('error');
  try {
    const resp = await fetch('/api/scores');
    const data = await resp.json();
    if (!resp.ok) throw new Error(data.error || resp.statusText);
    err.hidden = true;
    render(data);
  } catch (e) {
    err.textContent = `Could not load scores: ${e.message}`;
    err.hidden = false;
  }
}

refresh();
setInterval(refresh, POLL_MS);
</script>
</body>
</html>
"#;
