//! Per-league live/upcoming aggregation behind `GET /api/scores`.
//!
//! One request costs at most one combined live call plus one same-day call
//! per league that has nothing in play, all of them behind the TTL cache.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use futures_util::future::try_join_all;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::error::UpstreamError;
use crate::fixtures::NormalizedFixture;
use crate::leagues::{live_param, League};
use crate::season::today_and_season;
use crate::upstream::FixtureSource;

/// Raw `response` items of one upstream call, shared between cache hits.
pub type RawFixtures = Arc<Vec<Value>>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoreboard {
    pub generated_at: String,
    pub timezone: String,
    pub season: i32,
    /// Keyed by league slug, in tracking order
    pub leagues: IndexMap<&'static str, LeagueScores>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueScores {
    pub league_id: u32,
    pub league_name: &'static str,
    pub live: Vec<NormalizedFixture>,
    /// Not-started fixtures of the day, by kickoff. Always empty while the
    /// league has a match in play.
    pub upcoming: Vec<NormalizedFixture>,
}

pub struct ScoreService {
    source: Arc<dyn FixtureSource>,
    cache: Arc<TtlCache<RawFixtures>>,
    leagues: Vec<League>,
    timezone: Tz,
    live_ttl: Duration,
    today_ttl: Duration,
}

impl ScoreService {
    pub fn new(
        source: Arc<dyn FixtureSource>,
        cache: Arc<TtlCache<RawFixtures>>,
        leagues: &[League],
        timezone: Tz,
        live_ttl: Duration,
        today_ttl: Duration,
    ) -> Self {
        ScoreService {
            source,
            cache,
            leagues: leagues.to_vec(),
            timezone,
            live_ttl,
            today_ttl,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Scoreboard as of the current wall-clock time.
    pub async fn current(&self) -> Result<Scoreboard, UpstreamError> {
        self.scoreboard(Utc::now().with_timezone(&self.timezone)).await
    }

    /// Build the scoreboard for `now`. Any upstream failure fails the whole
    /// board; nothing partial is returned.
    pub async fn scoreboard(&self, now: DateTime<Tz>) -> Result<Scoreboard, UpstreamError> {
        let (today, season) = today_and_season(&now);

        let mut live_by_league: HashMap<i64, Vec<NormalizedFixture>> = HashMap::new();
        for fixture in self.live().await?.iter().map(NormalizedFixture::from_api) {
            live_by_league
                .entry(fixture.league_id)
                .or_default()
                .push(fixture);
        }

        let idle = self
            .leagues
            .iter()
            .filter(|l| !live_by_league.contains_key(&i64::from(l.id)));
        let mut upcoming_by_league: HashMap<u32, Vec<NormalizedFixture>> = try_join_all(
            idle.map(|league| async move {
                let fixtures = self.upcoming(league, today, season).await?;
                Ok::<_, UpstreamError>((league.id, fixtures))
            }),
        )
        .await?
        .into_iter()
        .collect();

        let mut leagues = IndexMap::with_capacity(self.leagues.len());
        for league in &self.leagues {
            let live = live_by_league
                .remove(&i64::from(league.id))
                .unwrap_or_default();
            let upcoming = upcoming_by_league
                .remove(&league.id)
                .unwrap_or_default();
            leagues.insert(
                league.slug,
                LeagueScores {
                    league_id: league.id,
                    league_name: league.name,
                    live,
                    upcoming,
                },
            );
        }

        let board = Scoreboard {
            generated_at: now.to_rfc3339(),
            timezone: self.timezone.name().to_string(),
            season,
            leagues,
        };
        info!(
            "Scoreboard {} season {}: {} live, {} upcoming",
            today,
            season,
            board.leagues.values().map(|l| l.live.len()).sum::<usize>(),
            board.leagues.values().map(|l| l.upcoming.len()).sum::<usize>(),
        );
        Ok(board)
    }

    /// In-play fixtures across every tracked league, in one upstream call.
    async fn live(&self) -> Result<RawFixtures, UpstreamError> {
        if self.leagues.is_empty() {
            return Ok(RawFixtures::default());
        }
        let ids = live_param(&self.leagues);
        let key = format!("live:{}", ids);
        self.cache
            .get_or_fetch(&key, self.live_ttl, || async {
                let items = self
                    .source
                    .live_fixtures(&ids, self.timezone.name())
                    .await?;
                debug!("{} live fixtures for {}", items.len(), ids);
                Ok::<_, UpstreamError>(Arc::new(items))
            })
            .await
    }

    /// Not-started fixtures of `league` on `date`, earliest kickoff first.
    /// Fixtures without a kickoff time sort to the front.
    async fn upcoming(
        &self,
        league: &League,
        date: NaiveDate,
        season: i32,
    ) -> Result<Vec<NormalizedFixture>, UpstreamError> {
        let key = format!("day:{}:{}:{}", league.id, date, season);
        let items = self
            .cache
            .get_or_fetch(&key, self.today_ttl, || async {
                let items = self
                    .source
                    .fixtures_on(league.id, season, date, self.timezone.name())
                    .await?;
                debug!("{} fixtures for league {} on {}", items.len(), league.id, date);
                Ok::<_, UpstreamError>(Arc::new(items))
            })
            .await?;

        let mut upcoming: Vec<NormalizedFixture> = items
            .iter()
            .map(NormalizedFixture::from_api)
            .filter(|f| f.is_upcoming)
            .collect();
        upcoming.sort_by(|a, b| {
            let a = a.kickoff_iso.as_deref().unwrap_or_default();
            let b = b.kickoff_iso.as_deref().unwrap_or_default();
            a.cmp(b)
        });
        Ok(upcoming)
    }
}
