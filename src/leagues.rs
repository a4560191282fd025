/// A competition whose fixtures are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct League {
    /// API-Football league ID
    pub id: u32,
    /// Key of this league in the `/api/scores` response
    pub slug: &'static str,
    pub name: &'static str,
}

/// The top four English tiers.
pub const TRACKED_LEAGUES: &[League] = &[
    League { id: 39, slug: "pl", name: "Premier League" },
    League { id: 40, slug: "ch", name: "Championship" },
    League { id: 41, slug: "l1", name: "League One" },
    League { id: 42, slug: "l2", name: "League Two" },
];

/// Dash-joined league IDs, the format of the `live` query parameter.
pub fn live_param(leagues: &[League]) -> String {
    leagues
        .iter()
        .map(|l| l.id.to_string())
        .collect::<Vec<_>>()
        .join("-")
}
