//! Reference search schemas for the demo console's alert and submission
//! screens.

use codec::{ParserOptions, Prefixes, SearchParser};
use schema::{boolean, create_search_params, filters, number, string, Schema};

/// Prefix marking a negated filter entry.
pub const NOT_PREFIX: &str = "-";
/// Prefix marking a filter entry kept out of shareable links.
pub const IGNORE_PREFIX: &str = "~";

pub const DEFAULT_ROWS: i64 = 25;
pub const MAX_ROWS: i64 = 500;
pub const TRACK_TOTAL_HITS: i64 = 10_000;

/// Time-constraint choices on the alert screen.
pub const TIME_CONSTRAINTS: [&str; 6] = ["24h", "4d", "7d", "1m", "1y", "all"];

/// Screens with a demo schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoScreen {
    Alerts,
    Submissions,
}

impl DemoScreen {
    pub const ALL: [Self; 2] = [Self::Alerts, Self::Submissions];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Alerts => "alerts",
            Self::Submissions => "submissions",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|screen| screen.name() == name)
    }

    pub fn schema(self) -> Schema {
        match self {
            Self::Alerts => alert_search_schema(),
            Self::Submissions => submission_search_schema(),
        }
    }

    pub fn parser(self) -> SearchParser {
        SearchParser::new(self.schema(), parser_options()).expect("demo parser must be valid")
    }
}

/// Alert list: grouped, time-constrained, filterable.
pub fn alert_search_schema() -> Schema {
    create_search_params(|p| {
        p.field("query", string(""))
            .field("offset", number(0).min(0))
            .field("rows", number(DEFAULT_ROWS).min(0).max(MAX_ROWS).enforced())
            .field("sort", string("reporting_ts desc").ignored())
            .field("tc", string("4d").options(TIME_CONSTRAINTS))
            .field("group_by", string("file.sha256"))
            .field("filters", filters(Vec::<String>::new()))
            .field("track_total_hits", number(TRACK_TOTAL_HITS).nullable().ignored())
            .field("refresh", boolean(false).hidden().ignored())
    })
    .expect("alert schema must be valid")
}

/// Submission list: plain paginated search.
pub fn submission_search_schema() -> Schema {
    create_search_params(|p| {
        p.field("query", string(""))
            .field("offset", number(0).min(0))
            .field("rows", number(DEFAULT_ROWS).min(0).max(MAX_ROWS).enforced())
            .field("sort", string("times.submitted desc").ignored())
            .field("filters", filters(Vec::<String>::new()))
            .field("track_total_hits", number(TRACK_TOTAL_HITS).nullable().ignored())
            .field("refresh", boolean(false).hidden().ignored())
    })
    .expect("submission schema must be valid")
}

/// Console-wide parser options: `-` negates, `~` keeps out of links.
pub fn parser_options() -> ParserOptions {
    ParserOptions::new().prefixes(Prefixes::new(NOT_PREFIX, IGNORE_PREFIX))
}
