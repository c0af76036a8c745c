//! Shared test setup and document fixtures.

use std::sync::Once;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Canvas, Collection, Manifest, Range};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let noisy_modules = ["config"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Midnight UTC on `date` (`YYYY-MM-DD`); None for anything unparsable.
pub fn utc_date(date: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

pub fn canvas(id: &str) -> Canvas {
    Canvas {
        id: id.to_string(),
        label: format!("p. {id}"),
    }
}

pub fn range(id: &str, canvas_ids: &[&str], ranges: Vec<Range>) -> Range {
    Range {
        id: id.to_string(),
        label: format!("Range {id}"),
        nav_date: None,
        canvas_ids: canvas_ids.iter().map(|c| c.to_string()).collect(),
        ranges,
    }
}

/// Manifest with `date` as navDate and a single canvas `<id>-c1`.
pub fn issue(id: &str, date: Option<&str>) -> Manifest {
    Manifest {
        id: id.to_string(),
        label: format!("Issue {id}"),
        nav_date: date.and_then(utc_date),
        canvases: vec![canvas(&format!("{id}-c1"))],
        structures: Vec::new(),
    }
}

/// Book-like manifest; range labels are `Range <id>`:
///
/// ```text
/// r0
/// ├── r1    c1
/// ├── r2    (no canvases)
/// │   ├── r3    c2 c3
/// │   └── r4    c4
/// └── r5    c5
/// ```
///
/// A second top range `toc2` holds only `r6`.
pub fn book_manifest() -> Manifest {
    Manifest {
        id: "book".to_string(),
        label: "Book".to_string(),
        nav_date: None,
        canvases: ["c1", "c2", "c3", "c4", "c5"].iter().map(|id| canvas(id)).collect(),
        structures: vec![
            range(
                "r0",
                &[],
                vec![
                    range("r1", &["c1"], Vec::new()),
                    range(
                        "r2",
                        &[],
                        vec![
                            range("r3", &["c2", "c3"], Vec::new()),
                            range("r4", &["c4"], Vec::new()),
                        ],
                    ),
                    range("r5", &["c5"], Vec::new()),
                ],
            ),
            range("toc2", &[], vec![range("r6", &["c1"], Vec::new())]),
        ],
    }
}

/// Periodical collection with issues dated 1923-05-01, 1923-11-20,
/// 1931-02-14 and one undated issue.
pub fn periodical_collection() -> Collection {
    Collection {
        id: "periodical".to_string(),
        label: "Periodical".to_string(),
        nav_date: None,
        manifests: vec![
            issue("m-1923-11", Some("1923-11-20")),
            issue("m-1931", Some("1931-02-14")),
            issue("m-undated", None),
            issue("m-1923-05", Some("1923-05-01")),
        ],
        collections: Vec::new(),
    }
}
