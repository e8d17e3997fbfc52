//! End-to-end tests for `Analyzer::analyze` with in-process stub adapters.
//!
//! Stubs count their invocations so the tests can assert exactly which
//! adapters the fallback chain touched. Time-dependent cases run on tokio's
//! paused clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use followback_analyzer::{AnalyzeError, Analyzer, AnalyzerSettings};
use followback_core::{DataSource, ProfileSnapshot, RelationshipEntry, Username};
use followback_scraper::{
    collect_pages, Page, PaginationLimits, ProfileSource, RelationshipLists, RelationshipSource,
    SourceError,
};

#[derive(Clone, Copy)]
enum Behavior {
    Network,
    RateLimited,
    Unparseable,
    Succeed { followers: u64, following: u64 },
    Hang,
}

struct StubProfile {
    name: &'static str,
    available: bool,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

fn snapshot(username: &str, followers: u64, following: u64) -> ProfileSnapshot {
    ProfileSnapshot {
        username: username.to_owned(),
        is_public: true,
        display_name: username.to_owned(),
        bio: String::new(),
        avatar_url: String::new(),
        website_url: String::new(),
        posts_count: 5,
        followers_count: followers,
        following_count: following,
        internal_user_id: None,
    }
}

#[async_trait]
impl ProfileSource for StubProfile {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn fetch_profile(&self, username: &Username) -> Result<ProfileSnapshot, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Network => Err(SourceError::UnexpectedStatus {
                status: 503,
                url: format!("https://stub/{}", self.name),
            }),
            Behavior::RateLimited => Err(SourceError::RateLimited {
                url: format!("https://stub/{}", self.name),
                retry_after_secs: 60,
            }),
            Behavior::Unparseable => Err(SourceError::MissingCounts {
                source_name: self.name,
            }),
            Behavior::Succeed {
                followers,
                following,
            } => Ok(snapshot(username.as_str(), followers, following)),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!("hung source must be cancelled")
            }
        }
    }
}

fn profile_stub(name: &'static str, behavior: Behavior) -> (Box<dyn ProfileSource>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let stub = StubProfile {
        name,
        available: true,
        behavior,
        calls: Arc::clone(&calls),
    };
    (Box::new(stub), calls)
}

fn unavailable_stub(name: &'static str) -> (Box<dyn ProfileSource>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let stub = StubProfile {
        name,
        available: false,
        behavior: Behavior::Network,
        calls: Arc::clone(&calls),
    };
    (Box::new(stub), calls)
}

/// Relationship stub serving fixed lists.
struct StubLists {
    lists: RelationshipLists,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl RelationshipSource for StubLists {
    fn name(&self) -> &'static str {
        "stub_lists"
    }

    async fn fetch_lists(&self, _profile: &ProfileSnapshot) -> Result<RelationshipLists, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lists.clone())
    }
}

/// Relationship stub whose provider always hands out another cursor.
struct InfiniteLists {
    limits: PaginationLimits,
    pages: Arc<AtomicUsize>,
}

#[async_trait]
impl RelationshipSource for InfiniteLists {
    fn name(&self) -> &'static str {
        "infinite_lists"
    }

    async fn fetch_lists(&self, _profile: &ProfileSnapshot) -> Result<RelationshipLists, SourceError> {
        let fetch = |prefix: &'static str| {
            let pages = Arc::clone(&self.pages);
            collect_pages(&self.limits, prefix, move |cursor| {
                let pages = Arc::clone(&pages);
                async move {
                    let n = pages.fetch_add(1, Ordering::SeqCst);
                    let page = cursor.unwrap_or_default();
                    Ok(Page::new(
                        vec![
                            RelationshipEntry::new(&format!("{prefix}_{n}_a{page}"), None, None),
                            RelationshipEntry::new(&format!("{prefix}_{n}_b"), None, None),
                        ],
                        Some(format!("cursor{n}")),
                    ))
                }
            })
        };
        Ok(RelationshipLists {
            followers: fetch("follower").await?,
            following: fetch("following").await?,
        })
    }
}

fn entry(username: &str) -> RelationshipEntry {
    RelationshipEntry::new(username, None, None)
}

fn settings() -> AnalyzerSettings {
    AnalyzerSettings {
        source_timeout: Duration::from_secs(20),
        deadline: Duration::from_secs(45),
        cache_ttl: Duration::from_secs(300),
        cache_capacity: 64,
    }
}

fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

// ---------------------------------------------------------------------------
// Fallback chain
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_success_wins_and_later_sources_are_never_called() {
    let (a, a_calls) = profile_stub("a", Behavior::Network);
    let (b, b_calls) = profile_stub("b", Behavior::RateLimited);
    let (c, c_calls) = profile_stub(
        "c",
        Behavior::Succeed {
            followers: 120,
            following: 80,
        },
    );
    let (d, d_calls) = profile_stub(
        "d",
        Behavior::Succeed {
            followers: 1,
            following: 1,
        },
    );
    let analyzer = Analyzer::new(vec![a, b, c, d], Vec::new(), settings());

    let result = analyzer.analyze("someone").await.expect("analysis succeeds");

    assert_eq!((calls(&a_calls), calls(&b_calls), calls(&c_calls)), (1, 1, 1));
    assert_eq!(calls(&d_calls), 0, "sources after the winner must not run");
    assert_eq!(result.profile.followers_count, 120);
    assert_eq!(result.profile.following_count, 80);
    assert_eq!(result.data_source, DataSource::ProfileOnly);
    assert_eq!(result.not_following_back_count, 0);
}

#[tokio::test]
async fn unavailable_source_is_skipped_without_being_called() {
    let (a, a_calls) = unavailable_stub("a");
    let (b, b_calls) = profile_stub(
        "b",
        Behavior::Succeed {
            followers: 10,
            following: 10,
        },
    );
    let analyzer = Analyzer::new(vec![a, b], Vec::new(), settings());

    let result = analyzer.analyze("someone").await.expect("analysis succeeds");

    assert_eq!(calls(&a_calls), 0);
    assert_eq!(calls(&b_calls), 1);
    assert_eq!(result.profile.followers_count, 10);
}

#[tokio::test(start_paused = true)]
async fn hung_source_times_out_and_chain_moves_on() {
    let (a, a_calls) = profile_stub("a", Behavior::Hang);
    let (b, b_calls) = profile_stub(
        "b",
        Behavior::Succeed {
            followers: 3,
            following: 4,
        },
    );
    let analyzer = Analyzer::new(
        vec![a, b],
        Vec::new(),
        AnalyzerSettings {
            source_timeout: Duration::from_secs(1),
            ..settings()
        },
    );

    let result = analyzer.analyze("someone").await.expect("analysis succeeds");

    assert_eq!((calls(&a_calls), calls(&b_calls)), (1, 1));
    assert_eq!(result.profile.following_count, 4);
}

// ---------------------------------------------------------------------------
// Relationship resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lists_produce_real_result_with_not_following_back() {
    let (p, _) = profile_stub(
        "p",
        Behavior::Succeed {
            followers: 2,
            following: 3,
        },
    );
    let list_calls = Arc::new(AtomicUsize::new(0));
    let lists = StubLists {
        lists: RelationshipLists {
            followers: vec![entry("a"), entry("b")],
            following: vec![entry("a"), entry("c"), entry("d")],
        },
        calls: Arc::clone(&list_calls),
    };
    let analyzer = Analyzer::new(vec![p], vec![Box::new(lists)], settings());

    let result = analyzer.analyze("someone").await.expect("analysis succeeds");

    assert_eq!(calls(&list_calls), 1);
    assert_eq!(result.data_source, DataSource::Real);
    let nfb: Vec<&str> = result
        .not_following_back
        .iter()
        .map(|e| e.username.as_str())
        .collect();
    assert_eq!(nfb, vec!["c", "d"]);
    assert_eq!(result.not_following_back_count, 2);
    assert_eq!(result.percent_not_following_back, 67);
    assert_eq!(result.follow_back_rate, 33);
}

#[tokio::test]
async fn empty_lists_fall_through_to_next_list_source() {
    let (p, _) = profile_stub(
        "p",
        Behavior::Succeed {
            followers: 1,
            following: 1,
        },
    );
    let empty_calls = Arc::new(AtomicUsize::new(0));
    let full_calls = Arc::new(AtomicUsize::new(0));
    let empty = StubLists {
        lists: RelationshipLists::default(),
        calls: Arc::clone(&empty_calls),
    };
    let full = StubLists {
        lists: RelationshipLists {
            followers: vec![entry("x")],
            following: vec![entry("x")],
        },
        calls: Arc::clone(&full_calls),
    };
    let analyzer = Analyzer::new(vec![p], vec![Box::new(empty), Box::new(full)], settings());

    let result = analyzer.analyze("someone").await.expect("analysis succeeds");

    assert_eq!((calls(&empty_calls), calls(&full_calls)), (1, 1));
    assert_eq!(result.data_source, DataSource::Real);
    assert_eq!(result.follow_back_rate, 100);
}

#[tokio::test]
async fn infinite_pagination_terminates_at_page_cap() {
    let (p, _) = profile_stub(
        "p",
        Behavior::Succeed {
            followers: 1,
            following: 1,
        },
    );
    let pages = Arc::new(AtomicUsize::new(0));
    let lists = InfiniteLists {
        limits: PaginationLimits {
            max_pages: 5,
            max_items: 10_000,
            rate_limit_backoff: Duration::from_millis(1),
        },
        pages: Arc::clone(&pages),
    };
    let analyzer = Analyzer::new(vec![p], vec![Box::new(lists)], settings());

    let result = analyzer.analyze("someone").await.expect("analysis succeeds");

    assert_eq!(calls(&pages), 10, "five pages per list");
    assert_eq!(result.followers.len(), 10);
    assert_eq!(result.following.len(), 10);
    assert_eq!(result.data_source, DataSource::Real);
    assert!(result.not_following_back_count <= result.profile.following_count);
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn cache_serves_identical_result_within_ttl_and_expires_after() {
    let (p, p_calls) = profile_stub(
        "p",
        Behavior::Succeed {
            followers: 50,
            following: 40,
        },
    );
    let analyzer = Analyzer::new(vec![p], Vec::new(), settings());

    let first = analyzer.analyze("@Someone").await.expect("first analysis");
    tokio::time::advance(Duration::from_secs(120)).await;
    let second = analyzer.analyze("someone").await.expect("second analysis");

    assert_eq!(calls(&p_calls), 1, "second call must be served from cache");
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    assert_eq!(analyzer.cache_entries().await, 1);

    tokio::time::advance(Duration::from_secs(180)).await;
    analyzer.analyze("someone").await.expect("third analysis");
    assert_eq!(calls(&p_calls), 2, "expired entry must trigger a refetch");
}

// ---------------------------------------------------------------------------
// Estimation, validation, deadline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn all_sources_failing_yields_estimation() {
    let (a, _) = profile_stub("a", Behavior::Network);
    let (b, _) = profile_stub("b", Behavior::Unparseable);
    let analyzer = Analyzer::new(vec![a, b], Vec::new(), settings());

    let result = analyzer.analyze("Test_User").await.expect("estimation is not an error");

    assert_eq!(result.profile.username, "test_user");
    assert_eq!(result.data_source, DataSource::RealisticEstimation);
    assert!(result.profile.followers_count > 0);
    assert_eq!(
        result.not_following_back_count,
        result.profile.following_count * 35 / 100
    );
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["dataSource"], "realistic_estimation");
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn invalid_username_is_rejected_before_any_source_runs() {
    let (a, a_calls) = profile_stub(
        "a",
        Behavior::Succeed {
            followers: 1,
            following: 1,
        },
    );
    let analyzer = Analyzer::new(vec![a], Vec::new(), settings());

    let err = analyzer
        .analyze("bad user!")
        .await
        .expect_err("invalid username must be rejected");

    assert!(matches!(err, AnalyzeError::Validation(_)), "got {err:?}");
    assert!(!err.is_retryable());
    assert_eq!(calls(&a_calls), 0);
    assert_eq!(analyzer.cache_entries().await, 0);
}

#[tokio::test(start_paused = true)]
async fn global_deadline_surfaces_timeout_and_caches_nothing() {
    let (a, _) = profile_stub("a", Behavior::Hang);
    let analyzer = Analyzer::new(
        vec![a],
        Vec::new(),
        AnalyzerSettings {
            source_timeout: Duration::from_secs(600),
            deadline: Duration::from_secs(45),
            ..settings()
        },
    );

    let err = analyzer
        .analyze("someone")
        .await
        .expect_err("deadline must fire");

    assert!(matches!(err, AnalyzeError::Timeout { secs: 45 }), "got {err:?}");
    assert!(err.is_retryable());
    assert_eq!(analyzer.cache_entries().await, 0);
}
