//! Integration tests for the query controller and search debouncer

use async_trait::async_trait;
use core_catalog::error::{CatalogError, Result};
use core_catalog::fetch::PageFetcher;
use core_catalog::models::{MediaCategory, MediaSummary};
use core_catalog::pagination::ResultPage;
use core_catalog::query::{QueryDescription, SortKey};
use core_catalog::{FetchOutcome, QueryController, ResultsView, SearchDebouncer};
use core_runtime::events::{CoreEvent, EventBus, QueryEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

fn page_of(query: &QueryDescription, total_count: u64) -> ResultPage {
    let offset = u64::from(query.page.saturating_sub(1)) * u64::from(query.page_size);
    let remaining = total_count.saturating_sub(offset);
    let items = (0..remaining.min(u64::from(query.page_size)))
        .map(|i| MediaSummary {
            id: offset + i + 1,
            title: format!("Title {}", offset + i + 1),
            category: MediaCategory::Book,
            status: "Reading".to_string(),
            rating: Some(7),
        })
        .collect();
    ResultPage::new(items, total_count, query)
}

/// Answers immediately from a closure and records every query it sees.
struct FnFetcher<F> {
    respond: F,
    calls: Mutex<Vec<QueryDescription>>,
}

impl<F> FnFetcher<F>
where
    F: Fn(&QueryDescription) -> Result<ResultPage> + Send + Sync,
{
    fn new(respond: F) -> Arc<Self> {
        Arc::new(Self {
            respond,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<QueryDescription> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> PageFetcher for FnFetcher<F>
where
    F: Fn(&QueryDescription) -> Result<ResultPage> + Send + Sync,
{
    async fn fetch_page(&self, query: &QueryDescription) -> Result<ResultPage> {
        self.calls.lock().unwrap().push(query.clone());
        (self.respond)(query)
    }
}

/// Holds each fetch open until the test releases it by search term.
#[derive(Default)]
struct GatedFetcher {
    gates: Mutex<HashMap<String, oneshot::Sender<Result<ResultPage>>>>,
}

impl GatedFetcher {
    async fn wait_for_pending(&self, count: usize) {
        while self.gates.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }

    fn release(&self, search_term: &str, result: Result<ResultPage>) {
        let gate = self.gates.lock().unwrap().remove(search_term).unwrap();
        gate.send(result).ok();
    }
}

#[async_trait]
impl PageFetcher for GatedFetcher {
    async fn fetch_page(&self, query: &QueryDescription) -> Result<ResultPage> {
        let (tx, rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .insert(query.search_term.clone(), tx);
        rx.await
            .unwrap_or_else(|_| Err(CatalogError::Network("gate dropped".to_string())))
    }
}

async fn loaded_controller(total: Arc<AtomicU64>) -> (
    QueryController,
    Arc<FnFetcher<impl Fn(&QueryDescription) -> Result<ResultPage> + Send + Sync>>,
) {
    let fetcher = FnFetcher::new(move |query: &QueryDescription| {
        Ok(page_of(query, total.load(Ordering::SeqCst)))
    });
    let controller = QueryController::new(fetcher.clone(), 24, None);
    let outcome = controller.refresh().unwrap().wait().await;
    assert_eq!(outcome, FetchOutcome::Applied);
    (controller, fetcher)
}

#[tokio::test]
async fn test_default_query_end_to_end() {
    let (controller, fetcher) = loaded_controller(Arc::new(AtomicU64::new(23))).await;

    let calls = fetcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], QueryDescription::default());
    assert_eq!(calls[0].to_query_string(), "?page=1&page_size=24");

    match controller.current_results() {
        ResultsView::Ready { page } => {
            assert_eq!(page.items.len(), 23);
            assert_eq!(page.total_count, 23);
            assert_eq!(page.total_pages, 1);
        }
        other => panic!("expected ready view, got {:?}", other),
    }
}

#[tokio::test]
async fn test_results_loading_until_first_fetch() {
    let fetcher = FnFetcher::new(|query: &QueryDescription| Ok(page_of(query, 5)));
    let controller = QueryController::new(fetcher.clone(), 24, None);

    assert_eq!(controller.current_results(), ResultsView::Loading);
    assert_eq!(controller.epoch(), 0);
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_filters_reset_page_and_refetch() {
    let (controller, fetcher) = loaded_controller(Arc::new(AtomicU64::new(24 * 5))).await;

    controller.set_page(3).unwrap().wait().await;
    assert_eq!(controller.query().page, 3);

    controller
        .set_category(Some(MediaCategory::Book))
        .unwrap()
        .wait()
        .await;
    assert_eq!(controller.query().page, 1);

    controller.set_page(3).unwrap().wait().await;
    controller.set_status(Some("Reading")).unwrap().wait().await;
    assert_eq!(controller.query().page, 1);

    controller.set_page(3).unwrap().wait().await;
    controller.set_sort_key(SortKey::TitleDesc).unwrap().wait().await;
    assert_eq!(controller.query().page, 1);

    controller.set_page(3).unwrap().wait().await;
    controller.set_search_term("dune").unwrap().wait().await;
    assert_eq!(controller.query().page, 1);

    let last = fetcher.calls().pop().unwrap();
    assert_eq!(
        last.to_query_string(),
        "?page=1&page_size=24&search=dune&category=1&status=Reading&ordering=-title"
    );
}

#[tokio::test]
async fn test_set_page_keeps_filters() {
    let (controller, fetcher) = loaded_controller(Arc::new(AtomicU64::new(24 * 6))).await;
    controller.set_search_term("dune").unwrap().wait().await;
    controller
        .set_category(Some(MediaCategory::Book))
        .unwrap()
        .wait()
        .await;

    controller.set_page(5).unwrap().wait().await;

    let last = fetcher.calls().pop().unwrap();
    assert_eq!(last.page, 5);
    assert_eq!(last.search_term, "dune");
    assert_eq!(last.category, Some(MediaCategory::Book));
}

#[tokio::test]
async fn test_out_of_range_page_is_noop() {
    let (controller, fetcher) = loaded_controller(Arc::new(AtomicU64::new(30))).await;
    let epoch = controller.epoch();

    assert!(controller.set_page(0).is_none());
    assert!(controller.set_page(3).is_none());

    assert_eq!(controller.epoch(), epoch);
    assert_eq!(fetcher.calls().len(), 1);
    assert!(controller.current_results().page().is_some());
}

#[tokio::test]
async fn test_category_change_clears_invalid_status() {
    let (controller, fetcher) = loaded_controller(Arc::new(AtomicU64::new(10))).await;

    controller
        .set_category(Some(MediaCategory::Anime))
        .unwrap()
        .wait()
        .await;
    assert_eq!(controller.status_options()[0], "To Watch");
    controller.set_status(Some("Watching")).unwrap().wait().await;

    controller.set_category(None).unwrap().wait().await;
    assert_eq!(controller.query().status, None);
    assert_eq!(
        controller.status_options(),
        &["Completed", "On Hold", "Dropped"]
    );

    let last = fetcher.calls().pop().unwrap();
    assert_eq!(last.to_query_string(), "?page=1&page_size=24");
}

#[tokio::test]
async fn test_stale_response_discarded() {
    let fetcher = Arc::new(GatedFetcher::default());
    let bus = EventBus::new(32);
    let mut events = bus.subscribe();
    let controller = QueryController::new(fetcher.clone(), 24, Some(bus));

    let first = controller.set_search_term("a").unwrap();
    let second = controller.set_search_term("b").unwrap();
    assert_eq!(first.epoch(), 1);
    assert_eq!(second.epoch(), 2);

    fetcher.wait_for_pending(2).await;

    let query_b = controller.query();
    fetcher.release("b", Ok(page_of(&query_b, 3)));
    assert_eq!(second.wait().await, FetchOutcome::Applied);

    let mut query_a = query_b.clone();
    query_a.search_term = "a".to_string();
    fetcher.release("a", Ok(page_of(&query_a, 40)));
    assert_eq!(first.wait().await, FetchOutcome::Stale);

    let page = controller.current_results().page().cloned().unwrap();
    assert_eq!(page.total_count, 3);
    assert_eq!(controller.query().search_term, "b");

    let mut saw_stale = false;
    while let Ok(event) = events.try_recv() {
        if let CoreEvent::Query(QueryEvent::StaleResponseDiscarded {
            epoch,
            current_epoch,
        }) = event
        {
            assert_eq!((epoch, current_epoch), (1, 2));
            saw_stale = true;
        }
    }
    assert!(saw_stale);
}

#[tokio::test]
async fn test_error_state_discards_previous_page() {
    let fail = Arc::new(AtomicU64::new(0));
    let fail_flag = Arc::clone(&fail);
    let fetcher = FnFetcher::new(move |query: &QueryDescription| {
        match fail_flag.load(Ordering::SeqCst) {
            0 => Ok(page_of(query, 12)),
            1 => Err(CatalogError::Http {
                status: 404,
                message: Some("Not found.".to_string()),
            }),
            2 => Err(CatalogError::Http {
                status: 500,
                message: None,
            }),
            _ => Err(CatalogError::Network("connection refused".to_string())),
        }
    });
    let controller = QueryController::new(fetcher, 24, None);
    controller.refresh().unwrap().wait().await;
    assert!(controller.current_results().page().is_some());

    let expected = [
        (1, "Error: 404 - Not found."),
        (2, "Error: 500 - An error occurred."),
        (3, "Network error: Unable to reach the server."),
    ];
    for (mode, message) in expected {
        fail.store(mode, Ordering::SeqCst);
        let outcome = controller.refresh().unwrap().wait().await;
        assert_eq!(outcome, FetchOutcome::Failed(message.to_string()));
        assert_eq!(
            controller.current_results(),
            ResultsView::Error {
                message: message.to_string()
            }
        );
    }

    fail.store(0, Ordering::SeqCst);
    assert_eq!(controller.refresh().unwrap().wait().await, FetchOutcome::Applied);
}

#[tokio::test]
async fn test_shrinking_results_clamp_page() {
    let total = Arc::new(AtomicU64::new(24 * 4));
    let (controller, fetcher) = loaded_controller(Arc::clone(&total)).await;

    total.store(30, Ordering::SeqCst);
    let outcome = controller.set_page(4).unwrap().wait().await;
    assert_eq!(outcome, FetchOutcome::Applied);

    let pages: Vec<u32> = fetcher.calls().iter().map(|q| q.page).collect();
    assert_eq!(pages, vec![1, 4, 2]);
    assert_eq!(controller.query().page, 2);

    let page = controller.current_results().page().cloned().unwrap();
    assert_eq!(page.page, 2);
    assert_eq!(page.items.len(), 6);
}

#[tokio::test]
async fn test_lifecycle_events() {
    let bus = EventBus::new(16);
    let mut events = bus.subscribe();
    let fetcher = FnFetcher::new(|query: &QueryDescription| Ok(page_of(query, 23)));
    let controller = QueryController::new(fetcher, 24, Some(bus));

    controller.refresh().unwrap().wait().await;

    assert_eq!(
        events.recv().await.unwrap(),
        CoreEvent::Query(QueryEvent::FetchStarted {
            epoch: 1,
            query: "?page=1&page_size=24".to_string(),
        })
    );
    assert_eq!(
        events.recv().await.unwrap(),
        CoreEvent::Query(QueryEvent::ResultsReady {
            epoch: 1,
            total_count: 23,
            total_pages: 1,
            page: 1,
        })
    );
}

#[test]
fn test_mutation_without_runtime_issues_no_fetch() {
    let fetcher = FnFetcher::new(|query: &QueryDescription| Ok(page_of(query, 1)));
    let controller = QueryController::new(fetcher.clone(), 24, None);

    assert!(controller.set_search_term("dune").is_none());
    assert_eq!(controller.query().search_term, "dune");
    assert!(fetcher.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_debouncer_forwards_last_term() {
    let fetcher = FnFetcher::new(|query: &QueryDescription| Ok(page_of(query, 2)));
    let controller = QueryController::new(fetcher.clone(), 24, None);
    let debouncer = SearchDebouncer::new(controller.clone(), Duration::from_millis(300));

    debouncer.input("n");
    tokio::time::sleep(Duration::from_millis(100)).await;
    debouncer.input("na");
    tokio::time::sleep(Duration::from_millis(100)).await;
    debouncer.input("nar");

    tokio::time::sleep(Duration::from_millis(299)).await;
    assert!(fetcher.calls().is_empty());
    assert!(debouncer.has_pending());

    tokio::time::sleep(Duration::from_millis(20)).await;
    let calls = fetcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].search_term, "nar");
    assert_eq!(controller.query().search_term, "nar");
}

#[tokio::test(start_paused = true)]
async fn test_debouncer_cancel_and_minimum_delay() {
    let fetcher = FnFetcher::new(|query: &QueryDescription| Ok(page_of(query, 2)));
    let controller = QueryController::new(fetcher.clone(), 24, None);
    let debouncer = SearchDebouncer::new(controller, Duration::from_millis(50));
    assert_eq!(debouncer.delay(), Duration::from_millis(300));

    debouncer.input("frieren");
    debouncer.cancel();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(fetcher.calls().is_empty());
    assert!(!debouncer.has_pending());
}
