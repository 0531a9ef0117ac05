mod common;

use common::FakeApi;
use repo_finder::{run_query_pipeline, GithubApi, SearchUpdate, SearchView, SEARCH_ERROR_MESSAGE};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    time::{sleep, Instant},
};

const DEBOUNCE: Duration = Duration::from_millis(500);

fn start(
    api: FakeApi,
) -> (
    Arc<FakeApi>,
    UnboundedSender<String>,
    UnboundedReceiver<SearchUpdate>,
) {
    let api = Arc::new(api);
    let (query_tx, query_rx) = unbounded_channel();
    let (update_tx, update_rx) = unbounded_channel();
    let dyn_api: Arc<dyn GithubApi> = api.clone();
    tokio::spawn(run_query_pipeline(dyn_api, DEBOUNCE, query_rx, update_tx));
    (api, query_tx, update_rx)
}

fn names(update: &SearchUpdate) -> Vec<String> {
    update
        .result
        .as_ref()
        .unwrap()
        .iter()
        .map(|repo| repo.name.clone())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn burst_searches_only_last_query_after_quiet_window() {
    let (api, queries, mut updates) = start(FakeApi::default());

    queries.send("r".to_owned()).unwrap();
    sleep(Duration::from_millis(100)).await;
    queries.send("ru".to_owned()).unwrap();
    sleep(Duration::from_millis(100)).await;
    queries.send("  rust ".to_owned()).unwrap();
    let last_event = Instant::now();

    let update = updates.recv().await.unwrap();
    assert_eq!(update.query, "rust");
    assert_eq!(names(&update), vec!["rust"]);
    assert!(Instant::now() - last_event >= DEBOUNCE);
    assert_eq!(api.searches(), vec!["rust"]);
}

#[tokio::test(start_paused = true)]
async fn identical_consecutive_queries_search_once() {
    let (api, queries, mut updates) = start(FakeApi::default());

    queries.send("rust".to_owned()).unwrap();
    assert_eq!(updates.recv().await.unwrap().query, "rust");

    queries.send(" rust  ".to_owned()).unwrap();
    sleep(Duration::from_millis(600)).await;
    queries.send("go".to_owned()).unwrap();

    // the second "rust" never produced an update
    assert_eq!(updates.recv().await.unwrap().query, "go");
    assert_eq!(api.searches(), vec!["rust", "go"]);
}

#[tokio::test(start_paused = true)]
async fn blank_input_never_searches() {
    let (api, queries, mut updates) = start(FakeApi::default());

    queries.send(String::new()).unwrap();
    queries.send("   \t".to_owned()).unwrap();
    sleep(Duration::from_secs(2)).await;
    assert!(updates.try_recv().is_err());

    drop(queries);
    assert!(updates.recv().await.is_none());
    assert!(api.searches().is_empty());
}

#[tokio::test(start_paused = true)]
async fn blank_input_does_not_restart_the_quiet_window() {
    let (_api, queries, mut updates) = start(FakeApi::default());

    queries.send("rust".to_owned()).unwrap();
    let first_event = Instant::now();
    sleep(Duration::from_millis(300)).await;
    queries.send("  ".to_owned()).unwrap();

    assert_eq!(updates.recv().await.unwrap().query, "rust");
    let elapsed = Instant::now() - first_event;
    assert!(elapsed >= DEBOUNCE);
    assert!(elapsed < DEBOUNCE + Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn failure_is_reported_and_the_stream_keeps_going() {
    let (api, queries, mut updates) = start(FakeApi::default().failing("boom"));
    let mut view = SearchView::new(queries);

    view.on_text_change("rust").unwrap();
    view.apply(updates.recv().await.unwrap());
    assert_eq!(view.repositories.len(), 1);

    view.on_text_change("boom").unwrap();
    let update = updates.recv().await.unwrap();
    let info = update.result.clone().unwrap_err();
    assert_eq!(info.message, SEARCH_ERROR_MESSAGE);
    view.apply(update);
    assert!(view.repositories.is_empty());
    assert_eq!(view.error_message.as_deref(), Some(SEARCH_ERROR_MESSAGE));

    // cleared on the next keystroke, before any result comes back
    view.on_text_change("tokio").unwrap();
    assert_eq!(view.error_message, None);
    let update = updates.recv().await.unwrap();
    assert_eq!(names(&update), vec!["tokio"]);
    view.apply(update);
    assert_eq!(view.repositories.len(), 1);
    assert_eq!(view.error_message, None);

    assert_eq!(api.searches(), vec!["rust", "boom", "tokio"]);
}

#[tokio::test(start_paused = true)]
async fn stale_search_results_are_discarded() {
    let (api, queries, mut updates) =
        start(FakeApi::default().delay("slow", Duration::from_secs(2)));

    queries.send("slow".to_owned()).unwrap();
    // "slow" is in flight once the quiet window is over
    sleep(Duration::from_millis(600)).await;
    queries.send("fast".to_owned()).unwrap();

    let update = updates.recv().await.unwrap();
    assert_eq!(update.query, "fast");

    sleep(Duration::from_secs(3)).await;
    assert!(updates.try_recv().is_err());
    // nothing was cancelled on the transport side
    assert_eq!(api.searches(), vec!["slow", "fast"]);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_query_keeps_previous_results() {
    let (api, queries, mut updates) = start(FakeApi::default());
    let mut view = SearchView::new(queries);

    view.on_text_change("rust").unwrap();
    view.apply(updates.recv().await.unwrap());
    view.on_text_change("").unwrap();
    sleep(Duration::from_secs(1)).await;

    assert!(updates.try_recv().is_err());
    assert_eq!(view.repositories.len(), 1);
    assert_eq!(api.searches(), vec!["rust"]);
}

#[tokio::test(start_paused = true)]
async fn closing_input_flushes_the_pending_query() {
    let (_api, queries, mut updates) = start(FakeApi::default());
    let began = Instant::now();

    queries.send("rust".to_owned()).unwrap();
    drop(queries);

    let update = updates.recv().await.unwrap();
    assert_eq!(update.query, "rust");
    assert!(Instant::now() - began < DEBOUNCE);
    assert!(updates.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn generations_increase_with_every_search() {
    let (_api, queries, mut updates) = start(FakeApi::default());

    queries.send("rust".to_owned()).unwrap();
    let first = updates.recv().await.unwrap();
    queries.send("go".to_owned()).unwrap();
    let second = updates.recv().await.unwrap();

    assert!(second.generation > first.generation);
}
