//! Tests for the presenter's load and search cycles.

use std::sync::Arc;
use std::time::Duration;

use memorize_lib::{LookupError, WordFilterType, WordsPresenter};

use crate::support::{
    word, FakeRepository, PanickingLookup, PanickingRepository, RecordingView, ScriptedLookup,
    ViewEvent,
};

fn words(ids: &[&str]) -> ViewEvent {
    ViewEvent::Words(ids.iter().map(|id| id.to_string()).collect())
}

/// a: plain, b: favorite, c: memorized, d: plain and newest
fn stored_words() -> Vec<memorize_lib::WordRecord> {
    let mut favorite = word("b", "いぬ", 20);
    favorite.favorite = true;
    let mut memorized = word("c", "ねこ", 30);
    memorized.memorized = true;
    vec![word("a", "たべる", 10), favorite, memorized, word("d", "たべもの", 40)]
}

fn presenter(
    repository: Arc<FakeRepository>,
    lookup: Arc<ScriptedLookup>,
) -> WordsPresenter<RecordingView> {
    WordsPresenter::new(repository, lookup, RecordingView::default())
}

/// Presenter with `stored_words` loaded and the view log cleared
async fn loaded_presenter(lookup: Arc<ScriptedLookup>) -> WordsPresenter<RecordingView> {
    let repository = Arc::new(FakeRepository::with_words(stored_words()));
    let mut presenter = presenter(repository, lookup);
    presenter.load_words(false);
    presenter.run_until_idle().await;
    presenter.view_mut().take();
    presenter
}

#[tokio::test]
async fn test_default_filter_is_active() {
    let presenter = presenter(
        Arc::new(FakeRepository::with_words(vec![])),
        Arc::new(ScriptedLookup::default()),
    );
    assert_eq!(presenter.filter_type(), WordFilterType::Active);
}

#[tokio::test]
async fn test_load_words_shows_active_words_with_indicator() {
    let repository = Arc::new(FakeRepository::with_words(stored_words()));
    let mut presenter = presenter(repository.clone(), Arc::new(ScriptedLookup::default()));

    presenter.load_words(false);
    assert_eq!(presenter.view().events, vec![ViewEvent::Loading(true)]);
    assert_eq!(presenter.pending(), 1);

    presenter.run_until_idle().await;
    assert_eq!(
        presenter.view().events,
        vec![ViewEvent::Loading(true), words(&["a", "d"]), ViewEvent::Loading(false)]
    );
    assert_eq!(presenter.pending(), 0);
    assert_eq!(repository.refresh_count(), 0);
}

#[tokio::test]
async fn test_filter_types() {
    let repository = Arc::new(FakeRepository::with_words(stored_words()));
    let mut presenter = presenter(repository, Arc::new(ScriptedLookup::default()));

    presenter.set_filter_type(WordFilterType::All);
    presenter.load_words_with(false, false);
    presenter.run_until_idle().await;
    presenter.set_filter_type(WordFilterType::Recent);
    presenter.load_words_with(false, false);
    presenter.run_until_idle().await;
    presenter.set_filter_type(WordFilterType::from("bogus"));
    presenter.load_words_with(false, false);
    presenter.run_until_idle().await;

    assert_eq!(
        presenter.view().events,
        vec![words(&["a", "b", "c", "d"]), words(&["d", "a"]), words(&["a", "d"])]
    );
}

#[tokio::test]
async fn test_force_update_refreshes_repository() {
    let repository = Arc::new(FakeRepository::with_words(stored_words()));
    let mut presenter = presenter(repository.clone(), Arc::new(ScriptedLookup::default()));

    presenter.load_words(true);
    presenter.run_until_idle().await;
    assert_eq!(repository.refresh_count(), 1);
}

#[tokio::test]
async fn test_unavailable_words_show_error_and_keep_indicator() {
    let mut presenter = presenter(
        Arc::new(FakeRepository::unavailable()),
        Arc::new(ScriptedLookup::default()),
    );

    presenter.init();
    presenter.run_until_idle().await;

    // The indicator is never lowered on this path
    assert_eq!(
        presenter.view().events,
        vec![ViewEvent::Loading(true), ViewEvent::LoadingError]
    );
    assert!(presenter.cached_words().is_empty());
}

#[tokio::test]
async fn test_local_match_skips_dictionary() {
    let lookup = Arc::new(ScriptedLookup::default());
    let mut presenter = loaded_presenter(lookup.clone()).await;

    presenter.search("たべ");

    assert_eq!(
        presenter.view().events,
        vec![ViewEvent::Loading(true), words(&["a", "d"]), ViewEvent::Loading(false)]
    );
    assert_eq!(presenter.pending(), 0);
    assert!(lookup.calls().is_empty());
}

#[tokio::test]
async fn test_search_covers_unfiltered_words() {
    let lookup = Arc::new(ScriptedLookup::default());
    let mut presenter = loaded_presenter(lookup.clone()).await;
    assert_eq!(presenter.cached_words().len(), 4);

    // "b" is a favorite and hidden from the list, but still searchable
    presenter.search("いぬ");
    assert_eq!(presenter.view().events[1], words(&["b"]));
    assert!(lookup.calls().is_empty());
}

#[tokio::test]
async fn test_no_local_match_goes_remote() {
    let lookup = Arc::new(ScriptedLookup::default());
    let mut presenter = loaded_presenter(lookup.clone()).await;

    let reply = lookup.expect("のむ");
    presenter.search("のむ");
    assert_eq!(presenter.view().events, vec![ViewEvent::Loading(true)]);
    assert_eq!(presenter.pending(), 1);

    reply.send(Ok(vec![word("remote", "のむ", 50)])).unwrap();
    presenter.run_until_idle().await;

    assert_eq!(
        presenter.view().events,
        vec![ViewEvent::Loading(true), words(&["remote"]), ViewEvent::Loading(false)]
    );
    assert_eq!(lookup.calls(), vec!["のむ"]);
    // Remote hits are not cached for later local searches
    assert_eq!(presenter.cached_words().len(), 4);
}

#[tokio::test]
async fn test_empty_remote_result_is_published() {
    let lookup = Arc::new(ScriptedLookup::default());
    let mut presenter = loaded_presenter(lookup).await;

    presenter.search("zzz");
    presenter.run_until_idle().await;

    assert_eq!(
        presenter.view().events,
        vec![ViewEvent::Loading(true), words(&[]), ViewEvent::Loading(false)]
    );
}

#[tokio::test]
async fn test_remote_failures_only_clear_indicator() {
    let lookup = Arc::new(ScriptedLookup::default());
    let mut presenter = loaded_presenter(lookup.clone()).await;

    let transport = lookup.expect("x");
    let decode = lookup.expect("y");
    presenter.search("x");
    presenter.search("y");
    transport
        .send(Err(LookupError::Transport("connection reset".to_string())))
        .unwrap();
    decode
        .send(Err(LookupError::Decode("missing field `data`".to_string())))
        .unwrap();
    presenter.run_until_idle().await;

    assert_eq!(
        presenter.view().events,
        vec![
            ViewEvent::Loading(true),
            ViewEvent::Loading(true),
            ViewEvent::Loading(false),
            ViewEvent::Loading(false),
        ]
    );
}

#[tokio::test]
async fn test_overlapping_searches_last_dispatch_wins() {
    let lookup = Arc::new(ScriptedLookup::default());
    let mut presenter = loaded_presenter(lookup.clone()).await;

    let first = lookup.expect("のむ");
    let second = lookup.expect("みる");
    presenter.search("のむ");
    presenter.search("みる");
    assert_eq!(presenter.pending(), 2);

    // The newer query answers first...
    second.send(Ok(vec![word("miru", "みる", 60)])).unwrap();
    presenter.process_next().await;
    assert_eq!(presenter.view().last_words[0].id, "miru");

    // ...and the older one overwrites it
    first.send(Ok(vec![word("nomu", "のむ", 50)])).unwrap();
    presenter.process_next().await;

    let events = &presenter.view().events;
    assert_eq!(events[events.len() - 2], words(&["nomu"]));
    assert_eq!(presenter.view().last_words[0].id, "nomu");
    assert_eq!(presenter.pending(), 0);
}

#[tokio::test]
async fn test_search_remote_skips_local_scan() {
    let lookup = Arc::new(ScriptedLookup::default());
    let mut presenter = loaded_presenter(lookup.clone()).await;

    presenter.search_remote("たべる");
    presenter.run_until_idle().await;

    assert_eq!(lookup.calls(), vec!["たべる"]);
    assert_eq!(
        presenter.view().events,
        vec![words(&[]), ViewEvent::Loading(false)]
    );
}

#[tokio::test]
async fn test_open_word_details_saves_and_shows() {
    let repository = Arc::new(FakeRepository::with_words(stored_words()));
    let mut presenter = presenter(repository.clone(), Arc::new(ScriptedLookup::default()));

    let remote = word("remote", "のむ", 50);
    presenter.open_word_details(&remote);

    assert_eq!(presenter.view().events, vec![ViewEvent::Detail("remote".to_string())]);
    assert_eq!(*repository.saved.lock().unwrap(), vec![remote]);
}

#[tokio::test]
async fn test_panicking_lookup_still_clears_indicator() {
    let repository = Arc::new(FakeRepository::with_words(stored_words()));
    let mut presenter =
        WordsPresenter::new(repository, Arc::new(PanickingLookup), RecordingView::default());

    presenter.search("のむ");
    assert_eq!(presenter.pending(), 1);
    tokio::time::timeout(Duration::from_secs(2), presenter.run_until_idle())
        .await
        .expect("presenter stuck waiting for a panicked lookup");

    assert_eq!(
        presenter.view().events,
        vec![ViewEvent::Loading(true), ViewEvent::Loading(false)]
    );
    assert_eq!(presenter.pending(), 0);
}

#[tokio::test]
async fn test_panicking_repository_reports_loading_error() {
    let mut presenter = WordsPresenter::new(
        Arc::new(PanickingRepository),
        Arc::new(ScriptedLookup::default()),
        RecordingView::default(),
    );

    presenter.init();
    tokio::time::timeout(Duration::from_secs(2), presenter.run_until_idle())
        .await
        .expect("presenter stuck waiting for a panicked load");

    assert_eq!(
        presenter.view().events,
        vec![ViewEvent::Loading(true), ViewEvent::LoadingError]
    );
    assert_eq!(presenter.pending(), 0);
}
