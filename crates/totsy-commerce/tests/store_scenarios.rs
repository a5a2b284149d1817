//! End-to-end behavior of ranking and the list store through the public API.

use std::cell::Cell;
use std::rc::Rc;
use totsy_cache::Cache;
use totsy_commerce::prelude::*;

fn counting(store: &ListStore) -> (Subscription, Rc<Cell<u32>>) {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    let subscription = store.subscribe(move || seen.set(seen.get() + 1));
    (subscription, count)
}

#[test]
fn test_rank_orders_by_score_without_terms() {
    let catalog = Catalog::new(vec![
        Product::new("a", "Alpha", "Acme", "Misc", 1.0, 0.5),
        Product::new("b", "Beta", "Acme", "Misc", 1.0, 0.9),
    ])
    .unwrap();

    let ranked = rank(&catalog, &SuggestionQuery::new());
    let ids: Vec<&str> = ranked.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn test_rank_is_stable_on_builtin_catalog() {
    let catalog = Catalog::builtin();
    let ranked = rank(&catalog, &SuggestionQuery::new());

    for pair in ranked.windows(2) {
        assert!(pair[0].score >= pair[1].score);
        if pair[0].score == pair[1].score {
            let pos = |id: &ProductId| catalog.iter().position(|p| &p.id == id).unwrap();
            assert!(pos(&pair[0].id) < pos(&pair[1].id));
        }
    }
}

#[test]
fn test_suggestions_highlight_top_two() {
    let query = SuggestionQuery::new().with_terms_raw("stroller, jogger");
    let suggestions = Ranker::new().suggest(&Catalog::builtin(), &query);

    let top: Vec<&str> = suggestions
        .top(DEFAULT_TOP_N)
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(top, vec!["stroller-city", "stroller-uppa"]);
    assert_eq!(suggestions.more(DEFAULT_TOP_N).len(), 8);
}

#[test]
fn test_create_then_add_item() {
    let store = ListStore::open(Cache::memory());
    let id = store.create_list(NewList::new("Shower"));
    store.add_item(&id, NewItem::new("Bottle", "x", true));

    let list = store.list(&id).unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(
        list.items[0].votes,
        Votes {
            thumbs_up: 0,
            thumbs_down: 0,
            user_vote: None
        }
    );
    assert!(list.items[0].comments.is_empty());
}

#[test]
fn test_double_up_vote_counts_once() {
    let store = ListStore::open(Cache::memory());
    let id = store.create_list(NewList::new("Shower"));
    let item = store.add_item(&id, NewItem::new("Bottle", "x", true)).unwrap();

    store.vote(&id, &item, Vote::Up);
    store.vote(&id, &item, Vote::Up);

    let votes = store.list(&id).unwrap().item(&item).unwrap().votes;
    assert_eq!(votes.thumbs_up, 1);
    assert_eq!(votes.user_vote, Some(Vote::Up));
}

#[test]
fn test_vote_direction_switch() {
    let store = ListStore::open(Cache::memory());
    let id = store.create_list(NewList::new("Shower"));
    let item = store.add_item(&id, NewItem::new("Bottle", "x", true)).unwrap();
    let baseline = store.list(&id).unwrap().item(&item).unwrap().votes;

    store.vote(&id, &item, Vote::Up);
    store.vote(&id, &item, Vote::Down);

    let votes = store.list(&id).unwrap().item(&item).unwrap().votes;
    assert_eq!(votes.thumbs_up, baseline.thumbs_up);
    assert_eq!(votes.thumbs_down, baseline.thumbs_down + 1);
    assert_eq!(votes.user_vote, Some(Vote::Down));
}

#[test]
fn test_comment_on_unknown_item_is_silent() {
    let store = ListStore::open(Cache::memory());
    let id = store.create_list(NewList::new("Shower"));
    store.add_item(&id, NewItem::new("Bottle", "x", true));
    let before = store.list(&id).unwrap();
    let (_subscription, notified) = counting(&store);

    let result = store.add_comment(&id, &ItemId::new("nope"), "hello", Some("Sam"));

    assert!(result.is_none());
    assert_eq!(store.list(&id).unwrap(), before);
    assert_eq!(notified.get(), 0);
}

#[test]
fn test_every_mutation_notifies() {
    let store = ListStore::open(Cache::memory());
    let (subscription, notified) = counting(&store);

    let id = store.create_list(NewList::new("Shower"));
    let item = store.add_item(&id, NewItem::new("Bottle", "x", true)).unwrap();
    store.vote(&id, &item, Vote::Down);
    store.add_comment(&id, &item, "nice", None);
    store.update_list(&id, ListUpdate::new().public(true));
    store.remove_item(&id, &item);
    store.delete_list(&id);
    assert_eq!(notified.get(), 7);

    assert!(subscription.unsubscribe());
    store.create_list(NewList::new("Quiet"));
    assert_eq!(notified.get(), 7);
}

#[test]
fn test_public_list_found_by_share_code() {
    let store = ListStore::open(Cache::memory());
    let id = store.create_list(NewList::new("Registry").public(true));
    let list = store.list(&id).unwrap();
    let code = list.share_code().unwrap().to_string();

    assert!(is_share_code(&code));
    assert_eq!(store.share_path(&id), Some(format!("/shared/{}", code)));
    assert_eq!(store.find_by_share_code(&code).unwrap().name, "Registry");
}

#[test]
fn test_picks_flow_into_a_saved_list() {
    let catalog = Catalog::builtin();
    let mut board = PickBoard::new();
    for product in Ranker::new()
        .suggest(&catalog, &SuggestionQuery::new().with_term("monitor"))
        .top(DEFAULT_TOP_N)
    {
        board.add(product);
    }

    let store = ListStore::open(Cache::memory());
    let id = store.create_list(NewList::new("Monitors"));
    for pick in board.picks() {
        store.add_item(&id, NewItem::from(&pick.product));
    }

    let list = store.list(&id).unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.estimated_total() > 0.0);
}
