//! End-to-end sync runs over a seeded bookmark database and a favorites tree.

use linksync_core::store::{FavoritesStore, PlacesDb, PlacesStore};
use linksync_core::{
    CheckStatus, Error, ExclusionList, ManifestStore, OperationKind, StoreKind, SyncDirection,
    SyncEngine, SyncOptions,
};
use linksync_test_utils::{PlacesFixture, SyncFixture};
use pretty_assertions::assert_eq;
use std::fs;

fn engine_with(
    fixture: &SyncFixture,
    bookmark_exclusions: ExclusionList,
    favorite_exclusions: ExclusionList,
) -> SyncEngine {
    let db = PlacesDb::open(fixture.places_path()).unwrap();
    let bookmarks = PlacesStore::new(db, &fixture.favorites_dir(), bookmark_exclusions);
    let favorites = FavoritesStore::new(&fixture.favorites_dir(), favorite_exclusions);
    let manifests = ManifestStore::new(&fixture.profile_dir(), &fixture.favorites_dir());
    SyncEngine::new(Box::new(bookmarks), Box::new(favorites), manifests)
}

fn engine(fixture: &SyncFixture) -> SyncEngine {
    engine_with(fixture, ExclusionList::default(), ExclusionList::default())
}

#[test]
fn first_run_copies_favorites_into_bookmarks() {
    let fixture = SyncFixture::new();
    fixture.favorites.shortcut("Links/Work/site", "http://example.com");

    let report = engine(&fixture).sync().unwrap();

    assert!(report.success, "errors: {:?}", report.errors);
    assert!(report.first_run);
    let work = fixture.places.find(PlacesFixture::TOOLBAR, "Work").unwrap();
    let site = fixture.places.find(work, "site").unwrap();
    assert_eq!(fixture.places.url_of(site).as_deref(), Some("http://example.com"));
    assert!(fixture.profile_dir().join(".linksync-bookmarks.toml").is_file());
    assert!(fixture.favorites_dir().join(".linksync-favorites.toml").is_file());
}

#[test]
fn first_run_copies_bookmarks_into_favorites() {
    let fixture = SyncFixture::new();
    fixture.places.add_link(PlacesFixture::TOOLBAR, "Docs", "https://docs.rs");
    fixture.places.add_link(PlacesFixture::UNSORTED, "Later", "https://later.test");
    let news = fixture.places.add_folder(PlacesFixture::MENU, "News");
    fixture.places.add_link(news, "Paper", "https://paper.test");

    let report = engine(&fixture).sync().unwrap();

    assert!(report.success, "errors: {:?}", report.errors);
    assert_eq!(fixture.favorites.url_of("Links/Docs").as_deref(), Some("https://docs.rs"));
    assert_eq!(
        fixture.favorites.url_of("” UNCATEGORIZED ”/Later").as_deref(),
        Some("https://later.test")
    );
    assert!(fixture.favorites.has_dir("News"));
    assert!(fixture.favorites.has_shortcut("News/Paper"));
}

#[test]
fn second_run_without_changes_does_nothing() {
    let fixture = SyncFixture::new();
    fixture.favorites.shortcut("Links/Work/site", "http://example.com");
    fixture.places.add_link(PlacesFixture::MENU, "Top", "https://top.test");

    let mut engine = engine(&fixture);
    engine.sync().unwrap();
    let titles = fixture.places.titles();

    let report = engine.sync().unwrap();

    assert!(report.success);
    assert!(!report.first_run);
    assert!(report.planned.is_empty());
    assert!(report.actions.is_empty());
    assert_eq!(fixture.places.titles(), titles);
    assert_eq!(engine.check().unwrap().status, CheckStatus::InSync);
}

#[test]
fn entries_on_both_sides_are_not_duplicated() {
    let fixture = SyncFixture::new();
    fixture.favorites.shortcut("Links/site", "http://example.com");
    fixture.places.add_link(PlacesFixture::TOOLBAR, "site", "http://example.com");

    let report = engine(&fixture).sync().unwrap();

    assert!(report.planned.is_empty());
    assert_eq!(report.suppressed, 2);
    assert_eq!(fixture.places.titles(), vec!["site".to_string()]);
}

#[test]
fn removing_a_favorite_removes_the_bookmark() {
    let fixture = SyncFixture::new();
    fixture.favorites.shortcut("Links/keep", "http://keep.test");
    fixture.favorites.shortcut("Links/drop", "http://drop.test");
    let mut engine = engine(&fixture);
    engine.sync().unwrap();
    assert!(fixture.places.find(PlacesFixture::TOOLBAR, "drop").is_some());

    fixture.favorites.remove_shortcut("Links/drop");
    let report = engine.sync().unwrap();

    assert!(report.success, "errors: {:?}", report.errors);
    assert!(fixture.places.find(PlacesFixture::TOOLBAR, "drop").is_none());
    assert!(fixture.places.find(PlacesFixture::TOOLBAR, "keep").is_some());
    assert_eq!(fixture.places.place_id("http://drop.test"), None);
}

#[test]
fn removing_a_bookmark_folder_removes_its_favorites_subtree() {
    let fixture = SyncFixture::new();
    let folder = fixture.places.add_folder(PlacesFixture::TOOLBAR, "Work");
    let nested = fixture.places.add_folder(folder, "Deep");
    fixture.places.add_link(folder, "a", "http://a.test");
    fixture.places.add_link(nested, "b", "http://b.test");
    let mut engine = engine(&fixture);
    engine.sync().unwrap();
    assert!(fixture.favorites.has_shortcut("Links/Work/Deep/b"));

    fixture.places.remove(folder);
    let report = engine.sync().unwrap();

    assert!(report.success, "errors: {:?}", report.errors);
    assert!(!fixture.favorites.has_dir("Links/Work"));
    assert!(fixture.favorites.has_dir("Links"));
    assert!(
        report
            .actions
            .iter()
            .any(|action| action.contains("'Links/Work'") && action.contains("(4 entries)")),
        "actions: {:?}",
        report.actions
    );
    assert_eq!(engine.check().unwrap().status, CheckStatus::InSync);
}

#[test]
fn bookmark_url_edit_rewrites_the_favorite() {
    let fixture = SyncFixture::new();
    let site = fixture.places.add_link(PlacesFixture::TOOLBAR, "site", "http://old.test");
    let mut engine = engine(&fixture);
    engine.sync().unwrap();
    assert_eq!(fixture.favorites.url_of("Links/site").as_deref(), Some("http://old.test"));

    fixture.places.set_url(site, "http://new.test");
    let report = engine.sync().unwrap();

    assert!(report.success, "errors: {:?}", report.errors);
    assert_eq!(report.actions.len(), 2, "actions: {:?}", report.actions);
    assert_eq!(fixture.favorites.url_of("Links/site").as_deref(), Some("http://new.test"));

    let report = engine.sync().unwrap();
    assert!(report.planned.is_empty(), "planned: {:?}", report.planned);
    assert_eq!(fixture.favorites.url_of("Links/site").as_deref(), Some("http://new.test"));
}

#[test]
fn favorite_url_edit_rewrites_the_bookmark() {
    let fixture = SyncFixture::new();
    fixture.favorites.shortcut("Links/site", "http://old.test");
    let mut engine = engine(&fixture);
    engine.sync().unwrap();

    fixture.favorites.shortcut("Links/site", "http://new.test");
    let report = engine.sync().unwrap();

    assert!(report.success, "errors: {:?}", report.errors);
    assert_eq!(fixture.places.titles(), vec!["site".to_string()]);
    let site = fixture.places.find(PlacesFixture::TOOLBAR, "site").unwrap();
    assert_eq!(fixture.places.url_of(site).as_deref(), Some("http://new.test"));
    assert_eq!(fixture.places.place_id("http://old.test"), None);
    assert_eq!(fixture.favorites.url_of("Links/site").as_deref(), Some("http://new.test"));
    assert_eq!(engine.check().unwrap().status, CheckStatus::InSync);
}

#[test]
fn bookmarks_without_a_url_are_left_alone() {
    let fixture = SyncFixture::new();
    fixture.places.insert_row(100, 1, Some(999), PlacesFixture::TOOLBAR, "ghost");
    fixture.places.add_link(PlacesFixture::TOOLBAR, "site", "http://example.com");
    let mut engine = engine(&fixture);

    let report = engine.sync().unwrap();

    assert!(report.success, "errors: {:?}", report.errors);
    assert!(fixture.favorites.has_shortcut("Links/site"));
    assert!(!fixture.favorites.has_shortcut("Links/ghost"));

    let report = engine.sync().unwrap();
    assert!(report.success, "errors: {:?}", report.errors);
    assert!(report.planned.is_empty(), "planned: {:?}", report.planned);
    assert_eq!(engine.check().unwrap().status, CheckStatus::InSync);
}

#[test]
fn folder_named_like_a_built_in_folder_is_synced() {
    let fixture = SyncFixture::new();
    fixture.favorites.shortcut("Tags/a", "http://a.test");
    let mut engine = engine(&fixture);

    let report = engine.sync().unwrap();

    assert!(report.success, "errors: {:?}", report.errors);
    assert_eq!(report.suppressed, 0);
    assert_eq!(fixture.places.find(PlacesFixture::TAGS, "a"), None);
    let tags = fixture.places.find(PlacesFixture::MENU, "Tags").unwrap();
    let a = fixture.places.find(tags, "a").unwrap();
    assert_eq!(fixture.places.url_of(a).as_deref(), Some("http://a.test"));

    let report = engine.sync().unwrap();
    assert!(report.planned.is_empty(), "planned: {:?}", report.planned);
}

#[test]
fn entries_gone_from_both_sides_are_suppressed() {
    let fixture = SyncFixture::new();
    let id = fixture.places.add_link(PlacesFixture::TOOLBAR, "old", "http://old.test");
    let mut engine = engine(&fixture);
    engine.sync().unwrap();

    fixture.places.remove(id);
    fixture.favorites.remove_shortcut("Links/old");
    let plan = engine.plan().unwrap();

    assert_eq!(plan.classified.len(), 2);
    assert!(plan.classified.iter().all(|op| op.kind == OperationKind::Remove));
    assert!(plan.is_empty());
}

#[test]
fn dry_run_changes_nothing() {
    let fixture = SyncFixture::new();
    fixture.favorites.shortcut("Links/site", "http://example.com");
    fixture.places.add_link(PlacesFixture::MENU, "a:b", "http://ab.test");

    let report = engine(&fixture)
        .sync_with_options(SyncOptions {
            dry_run: true,
            ..SyncOptions::default()
        })
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.planned.len(), 2);
    assert!(report.actions.iter().all(|a| a.starts_with("[dry-run] Would")));
    assert_eq!(fixture.places.titles(), vec!["a:b".to_string()]);
    assert!(!fixture.favorites.has_shortcut("ab"));
    assert!(!fixture.profile_dir().join(".linksync-bookmarks.toml").exists());
    assert!(!fixture.favorites_dir().join(".linksync-favorites.toml").exists());
}

#[test]
fn normalized_titles_are_written_back() {
    let fixture = SyncFixture::new();
    fixture.places.add_link(PlacesFixture::MENU, "a:b", "http://ab.test");

    let report = engine(&fixture).sync().unwrap();

    assert!(report.success, "errors: {:?}", report.errors);
    assert_eq!(fixture.places.titles(), vec!["ab".to_string()]);
    assert!(fixture.favorites.has_shortcut("ab"));
}

#[test]
fn disabled_direction_is_deferred() {
    let fixture = SyncFixture::new();
    fixture.places.add_link(PlacesFixture::TOOLBAR, "Docs", "https://docs.rs");
    let mut engine = engine(&fixture);

    let report = engine
        .sync_with_options(SyncOptions {
            dry_run: false,
            direction: SyncDirection {
                to_bookmarks: true,
                to_favorites: false,
            },
        })
        .unwrap();

    assert!(report.success);
    assert_eq!(report.skipped.len(), 1);
    assert!(!fixture.favorites.has_shortcut("Links/Docs"));
    assert_eq!(engine.check().unwrap().status, CheckStatus::Pending);

    engine.sync().unwrap();
    assert!(fixture.favorites.has_shortcut("Links/Docs"));
}

#[test]
fn failed_operations_are_retried_next_run() {
    let fixture = SyncFixture::new();
    let work = fixture.places.add_folder(PlacesFixture::TOOLBAR, "Work");
    fixture.places.add_link(work, "site", "http://example.com");
    // A plain file where the folder should go blocks the directory and,
    // through it, the link.
    fixture.favorites.mkdir("Links");
    let blocker = fixture.favorites_dir().join("Links").join("Work");
    fs::write(&blocker, "not a directory").unwrap();
    let mut engine = engine(&fixture);

    let report = engine.sync().unwrap();

    assert!(!report.success);
    assert_eq!(report.errors.len(), 2);
    assert!(
        report.errors[1].contains("Hierarchy corruption"),
        "errors: {:?}",
        report.errors
    );

    fs::remove_file(&blocker).unwrap();
    let report = engine.sync().unwrap();

    assert!(report.success, "errors: {:?}", report.errors);
    assert!(fixture.favorites.has_shortcut("Links/Work/site"));
}

#[test]
fn excluded_entries_are_not_synced() {
    let fixture = SyncFixture::new();
    fixture.favorites.shortcut("Links/Private/secret", "http://secret.test");
    fixture.favorites.shortcut("Links/public", "http://public.test");
    let favorite_exclusions =
        ExclusionList::for_favorites(&fixture.favorites_dir(), ["Links/Private"]);

    let report = engine_with(&fixture, ExclusionList::default(), favorite_exclusions)
        .sync()
        .unwrap();

    assert!(report.success);
    assert_eq!(fixture.places.titles(), vec!["public".to_string()]);
}

#[test]
fn corrupt_manifest_stops_before_any_change() {
    let fixture = SyncFixture::new();
    let mut engine = engine(&fixture);
    engine.sync().unwrap();

    fixture.favorites.shortcut("Links/new", "http://new.test");
    fs::write(
        fixture.profile_dir().join(".linksync-bookmarks.toml"),
        "this is = not [ a manifest",
    )
    .unwrap();

    let result = engine.sync();

    assert!(matches!(result, Err(Error::ManifestCorrupt { .. })));
    assert!(fixture.places.titles().is_empty());
    assert_eq!(engine.check().unwrap().status, CheckStatus::Broken);
}

#[test]
fn closed_database_is_fatal() {
    let fixture = SyncFixture::new();
    let bookmarks = PlacesStore::new(
        PlacesDb::new(fixture.places_path()),
        &fixture.favorites_dir(),
        ExclusionList::default(),
    );
    let favorites = FavoritesStore::new(&fixture.favorites_dir(), ExclusionList::default());
    let manifests = ManifestStore::new(&fixture.profile_dir(), &fixture.favorites_dir());
    let mut engine = SyncEngine::new(Box::new(bookmarks), Box::new(favorites), manifests);

    let result = engine.sync();

    assert!(matches!(result, Err(Error::StoreNotOpen { .. })));
    assert!(!engine.manifests().exists(StoreKind::Bookmarks));
}
