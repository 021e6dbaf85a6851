//! Property tests for congruence, tree construction and path shortening.

use linksync_core::path_map::{MAX_PATH_LEN, mapped_len};
use linksync_core::tree::{BookmarkRow, PlaceRow, ROOT_ID, TreeBuilder, construction_order};
use linksync_core::{ExclusionList, LinkNode, NodeOrigin, ResourceKind};
use proptest::prelude::*;
use std::collections::HashSet;

fn folder(id: i64, parent: i64, title: &str) -> BookmarkRow {
    BookmarkRow {
        id,
        row_type: 2,
        parent,
        place_id: None,
        position: 0,
        title: Some(title.to_string()),
    }
}

fn system_rows() -> Vec<BookmarkRow> {
    vec![
        folder(ROOT_ID, 0, ""),
        folder(2, ROOT_ID, "Bookmarks Menu"),
        folder(3, ROOT_ID, "Bookmarks Toolbar"),
        folder(5, ROOT_ID, "Unsorted Bookmarks"),
    ]
}

fn arb_node() -> impl Strategy<Value = LinkNode> {
    let kind = prop_oneof![
        Just(ResourceKind::Link),
        Just(ResourceKind::Directory),
        Just(ResourceKind::Unresolved),
    ];
    let title = prop_oneof![
        Just("a".to_string()),
        Just("Links".to_string()),
        Just("Bookmarks Toolbar".to_string()),
        Just("Bookmarks Menu".to_string()),
        Just(String::new()),
    ];
    let path = prop_oneof![
        Just(Vec::<String>::new()),
        Just(vec!["Links".to_string()]),
        Just(vec!["Links".to_string(), "a".to_string()]),
    ];
    let url = prop_oneof![Just(None), Just(Some("http://a".to_string())), Just(Some("http://b".to_string()))];
    (kind, title, path, url, any::<bool>(), any::<bool>()).prop_map(
        |(kind, title, path, url, bookmark, system)| {
            let origin = if bookmark {
                NodeOrigin::Bookmark {
                    id: 3,
                    parent: ROOT_ID,
                    position: 0,
                    place_id: None,
                }
            } else {
                NodeOrigin::Favorite {
                    location: "/fav".to_string(),
                    modified: None,
                    created: None,
                }
            };
            LinkNode::new(kind, url, title, path, origin).with_system(system)
        },
    )
}

/// Directory rows where every parent is an earlier row, in shuffled order.
fn arb_directory_rows() -> impl Strategy<Value = Vec<BookmarkRow>> {
    prop::collection::vec(any::<prop::sample::Index>(), 0..30)
        .prop_map(|parents| {
            let mut rows = system_rows();
            for (i, parent) in parents.iter().enumerate() {
                let id = 100 + i as i64;
                let parent = rows[parent.index(rows.len())].id;
                rows.push(folder(id, parent, &format!("dir{i}")));
            }
            rows
        })
        .prop_shuffle()
}

proptest! {
    #[test]
    fn congruence_is_symmetric(a in arb_node(), b in arb_node()) {
        prop_assert_eq!(a.is_congruent_to(&b), b.is_congruent_to(&a));
    }

    #[test]
    fn congruence_is_reflexive(a in arb_node()) {
        prop_assert!(a.is_congruent_to(&a));
    }

    #[test]
    fn construction_order_places_every_reachable_row(rows in arb_directory_rows()) {
        let order = construction_order(&rows);

        prop_assert!(order.unplaced.is_empty());
        prop_assert_eq!(order.placed.len(), rows.len());

        let mut seen = HashSet::new();
        for &index in &order.placed {
            let row = &rows[index];
            prop_assert!(row.id == ROOT_ID || seen.contains(&row.parent));
            seen.insert(row.id);
        }
    }

    #[test]
    fn built_paths_stay_under_the_ceiling(
        titles in prop::collection::vec("[a-zA-Z][a-zA-Z:?* ]{0,59}", 1..12),
        link_title in "[a-zA-Z]{1,80}",
    ) {
        // A single chain of folders below the toolbar, with a link at the bottom.
        let mut rows = system_rows();
        let mut parent = 3;
        for (i, title) in titles.iter().enumerate() {
            let id = 100 + i as i64;
            rows.push(folder(id, parent, title));
            parent = id;
        }
        rows.push(BookmarkRow {
            id: 1000,
            row_type: 1,
            parent,
            place_id: Some(1),
            position: 0,
            title: Some(link_title),
        });
        let places = vec![PlaceRow { id: 1, url: "http://example.com".to_string() }];

        let exclusions = ExclusionList::default();
        let tree = TreeBuilder::new("/home/user/Favorites", &exclusions).build(&rows, &places);

        prop_assert!(tree.nodes.iter().any(LinkNode::is_link));
        for node in tree.nodes.iter().filter(|node| !node.system) {
            let len = mapped_len("/home/user/Favorites", &node.path, Some(&node.title));
            prop_assert!(len <= MAX_PATH_LEN, "{} maps to {} characters", node, len);
            prop_assert!(!node.title.contains([':', '?', '*']));
        }
    }
}
