//! Previous/next navigation between sibling posts

use super::{CorpusListing, CorpusRecord, NavigationItems};
use crate::store::RawDocument;

/// Computes sibling links by position in a corpus listing
pub struct SiblingNavigator;

impl SiblingNavigator {
    /// Build a listing from store records, one record per document in store order
    pub fn listing(documents: &[RawDocument]) -> CorpusListing {
        documents
            .iter()
            .map(|doc| CorpusRecord {
                uid: doc.uid.clone(),
                title: doc.field_str("title").map(str::to_string),
            })
            .collect()
    }

    /// Neighbours of `current_uid` in `listing`
    ///
    /// When the uid is not part of the listing both links are absent. A
    /// neighbour without uid or title is absent too; positions never shift.
    pub fn navigate(listing: &[CorpusRecord], current_uid: &str) -> NavigationItems {
        let Some(index) = listing
            .iter()
            .position(|record| record.uid.as_deref() == Some(current_uid))
        else {
            tracing::warn!(
                "Post '{}' is not in the navigation corpus ({} entries)",
                current_uid,
                listing.len()
            );
            return NavigationItems::default();
        };

        let items = NavigationItems {
            previous_post: index.checked_sub(1).and_then(|i| listing[i].entry()),
            next_post: listing.get(index + 1).and_then(CorpusRecord::entry),
        };

        if index > 0 && items.previous_post.is_none()
            || index + 1 < listing.len() && items.next_post.is_none()
        {
            tracing::debug!("Post '{}' has an incomplete corpus neighbour", current_uid);
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NavigationEntry;
    use serde_json::json;

    fn corpus(uids: &[&str]) -> CorpusListing {
        uids.iter()
            .map(|uid| CorpusRecord::new(uid, &uid.to_uppercase()))
            .collect()
    }

    #[test]
    fn test_middle_entry() {
        let listing = corpus(&["a", "b", "c"]);
        let nav = SiblingNavigator::navigate(&listing, "b");
        assert_eq!(nav.previous_post, Some(NavigationEntry::new("a", "A")));
        assert_eq!(nav.next_post, Some(NavigationEntry::new("c", "C")));
    }

    #[test]
    fn test_first_entry() {
        let nav = SiblingNavigator::navigate(&corpus(&["a", "b", "c"]), "a");
        assert_eq!(nav.previous_post, None);
        assert_eq!(nav.next_post, Some(NavigationEntry::new("b", "B")));
    }

    #[test]
    fn test_last_entry() {
        let nav = SiblingNavigator::navigate(&corpus(&["a", "b", "c"]), "c");
        assert_eq!(nav.previous_post, Some(NavigationEntry::new("b", "B")));
        assert_eq!(nav.next_post, None);
    }

    #[test]
    fn test_single_entry() {
        let nav = SiblingNavigator::navigate(&corpus(&["a"]), "a");
        assert!(nav.is_empty());
    }

    #[test]
    fn test_missing_uid_has_no_neighbours() {
        let nav = SiblingNavigator::navigate(&corpus(&["a", "b", "c"]), "zzz");
        assert!(nav.is_empty());
        assert!(SiblingNavigator::navigate(&[], "a").is_empty());
    }

    #[test]
    fn test_exact_match_first_occurrence() {
        let listing = vec![
            CorpusRecord::new("A", "upper"),
            CorpusRecord::new("a", "first"),
            CorpusRecord::new("x", "X"),
            CorpusRecord::new("a", "second"),
            CorpusRecord::new("y", "Y"),
        ];
        let nav = SiblingNavigator::navigate(&listing, "a");
        assert_eq!(nav.previous_post.map(|e| e.title), Some("upper".to_string()));
        assert_eq!(nav.next_post.map(|e| e.uid), Some("x".to_string()));
    }

    #[test]
    fn test_listing_keeps_store_positions() {
        let mut anonymous = RawDocument::new("posts", "").with_field("title", json!("X"));
        anonymous.uid = None;
        let docs = vec![
            RawDocument::new("posts", "a").with_field("title", json!("Alpha")),
            anonymous,
            RawDocument::new("posts", "b").with_field("title", json!("Beta")),
        ];
        let listing = SiblingNavigator::listing(&docs);
        assert_eq!(listing.len(), 3);
        assert_eq!(listing[1].uid, None);

        let b = SiblingNavigator::navigate(&listing, "b");
        assert_eq!(b.previous_post, None);
        assert_eq!(b.next_post, None);

        let a = SiblingNavigator::navigate(&listing, "a");
        assert_eq!(a.next_post, None);
    }

    #[test]
    fn test_untitled_neighbour_is_absent() {
        let docs = vec![
            RawDocument::new("posts", "a"),
            RawDocument::new("posts", "b").with_field("title", json!("Beta")),
            RawDocument::new("posts", "c").with_field("title", json!("")),
        ];
        let listing = SiblingNavigator::listing(&docs);

        let b = SiblingNavigator::navigate(&listing, "b");
        assert_eq!(b.previous_post, None);
        assert_eq!(b.next_post, None);

        // An untitled post still finds its own neighbours
        let a = SiblingNavigator::navigate(&listing, "a");
        assert_eq!(a.next_post, Some(NavigationEntry::new("b", "Beta")));
    }
}
