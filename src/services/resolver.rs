use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::models::document::ResolvedLink;

/// Scans generated text for catalog destination names and returns one link
/// per distinct name, ordered by first appearance in the text.
///
/// Matching is case-sensitive substring containment. A name that is itself
/// a substring of another catalog name may match spuriously; that is an
/// accepted heuristic limitation, not something to fix with word-boundary
/// matching (which would regress multi-word names with punctuation).
pub fn resolve(text: &str, catalog: &Catalog) -> Vec<ResolvedLink> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut matches: Vec<(usize, ResolvedLink)> = Vec::new();

    for entry in catalog.entries() {
        // First-seen link wins for duplicate destination names.
        if seen.contains(entry.destination.as_str()) {
            continue;
        }
        if let Some(pos) = text.find(&entry.destination) {
            seen.insert(&entry.destination);
            matches.push((
                pos,
                ResolvedLink {
                    name: entry.destination.clone(),
                    link: entry.link.clone(),
                },
            ));
        }
    }

    matches.sort_by_key(|(pos, _)| *pos);
    matches.into_iter().map(|(_, link)| link).collect()
}
