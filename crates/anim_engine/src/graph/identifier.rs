//! Node identifiers.
//!
//! Every node carries an identifier that never changes after it is assigned.
//! Identifiers are drawn from the operating system's random source; with
//! 36^15 possibilities collisions are not checked for.

use rand::rngs::OsRng;
use rand::Rng;
use tracing::{debug, info, warn};

use super::Document;

const IDENTIFIER_LENGTH: usize = 15;
const CHARACTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Create a fresh node identifier: `_` followed by 15 lowercase alphanumerics.
pub fn create_identifier() -> String {
    let mut identifier = String::with_capacity(IDENTIFIER_LENGTH + 1);
    identifier.push('_');
    for _ in 0..IDENTIFIER_LENGTH {
        let index = OsRng.gen_range(0..CHARACTERS.len());
        identifier.push(CHARACTERS[index] as char);
    }
    identifier
}

/// Check the identifier shape produced by [`create_identifier`].
pub fn is_valid_identifier(identifier: &str) -> bool {
    identifier.len() == IDENTIFIER_LENGTH + 1
        && identifier.starts_with('_')
        && identifier[1..]
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

/// Give every node with an empty identifier a new one.
///
/// Run this once after a document is loaded. Existing identifiers are left
/// alone, even when two nodes happen to share one. Links refer to nodes by
/// identifier, so links touching the empty identifier follow the repaired
/// node when a tree has exactly one such node. With several they are
/// ambiguous and stay as they are; compiling then reports the missing node.
/// Returns how many nodes were assigned an identifier.
pub fn repair_identifiers(document: &mut Document) -> usize {
    let mut repaired = 0;
    for tree in document.trees.iter_mut() {
        let mut assigned = Vec::new();
        for node in tree.nodes.iter_mut().filter(|node| node.identifier.is_empty()) {
            node.identifier = create_identifier();
            debug!(tree = %tree.name, node = %node.identifier, kind = %node.kind, "assigned missing identifier");
            assigned.push(node.identifier.clone());
        }
        if assigned.is_empty() {
            continue;
        }

        match assigned.as_slice() {
            [identifier] => {
                for link in tree.links.iter_mut() {
                    if link.from_node.is_empty() {
                        link.from_node = identifier.clone();
                    }
                    if link.to_node.is_empty() {
                        link.to_node = identifier.clone();
                    }
                }
            }
            _ => {
                let ambiguous = tree
                    .links
                    .iter()
                    .filter(|link| link.from_node.is_empty() || link.to_node.is_empty())
                    .count();
                if ambiguous > 0 {
                    warn!(tree = %tree.name, nodes = assigned.len(), links = ambiguous, "links of unidentified nodes are ambiguous");
                }
            }
        }
        repaired += assigned.len();
        tree.touch();
    }
    if repaired > 0 {
        info!(repaired, "repaired missing node identifiers");
    }
    repaired
}
