//! System prompt assembly.
//!
//! The persona/knowledge preamble is concatenated once at startup from a
//! prompts directory and treated as immutable configuration afterwards.
//! Fragment order is deterministic: the core fragments in a fixed order,
//! then every `products/*.txt` file in lexicographic filename order, then
//! the FAQ fragment last. Missing files are skipped; blank fragments are
//! dropped.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

/// Core fragments, loaded first, in this order.
const CORE_FRAGMENTS: [&str; 3] = ["system.txt", "company.txt", "services.txt"];

/// Subdirectory of per-product fragments.
const PRODUCTS_DIR: &str = "products";

/// Trailing fragment.
const FAQ_FRAGMENT: &str = "faq.txt";

/// Separator between fragments.
const SEPARATOR: &str = "\n\n---\n\n";

/// Assemble the system prompt from a prompts directory.
///
/// Never fails: unreadable files are skipped with a warning, and an empty
/// or missing directory produces an empty prompt.
#[must_use]
pub fn assemble_system_prompt(dir: &Path) -> String {
    let mut fragments: Vec<String> = Vec::new();

    for name in CORE_FRAGMENTS {
        if let Some(text) = read_fragment(&dir.join(name)) {
            fragments.push(text);
        }
    }

    fragments.extend(product_fragments(&dir.join(PRODUCTS_DIR)));

    if let Some(text) = read_fragment(&dir.join(FAQ_FRAGMENT)) {
        fragments.push(text);
    }

    if fragments.is_empty() {
        warn!(dir = %dir.display(), "no prompt fragments found, system prompt is empty");
    } else {
        debug!(fragment_count = fragments.len(), "system prompt assembled");
    }

    fragments.join(SEPARATOR)
}

/// Read one fragment, dropping blanks. Missing files are not an error.
fn read_fragment(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => None,
        Ok(text) => Some(text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read prompt fragment");
            None
        }
    }
}

/// Product fragments in lexicographic filename order.
fn product_fragments(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths: Vec<_> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("txt"))
        .collect();
    paths.sort();

    paths.iter().filter_map(|p| read_fragment(p)).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
