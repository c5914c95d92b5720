//! Equal-weight basket construction.

use std::collections::HashMap;

/// Equal weights `1/N` for the given symbols.
///
/// An empty symbol list yields an empty map; the aggregator rejects that
/// as a missing-input precondition.
pub fn equal_weights(symbols: &[String]) -> HashMap<String, f64> {
    if symbols.is_empty() {
        return HashMap::new();
    }
    let weight = 1.0 / symbols.len() as f64;
    symbols.iter().map(|s| (s.clone(), weight)).collect()
}
