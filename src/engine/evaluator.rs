//! Correctness check for a single question.

use std::collections::BTreeSet;

/// Returns true iff `user` is non-empty and, as a set, equals `correct`.
///
/// Order and repeated values are ignored on both sides. There is no partial
/// credit and an empty answer is always wrong.
pub fn is_correct(user: &[u8], correct: &[u8]) -> bool {
    if user.is_empty() {
        return false;
    }

    let user: BTreeSet<u8> = user.iter().copied().collect();
    let correct: BTreeSet<u8> = correct.iter().copied().collect();
    user == correct
}
