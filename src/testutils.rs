//! Module of helper functions for integration tests.
//!
//! Those tests should only test public API surface in general, with some exceptions as provided by
//! this module.
use std::cell::Cell;

thread_local! {
    /// Buffer of all debugging output logged internally by saxgum.
    pub static OUTPUT: Cell<String> = Cell::default();
}

/// Simple debug logger for tests.
///
/// The test harness used by `tests/xml_events.rs` cannot capture stdout, see [libtest-mimic
/// issue #9](https://github.com/LukasKalbertodt/libtest-mimic/issues/9) -- this is much more performant
/// than println anyway though.
///
/// Release builds compile all calls to this away, see `trace_log!` in src/utils.rs
pub fn trace_log(msg: &str) {
    OUTPUT.with(|cell| {
        let mut buf = cell.take();
        buf.push_str(msg);
        buf.push('\n');

        if buf.len() > 20 * 1024 * 1024 {
            buf.clear();
            buf.push_str("[truncated output]\n");
        }

        cell.set(buf);
    });
}

/// Split `input` into chunks of `size` characters.
///
/// Feeding the result to a parser one chunk at a time must produce the same events as feeding
/// `input` at once.
pub fn chunks_of(input: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    chars
        .chunks(size.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[test]
fn test_chunks_of() {
    assert_eq!(chunks_of("abcde", 2), ["ab", "cd", "e"]);
    assert_eq!(chunks_of("ñü€", 1), ["ñ", "ü", "€"]);
    assert!(chunks_of("", 3).is_empty());
}
