#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    hufflz::display::set_display_level(0);

    // Arbitrary bytes straight into the LZ77 layer.  Output may be garbage
    // but never longer than every byte expanding to a maximal match.
    let (out, _errors) = hufflz::lz77::decode(data);
    assert!(out.len() <= data.len() * hufflz::MAX_MATCH);

    // Arbitrary bytes into both layers, using a table built from the first
    // half and decoding the second half.
    let (head, tail) = data.split_at(data.len() / 2);
    let book = match hufflz::build_table(head) {
        Ok(b) => b,
        Err(_) => return,
    };
    // Cap so tiny inputs claiming huge outputs do not exhaust memory.
    let outsize = tail.len().saturating_mul(8).min(1 << 16);
    let decoded = hufflz::decode(tail, book.tree(), book.marker(), outsize);
    assert!(decoded.bytes.len() <= outsize * hufflz::MAX_MATCH);
});
