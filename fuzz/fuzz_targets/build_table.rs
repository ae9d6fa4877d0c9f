#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    hufflz::display::set_display_level(0);

    // Any input, including one with a pathological histogram, must yield a
    // table the accelerator can use.
    let book = hufflz::build_table(data).expect("table build should never fail");
    let table = book.table();

    assert!(table.max_bits() as u32 <= hufflz::MAX_HUFFCODE_BITS);
    assert!(table.is_prefix_free());
    assert!(table.get(book.marker()).bits > 0, "marker has no code");
    for &b in data {
        assert!(table.get(b).bits > 0, "symbol {b} has no code");
    }
});
