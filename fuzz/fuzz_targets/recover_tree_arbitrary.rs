#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Err results are expected; a tree that does come back must be
    // re-serializable to the same description prefix.
    if let Ok(tree) = hufflz::recover_tree(data) {
        let again = hufflz::store_tree(&tree).expect("recovered tree is full");
        assert!(again.len() <= data.len());
        let n = again.len();
        assert_eq!(again[..n - 1], data[..n - 1]);
    }
});
