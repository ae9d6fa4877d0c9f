// Depth limiting.
//
// Coverage:
//   - trees already within the limit are left untouched
//   - Fibonacci and geometric histograms over 200+ symbols end up <= 16 deep
//   - every leaf survives and the tree stays a full binary tree
//   - every symbol still decodes through its own code after limiting
//   - deep-node and surrogate selection

use hufflz::bitstream::BitWriter;
use hufflz::config::{ALPHABET_SIZE, MAX_HUFFCODE_BITS};
use hufflz::huffman::limit::{find_deep_node, find_surrogate};
use hufflz::huffman::{limit_depth, CodeTable, Histogram, HuffmanDecoder, HuffmanTree};

/// Fibonacci counts on the first 40 symbols, then 1 for the next `ones`.
fn fibonacci_counts(ones: usize) -> [u64; ALPHABET_SIZE] {
    let mut counts = [0u64; ALPHABET_SIZE];
    let (mut a, mut b) = (1u64, 1u64);
    for c in counts.iter_mut().take(40) {
        *c = a;
        let next = a + b;
        a = b;
        b = next;
    }
    for c in counts.iter_mut().skip(40).take(ones) {
        *c = 1;
    }
    counts
}

/// Powers of two on the first 50 symbols, then 1 everywhere else.
fn geometric_counts() -> [u64; ALPHABET_SIZE] {
    let mut counts = [1u64; ALPHABET_SIZE];
    for (k, c) in counts.iter_mut().take(50).enumerate() {
        *c = 1 << k;
    }
    counts
}

fn limited(counts: &[u64; ALPHABET_SIZE]) -> (HuffmanTree, Histogram, usize) {
    let hist = Histogram::from_counts(counts);
    let mut tree = HuffmanTree::build(&hist).unwrap();
    let rounds = limit_depth(&mut tree, MAX_HUFFCODE_BITS).unwrap();
    (tree, hist, rounds)
}

fn assert_full_binary(tree: &HuffmanTree) {
    for id in tree.preorder() {
        let n = tree.node(id);
        if n.is_leaf() {
            assert!(!n.has_children(), "leaf {id} has children");
        } else {
            assert!(n.child_a.is_some() && n.child_b.is_some(), "node {id} lost a child");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bound
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn fibonacci_over_200_symbols_is_bounded() {
    let counts = fibonacci_counts(200);
    let unlimited = HuffmanTree::build(&Histogram::from_counts(&counts)).unwrap();
    assert!(unlimited.depth() > MAX_HUFFCODE_BITS);

    let (tree, hist, rounds) = limited(&counts);
    assert!(rounds > 0);
    assert!(tree.depth() <= MAX_HUFFCODE_BITS);
    assert_eq!(tree.leaf_count(), hist.active_symbols());
    assert_eq!(hist.active_symbols(), 240);
    assert_full_binary(&tree);
}

#[test]
fn geometric_full_alphabet_is_bounded() {
    let (tree, hist, _) = limited(&geometric_counts());
    assert_eq!(hist.active_symbols(), 256);
    assert!(tree.depth() <= MAX_HUFFCODE_BITS);
    assert_eq!(tree.leaf_count(), 256);
    assert_full_binary(&tree);
}

#[test]
fn each_symbol_appears_on_exactly_one_leaf() {
    let (tree, _, _) = limited(&geometric_counts());
    let mut symbols: Vec<u8> = tree
        .preorder()
        .filter_map(|id| tree.node(id).symbol)
        .collect();
    symbols.sort_unstable();
    assert_eq!(symbols, (0..=255u8).collect::<Vec<_>>());
}

#[test]
fn shallow_tree_needs_no_rounds() {
    let (tree, _, rounds) = limited(&[7u64; ALPHABET_SIZE]);
    assert_eq!(rounds, 0);
    assert_eq!(tree.depth(), 8);
}

#[test]
fn tighter_limits_also_converge() {
    let counts = fibonacci_counts(0);
    for max_level in [10, 12, 14] {
        let hist = Histogram::from_counts(&counts);
        let mut tree = HuffmanTree::build(&hist).unwrap();
        limit_depth(&mut tree, max_level).unwrap();
        assert!(tree.depth() <= max_level, "limit {max_level}");
        assert_eq!(tree.leaf_count(), 40);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decodability
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn every_symbol_decodes_after_limiting() {
    for counts in [fibonacci_counts(200), geometric_counts()] {
        let (tree, mut hist, _) = limited(&counts);
        let marker = hist.marker();
        let table = CodeTable::generate(&tree, &mut hist).unwrap();
        assert!(table.max_bits() as u32 <= MAX_HUFFCODE_BITS);

        // The marker may only appear as the header; no escape follows it there.
        let mut symbols: Vec<u8> = (0..=255u8)
            .filter(|&s| s != marker && hist.count(s) > 0)
            .collect();
        if hist.count(marker) > 0 {
            symbols.insert(0, marker);
        }
        let mut buf = Vec::new();
        let mut w = BitWriter::new(&mut buf);
        for &s in &symbols {
            let c = table.get(s);
            w.write_bits(c.code as u32, c.bits as u32);
        }

        let out = HuffmanDecoder::new(&tree, marker)
            .decode(&buf, symbols.len())
            .unwrap();
        assert_eq!(out, symbols);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node selection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn deep_node_is_internal_and_on_the_limit_level() {
    let tree = HuffmanTree::build(&Histogram::from_counts(&fibonacci_counts(0))).unwrap();
    let deep = find_deep_node(&tree, MAX_HUFFCODE_BITS).unwrap();
    let n = tree.node(deep);
    assert_eq!(n.level, MAX_HUFFCODE_BITS);
    assert!(n.has_children());
}

#[test]
fn surrogate_is_the_deepest_leaf_above_the_limit() {
    let tree = HuffmanTree::build(&Histogram::from_counts(&fibonacci_counts(0))).unwrap();
    let s = find_surrogate(&tree, MAX_HUFFCODE_BITS).unwrap();
    let n = tree.node(s);
    assert!(n.is_leaf());
    // a Fibonacci tree is a chain with one leaf on every level
    assert_eq!(n.level, MAX_HUFFCODE_BITS - 1);
}

#[test]
fn no_deep_node_in_a_shallow_tree() {
    let tree = HuffmanTree::build(&Histogram::from_bytes(b"abcd")).unwrap();
    assert_eq!(find_deep_node(&tree, MAX_HUFFCODE_BITS), None);
}
