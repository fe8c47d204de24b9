use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::{Entry, IntervalTree, Natural, Replace, Reversed};

#[derive(Clone, Debug)]
enum Op {
    Insert(i16, u32),
    Delete(i16),
    Search(i16, i16),
}

fn key_strategy() -> impl Strategy<Value = i16> + Clone {
    // a narrow key space so collisions and deletes of present keys are common
    -64i16..64
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        30 => key.clone().prop_map(Op::Delete),
        20 => (key.clone(), key.clone()).prop_map(|(a, b)| Op::Search(a, b)),
    ];
    prop::collection::vec(op, 0..=500)
}

/// Every value stored under keys in `start..=end`, flattened in key order.
fn expected(model: &BTreeMap<i16, Vec<u32>>, start: i16, end: i16) -> Vec<Entry<i16, u32>> {
    let (lo, hi) = if end < start { (end, start) } else { (start, end) };
    model
        .range(lo..=hi)
        .flat_map(|(k, values)| values.iter().map(move |v| Entry::new(*k, *v)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_duplicates_match_model(ops in ops_strategy()) {
        let t = IntervalTree::<i16, u32>::default();
        let mut m: BTreeMap<i16, Vec<u32>> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    t.insert(key, value);
                    m.entry(key).or_default().push(value);
                }
                Op::Delete(key) => {
                    t.delete(&key);
                    m.remove(&key);
                }
                Op::Search(start, end) => {
                    prop_assert_eq!(t.search(&start, &end), expected(&m, start, end));
                }
            }
            prop_assert!(t.is_avl());
            prop_assert_eq!(t.len(), m.len());
        }

        prop_assert_eq!(t.search(&i16::MIN, &i16::MAX), expected(&m, i16::MIN, i16::MAX));
    }

    #[test]
    fn prop_unique_keeps_latest(ops in ops_strategy()) {
        let t = IntervalTree::new(Natural, Replace);
        let mut m: BTreeMap<i16, Vec<u32>> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    t.insert(key, value);
                    m.insert(key, vec![value]);
                }
                Op::Delete(key) => {
                    t.delete(&key);
                    m.remove(&key);
                }
                Op::Search(start, end) => {
                    prop_assert_eq!(t.search(&start, &end), expected(&m, start, end));
                }
            }
            prop_assert!(t.is_avl());
        }
    }

    #[test]
    fn prop_reversed_order_descends(keys in prop::collection::vec(key_strategy(), 0..200), a in key_strategy(), b in key_strategy()) {
        let t = IntervalTree::unique(Reversed(Natural));
        let mut m: BTreeMap<i16, Vec<u32>> = BTreeMap::new();
        for (i, key) in keys.into_iter().enumerate() {
            t.insert(key, i as u32);
            m.insert(key, vec![i as u32]);
        }
        prop_assert!(t.is_avl());

        let mut should = expected(&m, a, b);
        should.reverse();
        prop_assert_eq!(t.search(&a, &b), should);
    }

    #[test]
    fn prop_bound_order_is_irrelevant(keys in prop::collection::vec(key_strategy(), 0..200), a in key_strategy(), b in key_strategy()) {
        let t = IntervalTree::<i16, usize>::default();
        for (i, key) in keys.into_iter().enumerate() {
            t.insert(key, i);
        }
        let found = t.search(&a, &b);
        prop_assert_eq!(&found, &t.search(&b, &a));
        prop_assert!(found.windows(2).all(|w| w[0].key <= w[1].key));
    }

    #[test]
    fn prop_delete_absent_changes_nothing(keys in prop::collection::vec(0i16..64, 0..200), absent in 64i16..128) {
        let t = IntervalTree::<i16, usize>::default();
        for (i, key) in keys.into_iter().enumerate() {
            t.insert(key, i);
        }
        let before = t.search(&i16::MIN, &i16::MAX);
        let height = t.height();
        t.delete(&absent);
        prop_assert_eq!(t.search(&i16::MIN, &i16::MAX), before);
        prop_assert_eq!(t.height(), height);
    }
}
