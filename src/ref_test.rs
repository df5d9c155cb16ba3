// Reference model, a sorted map that is trivially correct, to compare
// Rbtree against under random operations.
struct RefNodes {
    entries: BTreeMap<i64, i64>,
}

impl RefNodes {
    fn new() -> RefNodes {
        RefNodes {
            entries: BTreeMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: i64) -> Option<i64> {
        self.entries.get(&key).cloned()
    }

    fn create(&mut self, key: i64, value: i64) -> bool {
        if self.entries.contains_key(&key) {
            false
        } else {
            self.entries.insert(key, value);
            true
        }
    }

    fn set(&mut self, key: i64, value: i64) -> Option<i64> {
        self.entries.insert(key, value)
    }

    fn delete(&mut self, key: i64) -> Option<i64> {
        self.entries.remove(&key)
    }

    fn iter(&self) -> std::vec::IntoIter<(i64, i64)> {
        let entries: Vec<(i64, i64)> = self.entries.iter().map(|(k, v)| (*k, *v)).collect();
        entries.into_iter()
    }

    fn range(&self, low: Bound<i64>, high: Bound<i64>) -> std::vec::IntoIter<(i64, i64)> {
        let entries: Vec<(i64, i64)> = self
            .entries
            .iter()
            .filter(|(k, _)| (low, high).contains(*k))
            .map(|(k, v)| (*k, *v))
            .collect();
        entries.into_iter()
    }
}

fn random_low_high(rng: &mut SmallRng, size: usize) -> (Bound<i64>, Bound<i64>) {
    let low = rng.gen_range(0..size) as i64;
    let high = rng.gen_range(0..size) as i64;
    let low = match rng.gen::<u8>() % 3 {
        0 => Bound::Included(low),
        1 => Bound::Excluded(low),
        _ => Bound::Unbounded,
    };
    let high = match rng.gen::<u8>() % 3 {
        0 => Bound::Included(high),
        1 => Bound::Excluded(high),
        _ => Bound::Unbounded,
    };
    (low, high)
}

fn assert_same<I, J>(mut iter: I, mut iter_ref: J)
where
    I: Iterator<Item = (i64, i64)>,
    J: Iterator<Item = (i64, i64)>,
{
    loop {
        match (iter.next(), iter_ref.next()) {
            (Some(item), Some(ref_item)) => assert_eq!(item, ref_item),
            (None, None) => break,
            (Some(item), None) => panic!("invalid item: {:?}", item),
            (None, Some(ref_item)) => panic!("invalid none: {:?}", ref_item),
        }
    }
}
