extern crate std;

use std::sync::Mutex;

/// Shared state between the polling threads (writers) and the render loop
/// (reader). One lock per display row plus a separate lock for the
/// freshness timestamp, so a single-row update never serializes the whole
/// store and a freshness read never takes a row lock.
pub struct LineStore<T: Clone> {
    rows: Vec<(String, Mutex<Vec<T>>)>,
    updated_ts: Mutex<i64>,
}

pub type PredictionStore = LineStore<i64>;
pub type AlertStore = LineStore<String>;

impl<T: Clone> LineStore<T> {
    pub fn new(lines: &[String]) -> LineStore<T> {
        return LineStore {
            rows: lines.iter()
                .map(|line| (line.clone(), Mutex::new(vec![])))
                .collect(),
            updated_ts: Mutex::new(0),
        };
    }

    fn row(&self, line: &str) -> &Mutex<Vec<T>> {
        for (row_line, data) in &self.rows {
            if row_line == line {
                return data;
            }
        }
        panic!("unknown line: {}", line);
    }

    /// Defensive copy; the live sequence is never handed out.
    pub fn get(&self, line: &str) -> Vec<T> {
        return self.row(line).lock().expect("row lock").clone();
    }

    /// Atomic wholesale swap under the row's lock. A concurrent reader
    /// observes either the old sequence or the new one, never a mix.
    pub fn replace(&self, line: &str, data: Vec<T>) {
        *self.row(line).lock().expect("row lock") = data;
    }

    /// Copies of every row, read while no writer holds any row lock. Row
    /// locks are always acquired in row-index order; that fixed order is
    /// the deadlock-avoidance requirement for anyone locking several rows.
    pub fn snapshot_all(&self) -> Vec<Vec<T>> {
        let guards: Vec<_> = self.rows.iter()
            .map(|(_, data)| data.lock().expect("row lock"))
            .collect();
        return guards.iter().map(|guard| guard.to_vec()).collect();
    }

    pub fn update_freshness(&self, now: i64) {
        let mut updated_ts = self.updated_ts.lock().expect("freshness lock");
        // Never goes backwards, even if the caller's clock does.
        *updated_ts = std::cmp::max(*updated_ts, now);
    }

    pub fn freshness_ts(&self) -> i64 {
        return *self.updated_ts.lock().expect("freshness lock");
    }
}

#[cfg(test)]
mod tests {
    use super::LineStore;

    fn lines() -> Vec<String> {
        return vec!["N".to_string(), "J".to_string()];
    }

    #[test]
    fn get_returns_a_defensive_copy() {
        let store: LineStore<i64> = LineStore::new(&lines());
        store.replace("N", vec![1, 2, 3]);

        let mut copy = store.get("N");
        copy.push(4);

        assert_eq!(vec![1, 2, 3], store.get("N"));
    }

    #[test]
    fn replace_swaps_wholesale() {
        let store: LineStore<i64> = LineStore::new(&lines());
        store.replace("J", vec![1, 2, 3]);
        store.replace("J", vec![9]);
        assert_eq!(vec![9], store.get("J"));
        assert_eq!(Vec::<i64>::new(), store.get("N"));
    }

    #[test]
    #[should_panic(expected = "unknown line")]
    fn unknown_line_is_programmer_misuse() {
        let store: LineStore<i64> = LineStore::new(&lines());
        store.get("Q");
    }

    #[test]
    fn snapshot_all_follows_row_order() {
        let store: LineStore<i64> = LineStore::new(&lines());
        store.replace("N", vec![1]);
        store.replace("J", vec![2]);
        assert_eq!(vec![vec![1], vec![2]], store.snapshot_all());
    }

    #[test]
    fn freshness_never_goes_backwards() {
        let store: LineStore<i64> = LineStore::new(&lines());
        store.update_freshness(100);
        store.update_freshness(50);
        assert_eq!(100, store.freshness_ts());
        store.update_freshness(150);
        assert_eq!(150, store.freshness_ts());
    }

    #[test]
    fn concurrent_reader_sees_old_or_new_never_a_mix() {
        let store = std::sync::Arc::new(LineStore::<i64>::new(&lines()));
        store.replace("N", vec![1, 1, 1]);

        let writer_store = store.clone();
        let writer = std::thread::spawn(move || {
            for i in 0..2000 {
                if i % 2 == 0 {
                    writer_store.replace("N", vec![2, 2, 2]);
                } else {
                    writer_store.replace("N", vec![1, 1, 1]);
                }
            }
        });

        for _ in 0..2000 {
            let seen = store.get("N");
            assert!(seen == vec![1, 1, 1] || seen == vec![2, 2, 2],
                    "observed a partially-written sequence: {:?}", seen);
        }
        writer.join().unwrap();
    }
}
