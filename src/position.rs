use crate::model::{ProcessId, Year};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Layout coordinates keyed by `(year, process id)`. Last write wins; no history is kept.
#[derive(Debug, Clone, Default)]
pub struct PositionStore {
    years: HashMap<Year, HashMap<ProcessId, Position>>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, year: Year, process_id: &str) -> Option<Position> {
        self.years.get(&year)?.get(process_id).copied()
    }

    pub fn set(&mut self, year: Year, process_id: ProcessId, position: Position) {
        if !position.is_finite() {
            tracing::debug!(
                "Ignoring non-finite position for '{}' in {}",
                process_id,
                year
            );
            return;
        }
        self.years
            .entry(year)
            .or_default()
            .insert(process_id, position);
    }

    /// Seed `to` from `from` for each id that has no entry in `to` yet.
    /// Existing entries in `to` are never overwritten. Returns the number of ids seeded.
    pub fn copy_forward<'a, I>(&mut self, from: Year, to: Year, process_ids: I) -> usize
    where
        I: IntoIterator<Item = &'a ProcessId>,
    {
        if from == to {
            return 0;
        }

        let seeds: Vec<(ProcessId, Position)> = process_ids
            .into_iter()
            .filter(|id| self.get(to, id.as_str()).is_none())
            .filter_map(|id| self.get(from, id.as_str()).map(|p| (id.clone(), p)))
            .collect();

        let seeded = seeds.len();
        let target = self.years.entry(to).or_default();
        for (id, position) in seeds {
            target.insert(id, position);
        }
        seeded
    }

    pub fn year_len(&self, year: Year) -> usize {
        self.years.get(&year).map(|m| m.len()).unwrap_or(0)
    }

    /// Stored positions of a year, sorted by process id.
    pub fn year_positions(&self, year: Year) -> BTreeMap<&ProcessId, Position> {
        self.years
            .get(&year)
            .map(|m| m.iter().map(|(id, p)| (id, *p)).collect())
            .unwrap_or_default()
    }

    /// Tab-separated `id, x, y` lines for a year, sorted by id.
    pub fn export_tsv(&self, year: Year) -> String {
        self.year_positions(year)
            .into_iter()
            .map(|(id, p)| format!("{}\t{:.3}\t{:.3}\n", id, p.x, p.y))
            .collect()
    }

    pub fn clear(&mut self) {
        self.years.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ProcessId {
        ProcessId::from(s)
    }

    #[test]
    fn test_get_absent_and_last_write_wins() {
        let mut store = PositionStore::new();
        assert_eq!(store.get(Year(2000), "P1"), None);

        store.set(Year(2000), id("P1"), Position::new(1.0, 2.0));
        store.set(Year(2000), id("P1"), Position::new(3.0, 4.0));
        assert_eq!(store.get(Year(2000), "P1"), Some(Position::new(3.0, 4.0)));
        assert_eq!(store.get(Year(2001), "P1"), None);
    }

    #[test]
    fn test_copy_forward_seeds_missing() {
        let mut store = PositionStore::new();
        store.set(Year(2000), id("P1"), Position::new(10.0, 20.0));

        let seeded = store.copy_forward(Year(2000), Year(2001), &[id("P1"), id("P2")]);
        assert_eq!(seeded, 1);
        assert_eq!(store.get(Year(2001), "P1"), Some(Position::new(10.0, 20.0)));
        assert_eq!(store.get(Year(2001), "P2"), None);
    }

    #[test]
    fn test_copy_forward_is_non_destructive() {
        let mut store = PositionStore::new();
        store.set(Year(2000), id("P1"), Position::new(10.0, 20.0));
        store.set(Year(2001), id("P1"), Position::new(5.0, 5.0));

        let seeded = store.copy_forward(Year(2000), Year(2001), &[id("P1")]);
        assert_eq!(seeded, 0);
        assert_eq!(store.get(Year(2001), "P1"), Some(Position::new(5.0, 5.0)));
    }

    #[test]
    fn test_non_finite_positions_ignored() {
        let mut store = PositionStore::new();
        store.set(Year(2000), id("P1"), Position::new(f64::NAN, 0.0));
        assert_eq!(store.get(Year(2000), "P1"), None);
    }

    #[test]
    fn test_export_tsv_sorted() {
        let mut store = PositionStore::new();
        store.set(Year(2000), id("b"), Position::new(0.5, 1.0));
        store.set(Year(2000), id("a"), Position::new(1.23456, -2.0));
        assert_eq!(
            store.export_tsv(Year(2000)),
            "a\t1.235\t-2.000\nb\t0.500\t1.000\n"
        );
        assert_eq!(store.export_tsv(Year(1999)), "");
    }
}
