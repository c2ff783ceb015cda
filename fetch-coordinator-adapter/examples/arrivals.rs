// Example: replaying arrival board snapshots through a MemorySource.
//
// Each snapshot is diffed against the previous one to produce the notification cycle, the way a
// live query controller would report it, and the coordinator turns that into list updates.
use std::collections::BTreeMap;

use fetch_coordinator::{
    Coordinator, CoordinatorOptions, ListTarget, ListView, Notification, Position, SectionSet,
};
use fetch_coordinator_adapter::{CellConfigurator, MemorySection, MemorySource, SectionedDataSource};

#[derive(Clone, Debug, PartialEq)]
struct Arrival {
    id: u32,
    line: &'static str,
    platform: &'static str,
    seconds: u32,
}

const fn arrival(id: u32, line: &'static str, platform: &'static str, seconds: u32) -> Arrival {
    Arrival {
        id,
        line,
        platform,
        seconds,
    }
}

/// Diffs two boards sorted by arrival time, keyed by id.
#[derive(Default)]
struct BoardDiff {
    board: Vec<Arrival>,
}

impl BoardDiff {
    fn next(&mut self, mut board: Vec<Arrival>) -> (Vec<Arrival>, Vec<Notification<Arrival>>) {
        board.sort_by_key(|a| a.seconds);
        let old: BTreeMap<u32, (usize, &Arrival)> = self
            .board
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id, (i, a)))
            .collect();
        let new: BTreeMap<u32, usize> = board.iter().enumerate().map(|(i, a)| (a.id, i)).collect();

        let mut changes = Vec::new();
        for (id, (i, a)) in &old {
            if !new.contains_key(id) {
                changes.push(Notification::deleted((*a).clone(), Position::new(0, *i)));
            }
        }
        for (j, a) in board.iter().enumerate() {
            let at = Position::new(0, j);
            match old.get(&a.id) {
                None => changes.push(Notification::inserted(a.clone(), at)),
                Some((i, _)) if *i != j => {
                    changes.push(Notification::moved(a.clone(), Position::new(0, *i), at));
                }
                Some((i, prev)) if *prev != a => {
                    changes.push(Notification::updated(a.clone(), Position::new(0, *i)));
                }
                Some(_) => {}
            }
        }
        self.board = board.clone();
        (board, changes)
    }
}

struct Board;

impl CellConfigurator<Arrival> for Board {
    type Cell = String;

    fn reuse_identifier(&self, _object: &Arrival, _position: Position) -> String {
        "ArrivalCell".to_string()
    }

    fn configure(&self, cell: &mut String, a: &Arrival, _position: Position) {
        *cell = format!(
            "{:<20} {:<12} {:02}:{:02}",
            a.line,
            a.platform,
            a.seconds / 60,
            a.seconds % 60
        );
    }
}

struct LoggingTable;

impl ListView for LoggingTable {
    fn reload_data(&mut self) {
        println!("  reload_data");
    }
    fn begin_updates(&mut self) {}
    fn end_updates(&mut self) {}
    fn delete_sections(&mut self, sections: &SectionSet) {
        println!("  delete_sections {sections:?}");
    }
    fn insert_sections(&mut self, sections: &SectionSet) {
        println!("  insert_sections {sections:?}");
    }
    fn delete_rows(&mut self, positions: &[Position]) {
        println!("  delete_rows {positions:?}");
    }
    fn insert_rows(&mut self, positions: &[Position]) {
        println!("  insert_rows {positions:?}");
    }
    fn reload_rows(&mut self, positions: &[Position]) {
        println!("  reload_rows {positions:?}");
    }
}

fn main() {
    let snapshots = [
        vec![
            arrival(1, "Victoria", "Platform 5", 60),
            arrival(2, "Northern", "Platform 7", 150),
            arrival(3, "Piccadilly", "Platform 12", 240),
        ],
        vec![
            arrival(1, "Victoria", "Platform 5", 30),
            arrival(2, "Northern", "Platform 7", 90),
            arrival(3, "Piccadilly", "Platform 12", 75),
            arrival(4, "Circle", "Platform 2", 300),
        ],
        vec![
            arrival(2, "Northern", "Platform 7", 40),
            arrival(3, "Piccadilly", "Platform 12", 20),
            arrival(4, "Circle", "Platform 2", 200),
        ],
    ];

    let mut diff = BoardDiff::default();
    let data_source = SectionedDataSource::new(Board);
    let mut c = Coordinator::new(
        MemorySource::new(vec![MemorySection::new("Kings Cross", Vec::new())]),
        ListTarget::new(LoggingTable),
        CoordinatorOptions::new(),
    );
    c.load();

    for (n, snapshot) in snapshots.into_iter().enumerate() {
        println!("snapshot {n}");
        let (board, changes) = diff.next(snapshot);
        c.source_mut()
            .mutate(vec![MemorySection::new("Kings Cross", board)], changes);
        c.pump();

        for item in 0..data_source.number_of_items(c.source(), 0) {
            let cell = data_source.cell_for(c.source(), Position::new(0, item), |_, _| String::new());
            println!("    {cell}");
        }
    }
}
