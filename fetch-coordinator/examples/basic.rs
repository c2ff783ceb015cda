// Example: a hand-written observed source driving a printing list view.
//
// Run with `--features tracing` to see the coordinator's log; `RUST_LOG` overrides the default
// `fetch_coordinator=trace` filter.
use std::collections::VecDeque;

use fetch_coordinator::{
    Coordinator, CoordinatorOptions, ListTarget, ListView, Notification, ObservedSource, Position,
    SectionInfo, SectionSet, Subscription,
};
use tracing_subscriber::EnvFilter;

struct Inbox {
    sections: Vec<Vec<&'static str>>,
    fetched: Option<Vec<SectionInfo>>,
    subscribed: Option<u64>,
    queue: VecDeque<Notification<&'static str>>,
}

impl Inbox {
    fn emit(&mut self, n: Notification<&'static str>) {
        if self.subscribed.is_some() {
            self.queue.push_back(n);
        }
    }

    fn refresh(&mut self) {
        self.fetched = Some(
            self.sections
                .iter()
                .enumerate()
                .map(|(i, items)| SectionInfo::new(format!("folder {i}"), items.len()))
                .collect(),
        );
    }
}

impl ObservedSource for Inbox {
    type Object = &'static str;
    type Error = ();

    fn perform_fetch(&mut self) -> Result<(), ()> {
        self.refresh();
        Ok(())
    }

    fn sections(&self) -> Option<&[SectionInfo]> {
        self.fetched.as_deref()
    }

    fn object_at(&self, position: Position) -> Option<&'static str> {
        self.sections
            .get(position.section)?
            .get(position.item)
            .copied()
    }

    fn position_of(&self, object: &&'static str) -> Option<Position> {
        self.sections.iter().enumerate().find_map(|(s, items)| {
            items
                .iter()
                .position(|o| o == object)
                .map(|i| Position::new(s, i))
        })
    }

    fn subscribe(&mut self) -> Subscription {
        self.subscribed = Some(1);
        Subscription::new(1)
    }

    fn unsubscribe(&mut self, _subscription: Subscription) {
        self.subscribed = None;
        self.queue.clear();
    }

    fn next_notification(&mut self, s: &Subscription) -> Option<Notification<&'static str>> {
        if self.subscribed != Some(s.id()) {
            return None;
        }
        self.queue.pop_front()
    }
}

struct PrintingTable;

impl ListView for PrintingTable {
    fn reload_data(&mut self) {
        println!("reload_data");
    }
    fn begin_updates(&mut self) {
        println!("begin_updates");
    }
    fn end_updates(&mut self) {
        println!("end_updates");
    }
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
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fetch_coordinator=trace")),
        )
        .init();

    let inbox = Inbox {
        sections: vec![vec!["hello", "invoice"], vec!["newsletter"]],
        fetched: None,
        subscribed: None,
        queue: VecDeque::new(),
    };
    let mut c = Coordinator::new(inbox, ListTarget::new(PrintingTable), CoordinatorOptions::new());
    c.load();

    // Archive "invoice" into a brand-new folder and mark "hello" as read.
    let inbox = c.source_mut();
    inbox.sections = vec![vec!["hello"], vec!["newsletter"], vec!["invoice"]];
    inbox.refresh();
    inbox.emit(Notification::WillChangeContent);
    inbox.emit(Notification::section_inserted(2));
    inbox.emit(Notification::moved("invoice", Position::new(0, 1), Position::new(2, 0)));
    inbox.emit(Notification::updated("hello", Position::new(0, 0)));
    inbox.emit(Notification::DidChangeContent);

    let handled = c.pump();
    println!("handled {handled} notifications; state={:?}", c.state());

    c.set_paused(true);
    c.source_mut().emit(Notification::DidChangeContent);
    println!("while paused: handled {}", c.pump());

    c.set_paused(false);
    println!("sections after resume: {:?}", c.sections());
}
