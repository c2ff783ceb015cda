use crate::*;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;

use fetch_coordinator::{
    Coordinator, CoordinatorError, CoordinatorOptions, ListTarget, ListView, Notification,
    ObservedSource, Position, SectionSet, State,
};

const fn p(section: usize, item: usize) -> Position {
    Position::new(section, item)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Cell {
    reuse_identifier: String,
    text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ConfiguratorCall {
    ReuseIdentifier(String, Position),
    Configure(String, Position),
}

#[derive(Default)]
struct SpyConfigurator {
    calls: RefCell<Vec<ConfiguratorCall>>,
}

impl CellConfigurator<String> for SpyConfigurator {
    type Cell = Cell;

    fn reuse_identifier(&self, object: &String, position: Position) -> String {
        self.calls
            .borrow_mut()
            .push(ConfiguratorCall::ReuseIdentifier(object.clone(), position));
        "Row".to_string()
    }

    fn configure(&self, cell: &mut Cell, object: &String, position: Position) {
        self.calls
            .borrow_mut()
            .push(ConfiguratorCall::Configure(object.clone(), position));
        cell.text = object.clone();
    }
}

struct HeaderConfigurator;

impl SupplementaryConfigurator for HeaderConfigurator {
    type View = String;

    fn reuse_identifier(&self, kind: &str, _position: Position) -> String {
        format!("{kind}-view")
    }

    fn configure(&self, view: &mut String, kind: &str, position: Position) {
        *view = format!("{view}:{kind}@{position}");
    }
}

fn dequeue(reuse_identifier: &str, _position: Position) -> Cell {
    Cell {
        reuse_identifier: reuse_identifier.to_string(),
        text: String::new(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn fruit_source() -> MemorySource<String> {
    MemorySource::new(vec![
        MemorySection::new("apples", strings(&["braeburn", "gala"])),
        MemorySection::new("Avocados", strings(&["hass"])),
        MemorySection::new("bananas", strings(&["cavendish"])),
    ])
}

fn fetched_fruit() -> MemorySource<String> {
    let mut source = fruit_source();
    source.perform_fetch().unwrap();
    source
}

// ---------------------------------------------------------------------------------------------
// SectionedDataSource

#[test]
fn unfetched_source_reports_one_empty_section() {
    let ds = SectionedDataSource::new(SpyConfigurator::default());
    let source = fruit_source();
    assert_eq!(ds.number_of_sections(&source), 1);
    assert_eq!(ds.number_of_items(&source, 0), 0);
}

#[test]
fn counts_follow_the_fetched_snapshot() {
    let ds = SectionedDataSource::new(SpyConfigurator::default());
    let source = fetched_fruit();
    assert_eq!(ds.number_of_sections(&source), 3);
    assert_eq!(ds.number_of_items(&source, 0), 2);
    assert_eq!(ds.number_of_items(&source, 2), 1);
    assert_eq!(ds.number_of_items(&source, 7), 0);
}

#[test]
fn cell_is_dequeued_by_identifier_then_configured() {
    let ds = SectionedDataSource::new(SpyConfigurator::default());
    let source = fetched_fruit();

    let cell = ds.cell_for(&source, p(0, 1), dequeue);
    assert_eq!(cell.reuse_identifier, "Row");
    assert_eq!(cell.text, "gala");
    assert_eq!(
        *ds.configurator().calls.borrow(),
        vec![
            ConfiguratorCall::ReuseIdentifier("gala".to_string(), p(0, 1)),
            ConfiguratorCall::Configure("gala".to_string(), p(0, 1)),
        ]
    );
}

#[test]
fn missing_object_is_an_error() {
    let ds = SectionedDataSource::new(SpyConfigurator::default());
    let source = fetched_fruit();
    assert_eq!(
        ds.try_cell_for(&source, p(4, 0), dequeue).unwrap_err(),
        AdapterError::MissingObject(p(4, 0))
    );
    assert!(ds.configurator().calls.borrow().is_empty());
}

#[test]
#[should_panic(expected = "no object at")]
fn missing_object_is_fatal_for_cells() {
    let ds = SectionedDataSource::new(SpyConfigurator::default());
    let source = fetched_fruit();
    ds.cell_for(&source, p(0, 9), dequeue);
}

#[test]
fn headers_only_with_system_headers() {
    let source = fetched_fruit();
    let ds = SectionedDataSource::new(SpyConfigurator::default());
    assert_eq!(ds.title_for_header(&source, 0), None);

    let ds = ds.with_system_headers(true);
    assert_eq!(ds.title_for_header(&source, 1).as_deref(), Some("Avocados"));
    assert_eq!(ds.title_for_header(&source, 5), None);
}

#[test]
fn index_titles_are_uppercased_and_deduplicated() {
    let source = fetched_fruit();
    let ds = SectionedDataSource::new(SpyConfigurator::default());
    assert_eq!(ds.section_index_titles(&source), None);

    let ds = ds.with_table_index(true);
    assert_eq!(
        ds.section_index_titles(&source),
        Some(strings(&["A", "B"]))
    );
    assert_eq!(ds.section_for_index_title(&source, "A", 0), 0);
    assert_eq!(ds.section_for_index_title(&source, "B", 1), 2);
    assert_eq!(ds.section_for_index_title(&source, "Z", 9), 2);
}

#[test]
fn supplementary_views_need_a_configurator() {
    let ds = SectionedDataSource::new(SpyConfigurator::default());
    assert!(!ds.has_supplementary_views());

    let ds = ds.with_supplementary(HeaderConfigurator);
    assert!(ds.has_supplementary_views());
    let view = ds.supplementary_view("header", p(1, 0), |kind, reuse_identifier, _| {
        assert_eq!(kind, "header");
        reuse_identifier.to_string()
    });
    assert_eq!(view, "header-view:header@(1, 0)");
}

#[test]
fn supplementary_view_without_configurator_is_an_error() {
    let ds = SectionedDataSource::new(SpyConfigurator::default());
    let err = ds
        .try_supplementary_view("footer", p(0, 0), |_, _, _| unreachable!("never dequeued"))
        .unwrap_err();
    assert_eq!(err, AdapterError::NoSupplementaryConfigurator);
}

// ---------------------------------------------------------------------------------------------
// ListDataSource

fn list() -> ListDataSource<String, SpyConfigurator> {
    ListDataSource::new(SpyConfigurator::default(), strings(&["one", "two", "three"]))
}

#[test]
fn list_has_one_section_and_counts_items() {
    let ds = list();
    assert_eq!(ds.number_of_sections(), 1);
    assert_eq!(ds.number_of_items(1), 3);

    let empty = ListDataSource::<String, _>::new(SpyConfigurator::default(), Vec::new());
    assert_eq!(empty.number_of_items(0), 0);
}

#[test]
fn list_cell_uses_configurator() {
    let ds = list();
    let cell = ds.cell_for(p(0, 0), dequeue);
    assert_eq!(cell.text, "one");
    assert!(
        ds.configurator()
            .calls
            .borrow()
            .contains(&ConfiguratorCall::ReuseIdentifier("one".to_string(), p(0, 0)))
    );
}

#[test]
fn list_header_is_the_default_section_title() {
    let ds = list();
    assert_eq!(ds.title_for_header(0), None);
    let ds = ds.with_default_section_title("DefaultSectionTitle");
    assert_eq!(ds.title_for_header(0), Some("DefaultSectionTitle"));
}

#[test]
fn list_rejects_other_sections() {
    let ds = list();
    assert_eq!(
        ds.try_object_at(p(1, 0)),
        Err(AdapterError::OutsideList(p(1, 0)))
    );
    assert_eq!(
        ds.try_object_at(p(0, 3)),
        Err(AdapterError::MissingObject(p(0, 3)))
    );
}

#[test]
#[should_panic(expected = "only section 0 is supported")]
fn list_object_outside_section_zero_is_fatal() {
    list().object_at(p(1, 0));
}

// ---------------------------------------------------------------------------------------------
// TableSelection

#[derive(Default)]
struct SpyTableView {
    selected: Vec<Position>,
}

impl SelectableView for SpyTableView {
    fn select_row(&mut self, position: Position) {
        self.selected.push(position);
    }

    fn selected_rows(&self) -> Vec<Position> {
        self.selected.clone()
    }
}

#[test]
fn select_objects_skips_absent_objects() {
    let ds = list();
    let mut view = SpyTableView::default();
    ds.select_objects(&mut view, &strings(&["three", "missing", "one"]));
    assert_eq!(view.selected, vec![p(0, 2), p(0, 0)]);
}

#[test]
fn selected_objects_map_rows_back_to_objects() {
    let ds = list();
    let mut view = SpyTableView::default();
    assert!(ds.selected_objects(&view).is_empty());
    assert_eq!(ds.selected_object(&view), None);

    view.selected = vec![p(0, 1), p(0, 2)];
    assert_eq!(ds.selected_objects(&view), strings(&["two", "three"]));
    assert_eq!(ds.selected_object(&view).as_deref(), Some("two"));
}

#[test]
fn fetched_selection_reads_the_source() {
    let source = fetched_fruit();
    let selection = FetchedSelection::new(&source);
    let mut view = SpyTableView::default();

    selection.select_objects(&mut view, &strings(&["hass", "cavendish"]));
    assert_eq!(view.selected, vec![p(1, 0), p(2, 0)]);
    assert_eq!(selection.selected_object(&view).as_deref(), Some("hass"));
}

#[test]
#[should_panic(expected = "no object at")]
fn fetched_selection_of_missing_row_is_fatal() {
    let source = fetched_fruit();
    let view = SpyTableView {
        selected: vec![p(9, 9)],
    };
    FetchedSelection::new(&source).selected_objects(&view);
}

// ---------------------------------------------------------------------------------------------
// MemorySource

#[test]
fn notifications_without_subscriber_are_dropped() {
    let mut source = fetched_fruit();
    assert!(!source.emit(Notification::DidChangeContent));
    assert_eq!(source.dropped_count(), 1);

    let subscription = source.subscribe();
    assert!(source.emit(Notification::DidChangeContent));
    assert_eq!(source.pending(), 1);

    source.unsubscribe(subscription);
    assert_eq!(source.pending(), 0);
    assert_eq!(source.dropped_count(), 2);
}

#[test]
fn stale_subscription_receives_nothing() {
    let mut source = fetched_fruit();
    let old = source.subscribe();
    let current = source.subscribe();
    source.emit(Notification::DidChangeContent);
    assert_eq!(source.next_notification(&old), None);
    assert_eq!(
        source.next_notification(&current),
        Some(Notification::DidChangeContent)
    );
}

#[test]
fn scripted_fetch_failure_fails_once() {
    let mut source = fruit_source();
    source.fail_next_fetch("offline");
    let err = source.perform_fetch().unwrap_err();
    assert_eq!(err.to_string(), "fetch rejected: offline");
    assert!(source.sections().is_none());

    source.perform_fetch().unwrap();
    assert_eq!(source.fetch_count(), 2);
    assert_eq!(source.sections().map(|s| s.len()), Some(3));
}

#[test]
fn nothing_is_readable_before_the_first_fetch() {
    let source = fruit_source();
    assert!(source.sections().is_none());
    assert_eq!(source.object_at(p(0, 0)), None);
    assert_eq!(source.position_of(&"gala".to_string()), None);
    assert_eq!(source.data().len(), 3);
}

#[test]
fn snapshot_follows_data_while_subscribed() {
    let mut source = fetched_fruit();
    let _subscription = source.subscribe();
    source.set_sections(vec![MemorySection::new("x", strings(&["1", "2"]))]);
    assert_eq!(source.sections().unwrap()[0].item_count, 2);
    assert_eq!(source.position_of(&"2".to_string()), Some(p(0, 1)));
    assert_eq!(source.object_at(p(0, 0)).as_deref(), Some("1"));
}

#[test]
fn unobserved_changes_wait_for_the_next_fetch() {
    let mut source = fetched_fruit();
    source.set_sections(vec![MemorySection::new("x", strings(&["1"]))]);
    assert_eq!(source.sections().map(|s| s.len()), Some(3));
    assert_eq!(source.object_at(p(0, 1)).as_deref(), Some("gala"));
    assert_eq!(source.object_at(p(0, 0)).as_deref(), Some("braeburn"));

    source.perform_fetch().unwrap();
    assert_eq!(source.sections().map(|s| s.len()), Some(1));
    assert_eq!(source.object_at(p(0, 0)).as_deref(), Some("1"));
}

// ---------------------------------------------------------------------------------------------
// End to end

#[derive(Clone, Debug, PartialEq, Eq)]
enum ViewCall {
    ReloadData,
    Begin,
    End,
    DeleteSections(Vec<usize>),
    InsertSections(Vec<usize>),
    DeleteRows(Vec<Position>),
    InsertRows(Vec<Position>),
    ReloadRows(Vec<Position>),
}

#[derive(Default)]
struct RecordingTable {
    calls: Vec<ViewCall>,
    /// On-screen cells, refreshed in place by reconfigure thunks.
    cells: Rc<RefCell<VisibleTable>>,
}

#[derive(Default)]
struct VisibleTable {
    cells: BTreeMap<Position, Cell>,
}

impl VisibleCells for VisibleTable {
    type Cell = Cell;

    fn visible_cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.cells.get_mut(&position)
    }
}

impl ListView for RecordingTable {
    fn reload_data(&mut self) {
        self.calls.push(ViewCall::ReloadData);
    }
    fn begin_updates(&mut self) {
        self.calls.push(ViewCall::Begin);
    }
    fn end_updates(&mut self) {
        self.calls.push(ViewCall::End);
    }
    fn delete_sections(&mut self, sections: &SectionSet) {
        self.calls
            .push(ViewCall::DeleteSections(sections.iter().copied().collect()));
    }
    fn insert_sections(&mut self, sections: &SectionSet) {
        self.calls
            .push(ViewCall::InsertSections(sections.iter().copied().collect()));
    }
    fn delete_rows(&mut self, positions: &[Position]) {
        self.calls.push(ViewCall::DeleteRows(positions.to_vec()));
    }
    fn insert_rows(&mut self, positions: &[Position]) {
        self.calls.push(ViewCall::InsertRows(positions.to_vec()));
    }
    fn reload_rows(&mut self, positions: &[Position]) {
        self.calls.push(ViewCall::ReloadRows(positions.to_vec()));
    }
}

type FruitCoordinator = Coordinator<MemorySource<String>, ListTarget<RecordingTable>>;

fn take_calls(c: &mut FruitCoordinator) -> Vec<ViewCall> {
    core::mem::take(&mut c.target_mut().view_mut().calls)
}

#[test]
fn memory_source_drives_a_list_end_to_end() {
    let ds = SectionedDataSource::new(SpyConfigurator::default()).with_system_headers(true);
    let mut c = Coordinator::new(
        fruit_source(),
        ListTarget::new(RecordingTable::default()),
        CoordinatorOptions::new(),
    );
    assert_eq!(ds.number_of_sections(c.source()), 1);

    c.load();
    assert_eq!(c.state(), State::Active);
    assert!(c.source().is_subscribed());
    assert_eq!(take_calls(&mut c), vec![ViewCall::ReloadData]);
    assert_eq!(ds.number_of_sections(c.source()), 3);

    // "gala" moves to the bananas, "Avocados" disappears and "cherries" is added.
    c.source_mut().mutate(
        vec![
            MemorySection::new("apples", strings(&["braeburn"])),
            MemorySection::new("bananas", strings(&["gala", "cavendish"])),
            MemorySection::new("cherries", strings(&["morello"])),
        ],
        [
            Notification::section_deleted(1),
            Notification::section_inserted(2),
            Notification::deleted("hass".to_string(), p(1, 0)),
            Notification::moved("gala".to_string(), p(0, 1), p(1, 0)),
            Notification::inserted("morello".to_string(), p(2, 0)),
        ],
    );
    assert_eq!(c.pump(), 7);

    assert_eq!(
        take_calls(&mut c),
        vec![
            ViewCall::Begin,
            ViewCall::DeleteSections(vec![1]),
            ViewCall::InsertSections(vec![2]),
            ViewCall::DeleteRows(vec![p(0, 1)]),
            ViewCall::InsertRows(vec![p(1, 0)]),
            ViewCall::End,
        ]
    );
    assert_eq!(ds.title_for_header(c.source(), 2).as_deref(), Some("cherries"));
    assert_eq!(c.object_at(p(1, 0)), "gala");
    let cell = ds.cell_for(c.source(), p(1, 1), dequeue);
    assert_eq!(cell.text, "cavendish");
}

#[test]
fn paused_list_reloads_on_resume() {
    let mut c = Coordinator::new(
        fruit_source(),
        ListTarget::new(RecordingTable::default()),
        CoordinatorOptions::new(),
    );
    c.load();
    c.set_paused(true);
    take_calls(&mut c);

    c.source_mut().mutate(
        vec![MemorySection::new("apples", strings(&["braeburn"]))],
        [
            Notification::section_deleted(1),
            Notification::section_deleted(2),
            Notification::deleted("gala".to_string(), p(0, 1)),
        ],
    );
    assert_eq!(c.source().dropped_count(), 5);
    assert_eq!(c.pump(), 0);
    assert!(take_calls(&mut c).is_empty());
    // The view still shows the last reload; so does the source.
    assert_eq!(c.sections().map(|s| s.len()), Some(3));

    c.set_paused(false);
    assert_eq!(take_calls(&mut c), vec![ViewCall::ReloadData]);
    assert_eq!(c.source().fetch_count(), 2);
    assert_eq!(c.sections().map(|s| s.len()), Some(1));
}

#[test]
fn failed_memory_fetch_surfaces_the_reason() {
    let mut c = Coordinator::new(
        fruit_source(),
        ListTarget::new(RecordingTable::default()),
        CoordinatorOptions::new(),
    );
    c.source_mut().fail_next_fetch("disk full");
    match c.try_load() {
        Err(CoordinatorError::Fetch(err)) => assert_eq!(err.reason, "disk full"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(!c.source().is_subscribed());
}

#[test]
fn updates_reconfigure_visible_cells_in_place() {
    let table = RecordingTable::default();
    let cells = Rc::clone(&table.cells);
    let configurator = Rc::new(SpyConfigurator::default());
    cells.borrow_mut().cells.insert(
        p(0, 0),
        Cell {
            reuse_identifier: "Row".to_string(),
            text: "braeburn".to_string(),
        },
    );

    let factory = reconfigure_visible(Rc::clone(&configurator), Rc::clone(&cells));
    let mut c = Coordinator::new(
        fruit_source(),
        ListTarget::new(table),
        CoordinatorOptions::new().with_reconfigure_factory(Some(factory)),
    );
    c.load();
    take_calls(&mut c);

    c.source_mut().mutate(
        vec![
            MemorySection::new("apples", strings(&["Braeburn", "Gala"])),
            MemorySection::new("Avocados", strings(&["hass"])),
            MemorySection::new("bananas", strings(&["cavendish"])),
        ],
        [
            Notification::updated("Braeburn".to_string(), p(0, 0)),
            // Off screen: nothing to refresh.
            Notification::updated("Gala".to_string(), p(0, 1)),
        ],
    );
    c.pump();

    assert_eq!(take_calls(&mut c), vec![ViewCall::Begin, ViewCall::End]);
    assert_eq!(cells.borrow().cells[&p(0, 0)].text, "Braeburn");
    assert!(!cells.borrow().cells.contains_key(&p(0, 1)));
    assert_eq!(
        *configurator.calls.borrow(),
        vec![ConfiguratorCall::Configure("Braeburn".to_string(), p(0, 0))]
    );
}
