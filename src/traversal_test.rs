// Unit tests for the focus-order traversal state machine.

use super::*;
use pretty_assertions::assert_eq;
use std::collections::{HashMap, HashSet};

/// In-memory page with a fixed focus graph.
///
/// Edges map (currently focused element, pressed key) to the element that
/// receives focus next; a missing edge drops focus entirely. Marking is a
/// check-and-set against a set, mirroring the attribute on a real page.
struct MockPage {
    edges: HashMap<(Option<u32>, NavKey), u32>,
    focus: Option<u32>,
    marked: HashSet<u32>,
    mark_calls: Vec<u32>,
    presses: Vec<NavKey>,
}

impl MockPage {
    fn new(edges: &[((Option<u32>, NavKey), u32)]) -> Self {
        Self {
            edges: edges.iter().copied().collect(),
            focus: None,
            marked: HashSet::new(),
            mark_calls: Vec::new(),
            presses: Vec::new(),
        }
    }
}

impl FocusDriver for MockPage {
    async fn press(&mut self, key: NavKey) -> anyhow::Result<()> {
        self.presses.push(key);
        self.focus = self.edges.get(&(self.focus, key)).copied();
        Ok(())
    }

    async fn observe(&mut self) -> anyhow::Result<FocusOutcome> {
        match self.focus {
            None => Ok(FocusOutcome::NoFocus),
            Some(id) => {
                if self.marked.contains(&id) {
                    Ok(FocusOutcome::AlreadyMarked)
                } else {
                    self.marked.insert(id);
                    self.mark_calls.push(id);
                    Ok(FocusOutcome::NewFocus(FocusedElement {
                        tag: "div".to_string(),
                        id: Some(format!("e{}", id)),
                        text: None,
                    }))
                }
            }
        }
    }
}

/// Page whose arrow keys keep revealing fresh focusable elements forever.
struct EndlessPage {
    next_id: u32,
    presses: u64,
}

impl FocusDriver for EndlessPage {
    async fn press(&mut self, _key: NavKey) -> anyhow::Result<()> {
        self.presses += 1;
        self.next_id += 1;
        Ok(())
    }

    async fn observe(&mut self) -> anyhow::Result<FocusOutcome> {
        Ok(FocusOutcome::NewFocus(FocusedElement {
            tag: "div".to_string(),
            id: Some(format!("synthetic-{}", self.next_id)),
            text: None,
        }))
    }
}

use NavKey::{ArrowDown, ArrowRight, Tab};

/// Plain page: elements 1-2-3 in tab order, arrow keys leave focus put.
fn plain_page(n: u32) -> MockPage {
    let mut edges = vec![((None, Tab), 1)];
    for id in 1..=n {
        let next = if id == n { 1 } else { id + 1 };
        edges.push(((Some(id), Tab), next));
        edges.push(((Some(id), ArrowRight), id));
        edges.push(((Some(id), ArrowDown), id));
    }
    MockPage::new(&edges)
}

#[tokio::test]
async fn tab_cycle_closure_terminates() {
    let mut page = plain_page(3);
    let summary = run(&mut page, None).await.unwrap();

    assert_eq!(summary.stop, StopReason::TabCycleClosed);
    assert_eq!(summary.marked, 3);
    assert_eq!(page.marked, HashSet::from([1, 2, 3]));
    // Each element costs one Tab plus the two exhausted arrow probes;
    // the final Tab wraps back to element 1 and stops.
    assert_eq!(
        page.presses,
        vec![
            Tab, ArrowRight, ArrowDown, Tab, ArrowRight, ArrowDown, Tab, ArrowRight, ArrowDown,
            Tab
        ]
    );
    assert_eq!(summary.presses, page.presses.len() as u64);
    assert_eq!(summary.steps, 10);
}

#[tokio::test]
async fn arrow_fallback_never_reattempts_arrow_right() {
    // A and B form a 2-cycle under ArrowRight; Tab from A goes nowhere.
    let mut page = MockPage::new(&[
        ((None, Tab), 1),
        ((Some(1), ArrowRight), 2),
        ((Some(2), ArrowRight), 1),
        ((Some(1), ArrowDown), 1),
    ]);
    let summary = run(&mut page, None).await.unwrap();

    assert_eq!(summary.stop, StopReason::FocusLost);
    assert_eq!(page.presses, vec![Tab, ArrowRight, ArrowRight, ArrowDown, Tab]);
    assert_eq!(page.mark_calls, vec![1, 2]);
}

#[tokio::test]
async fn lost_focus_terminates_after_one_step() {
    // Empty page: the initial Tab lands nowhere.
    let mut page = MockPage::new(&[]);
    let summary = run(&mut page, None).await.unwrap();

    assert_eq!(summary.stop, StopReason::FocusLost);
    assert_eq!(summary.steps, 1);
    assert_eq!(summary.marked, 0);
    assert_eq!(summary.presses, 1);
    assert!(page.mark_calls.is_empty());
}

#[tokio::test]
async fn observation_is_idempotent() {
    let mut page = MockPage::new(&[((None, Tab), 7)]);
    page.press(Tab).await.unwrap();

    let first = page.observe().await.unwrap();
    assert!(matches!(first, FocusOutcome::NewFocus(_)));
    let second = page.observe().await.unwrap();
    assert_eq!(second, FocusOutcome::AlreadyMarked);
    assert_eq!(page.mark_calls, vec![7]);
}

#[tokio::test]
async fn roving_widget_explored_before_tab_moves_on() {
    // E1=1, E2=2, widget W1=10 / W2=11 reachable only via ArrowRight
    // from E1. Tab order is E1 -> E2 -> E1, entered from the widget.
    let mut page = MockPage::new(&[
        ((None, Tab), 1),
        ((Some(1), ArrowRight), 10),
        ((Some(10), ArrowRight), 11),
        ((Some(11), ArrowRight), 10),
        ((Some(10), ArrowDown), 10),
        ((Some(10), Tab), 2),
        ((Some(2), ArrowRight), 2),
        ((Some(2), ArrowDown), 2),
        ((Some(2), Tab), 1),
    ]);
    let summary = run(&mut page, None).await.unwrap();

    assert_eq!(summary.stop, StopReason::TabCycleClosed);
    // The widget is fully walked before the traversal proceeds past E1.
    assert_eq!(page.mark_calls, vec![1, 10, 11, 2]);
    assert_eq!(page.marked, HashSet::from([1, 2, 10, 11]));
}

#[tokio::test]
async fn no_element_is_marked_twice() {
    let mut page = plain_page(5);
    run(&mut page, None).await.unwrap();

    let unique: HashSet<u32> = page.mark_calls.iter().copied().collect();
    assert_eq!(unique.len(), page.mark_calls.len());
}

#[tokio::test]
async fn step_limit_bounds_adversarial_pages() {
    let mut page = EndlessPage {
        next_id: 0,
        presses: 0,
    };
    let summary = run(&mut page, Some(25)).await.unwrap();

    assert_eq!(summary.stop, StopReason::StepLimit);
    assert_eq!(summary.steps, 25);
    assert_eq!(summary.marked, 25);
}

#[tokio::test]
async fn zero_step_limit_stops_before_observing() {
    let mut page = plain_page(2);
    let summary = run(&mut page, Some(0)).await.unwrap();

    assert_eq!(summary.stop, StopReason::StepLimit);
    assert_eq!(summary.steps, 0);
    assert_eq!(summary.marked, 0);
    // The unconditional initial Tab was still pressed.
    assert_eq!(page.presses, vec![Tab]);
}

#[test]
fn transition_table_matches_design() {
    assert_eq!(Tab.on_new_focus(), ArrowRight);
    assert_eq!(ArrowRight.on_new_focus(), ArrowRight);
    assert_eq!(ArrowDown.on_new_focus(), ArrowDown);

    assert_eq!(Tab.on_revisit(), None);
    assert_eq!(ArrowRight.on_revisit(), Some(ArrowDown));
    assert_eq!(ArrowDown.on_revisit(), Some(Tab));

    assert!(!Tab.is_arrow());
    assert!(ArrowRight.is_arrow());
    assert!(ArrowDown.is_arrow());
}

#[test]
fn webdriver_key_codes() {
    assert_eq!(Tab.code(), '\u{e004}');
    assert_eq!(ArrowRight.code(), '\u{e014}');
    assert_eq!(ArrowDown.code(), '\u{e015}');
}
