//! Shared fakes for engine integration tests: a scripted input/menu pair,
//! a manual-resolution transport, and a signal recorder.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use typeahead_engine::{
    InputPort, MenuPort, Subscription, Transport, TransportDone, TransportError, Typeahead,
    TypeaheadSignal,
};

/// Input control fake: focus flag and display text are set by the test.
#[derive(Default)]
pub struct FakeInput {
    pub focused: Cell<bool>,
    pub text: RefCell<String>,
}

impl FakeInput {
    pub fn focused() -> Rc<Self> {
        let input = Self::default();
        input.focused.set(true);
        Rc::new(input)
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }
}

impl InputPort for FakeInput {
    fn is_focused(&self) -> bool {
        self.focused.get()
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }
}

/// Menu fake: hover flag set by the test.
#[derive(Default)]
pub struct FakeMenu {
    pub hovered: Cell<bool>,
}

impl MenuPort for FakeMenu {
    fn is_hovered(&self) -> bool {
        self.hovered.get()
    }
}

/// Transport fake that parks every request until the test resolves it,
/// so arrival order (and staleness) is fully scripted.
#[derive(Default)]
pub struct FakeTransport {
    requests: RefCell<Vec<(String, TransportDone)>>,
}

impl FakeTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn request_urls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Resolve the request at `index` (in issue order).
    pub fn resolve(&self, index: usize, result: Result<Value, TransportError>) {
        let (_, done) = self.requests.borrow_mut().remove(index);
        done(result);
    }
}

impl Transport for FakeTransport {
    fn request(&self, url: &str, done: TransportDone) {
        self.requests.borrow_mut().push((url.to_string(), done));
    }
}

/// Records every emitted signal for later assertions.
pub struct SignalLog<T> {
    signals: Rc<RefCell<Vec<TypeaheadSignal<T>>>>,
    _subscription: Subscription,
}

impl<T: Clone + 'static> SignalLog<T> {
    pub fn attach(engine: &Typeahead<T>) -> Self
    where
        T: typeahead_engine::CandidateText,
    {
        let signals = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&signals);
        let subscription = engine.subscribe(move |signal| sink.borrow_mut().push(signal.clone()));
        Self {
            signals,
            _subscription: subscription,
        }
    }

    pub fn all(&self) -> Vec<TypeaheadSignal<T>> {
        self.signals.borrow().clone()
    }

    pub fn clear(&self) {
        self.signals.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&TypeaheadSignal<T>) -> bool) -> usize {
        self.signals.borrow().iter().filter(|s| pred(s)).count()
    }

    pub fn loading_count(&self) -> usize {
        self.count(|s| matches!(s, TypeaheadSignal::Loading))
    }

    pub fn loaded_count(&self) -> usize {
        self.count(|s| matches!(s, TypeaheadSignal::Loaded))
    }

    pub fn error_count(&self) -> usize {
        self.count(|s| matches!(s, TypeaheadSignal::LoadedError(_)))
    }
}
