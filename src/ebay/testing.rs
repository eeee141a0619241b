//! In-memory browser used by collector and command tests.

use super::browser::{Browser, BrowserError};
use super::selectors::results;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

/// State of the next-page control on a fake results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextControl {
    Missing,
    Enabled,
    Disabled,
    AriaDisabled,
    /// Present and enabled, but clicking it fails.
    Broken,
    /// Present, but never displayed.
    Hidden,
}

#[derive(Debug, Clone, Default)]
pub struct FakeItem {
    pub title: Option<String>,
    pub price: Option<String>,
    pub sales: Option<String>,
}

impl FakeItem {
    pub fn new(title: &str, price: &str) -> Self {
        Self { title: Some(title.to_string()), price: Some(price.to_string()), sales: None }
    }

    pub fn with_sales(mut self, sales: &str) -> Self {
        self.sales = Some(sales.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub items: Vec<FakeItem>,
    pub next: NextControl,
}

impl FakePage {
    pub fn new(items: Vec<FakeItem>, next: NextControl) -> Self {
        Self { items, next }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FakeElement {
    SearchInput,
    Item { page: usize, index: usize },
    Field(String),
    Next { page: usize },
}

#[derive(Debug, Default)]
struct FakeState {
    /// `None` while on the landing page.
    current: Option<usize>,
    typed: String,
    visited: Vec<String>,
    lookups: Vec<String>,
}

/// Scripted browser: a landing page with an optional search box, followed by
/// a fixed sequence of results pages.
pub struct FakeBrowser {
    search_selector: Option<String>,
    pages: Vec<FakePage>,
    ready_state: String,
    failing_lookup: Option<String>,
    state: Mutex<FakeState>,
    released: Arc<AtomicBool>,
}

impl FakeBrowser {
    pub fn new(search_selector: Option<&str>, pages: Vec<FakePage>) -> Self {
        Self {
            search_selector: search_selector.map(String::from),
            pages,
            ready_state: "complete".to_string(),
            failing_lookup: None,
            state: Mutex::new(FakeState::default()),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every ready-state check report the given value.
    pub fn with_ready_state(mut self, state: &str) -> Self {
        self.ready_state = state.to_string();
        self
    }

    /// Makes every page-wide lookup of `selector` fail like a dead session.
    pub fn with_failing_lookup(mut self, selector: &str) -> Self {
        self.failing_lookup = Some(selector.to_string());
        self
    }

    /// Flag set once `quit` has been called.
    pub fn released_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }

    pub fn lookups(&self) -> Vec<String> {
        self.state.lock().unwrap().lookups.clone()
    }

    pub fn typed(&self) -> String {
        self.state.lock().unwrap().typed.clone()
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.lock().unwrap().visited.clone()
    }

    pub fn current_page(&self) -> Option<usize> {
        self.state.lock().unwrap().current
    }
}

pub fn is_released(flag: &Arc<AtomicBool>) -> bool {
    flag.load(Ordering::SeqCst)
}

/// Collects formatted log output for the current thread.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Routes every event, down to TRACE, into this buffer until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    type Element = FakeElement;

    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        let mut state = self.state.lock().unwrap();
        state.visited.push(url.to_string());
        state.current = None;
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<FakeElement>, BrowserError> {
        let mut state = self.state.lock().unwrap();
        state.lookups.push(selector.to_string());

        if self.failing_lookup.as_deref() == Some(selector) {
            return Err(BrowserError::Driver("invalid session id".to_string()));
        }

        let Some(page) = state.current else {
            let found = self.search_selector.as_deref() == Some(selector);
            return Ok(if found { vec![FakeElement::SearchInput] } else { Vec::new() });
        };

        let page_data = &self.pages[page];
        Ok(match selector {
            results::ITEM => (0..page_data.items.len())
                .map(|index| FakeElement::Item { page, index })
                .collect(),
            results::NEXT_PAGE if page_data.next != NextControl::Missing => {
                vec![FakeElement::Next { page }]
            }
            _ => Vec::new(),
        })
    }

    async fn find_in(
        &self,
        parent: &FakeElement,
        selector: &str,
    ) -> Result<FakeElement, BrowserError> {
        let FakeElement::Item { page, index } = parent else {
            return Err(BrowserError::NotFound(selector.to_string()));
        };
        let item = &self.pages[*page].items[*index];
        let field = match selector {
            results::TITLE => item.title.clone(),
            results::PRICE => item.price.clone(),
            results::SALES => item.sales.clone(),
            _ => None,
        };
        field
            .map(FakeElement::Field)
            .ok_or_else(|| BrowserError::NotFound(selector.to_string()))
    }

    async fn text(&self, element: &FakeElement) -> Result<String, BrowserError> {
        match element {
            FakeElement::Field(text) => Ok(text.clone()),
            FakeElement::Next { .. } => Ok("Siguiente".to_string()),
            _ => Ok(String::new()),
        }
    }

    async fn attribute(
        &self,
        element: &FakeElement,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let FakeElement::Next { page } = element else {
            return Ok(None);
        };
        let next = self.pages[*page].next;
        Ok(match (name, next) {
            ("class", NextControl::Disabled) => Some("pagination__next disabled".to_string()),
            ("class", _) => Some("pagination__next".to_string()),
            ("aria-disabled", NextControl::AriaDisabled) => Some("true".to_string()),
            _ => None,
        })
    }

    async fn send_keys(&self, element: &FakeElement, text: &str) -> Result<(), BrowserError> {
        if *element != FakeElement::SearchInput {
            return Err(BrowserError::Driver("element not interactable".to_string()));
        }
        self.state.lock().unwrap().typed.push_str(text);
        Ok(())
    }

    async fn press_enter(&self, element: &FakeElement) -> Result<(), BrowserError> {
        if *element != FakeElement::SearchInput {
            return Err(BrowserError::Driver("element not interactable".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        if !self.pages.is_empty() {
            state.current = Some(0);
        }
        Ok(())
    }

    async fn is_clickable(&self, element: &FakeElement) -> Result<bool, BrowserError> {
        Ok(match element {
            FakeElement::Next { page } => self.pages[*page].next != NextControl::Hidden,
            _ => true,
        })
    }

    async fn click(&self, element: &FakeElement) -> Result<(), BrowserError> {
        let FakeElement::Next { page } = element else {
            return Err(BrowserError::Driver("element not clickable".to_string()));
        };
        if self.pages[*page].next == NextControl::Broken || *page + 1 >= self.pages.len() {
            return Err(BrowserError::Driver("navigation failed".to_string()));
        }
        self.state.lock().unwrap().current = Some(page + 1);
        Ok(())
    }

    async fn execute_script(&self, _script: &str) -> Result<Value, BrowserError> {
        Ok(Value::String(self.ready_state.clone()))
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        let state = self.state.lock().unwrap();
        Ok(match state.current {
            None => "https://www.ebay.es/".to_string(),
            Some(page) => format!("https://www.ebay.es/sch/i.html?_pgn={}", page + 1),
        })
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        Ok("<html><head><title>Captcha check</title></head><body>blocked</body></html>"
            .to_string())
    }

    async fn quit(self) -> Result<(), BrowserError> {
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }
}
