//! An in-memory window system that records every resource it hands out.
//!

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use tracing::subscriber::set_global_default;
use tracing_subscriber::{filter::LevelFilter, fmt::format::FmtSpan, layer::SubscriberExt};
use window_capture_provider::{
    CallError, CaptureRect, DrawingSurface, LabelledResult, RowOrder, WindowSystem,
};

/// The resources a surface acquires, in acquisition order.
pub const SURFACE_RESOURCES: [&str; 4] = ["screen_dc", "memory_dc", "bitmap", "selection"];

/// An opaque window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockHandle(pub u32);

pub fn init_logger() {
    let filter = tracing_subscriber::filter::Targets::new().with_default(LevelFilter::TRACE);

    let std_logger = tracing_subscriber::fmt::layer()
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .with_target(false)
        .without_time();

    let collector = tracing_subscriber::registry().with(std_logger).with(filter);

    // Every test in a binary shares the global subscriber, only the first one wins.
    let _ = set_global_default(collector);
}

/// A window on the mock desktop.
#[derive(Debug, Clone)]
pub struct MockWindow {
    pub title: String,
    pub visible: bool,
    pub rect: CaptureRect,

    /// What the window renders when asked for its full content, B8G8R8A8 top-down.
    pub content: Vec<u8>,

    /// What is on screen at the window's rect, B8G8R8A8 top-down.
    pub on_screen: Vec<u8>,

    /// If the window honours full content render requests.
    pub renders_full_content: bool,

    /// The window is enumerated but is gone by the time it is queried.
    pub closes_before_capture: bool,
}

impl MockWindow {
    /// A visible window filled with a single B8G8R8A8 color.
    pub fn solid(title: &str, rect: CaptureRect, bgra: [u8; 4]) -> Self {
        let pixel_count = pixel_count(rect);
        let content: Vec<u8> = bgra.iter().copied().cycle().take(pixel_count * 4).collect();

        Self {
            title: title.to_string(),
            visible: true,
            rect,
            on_screen: content.clone(),
            content,
            renders_full_content: true,
            closes_before_capture: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn without_full_content(mut self) -> Self {
        self.renders_full_content = false;
        self
    }

    pub fn closing_before_capture(mut self) -> Self {
        self.closes_before_capture = true;
        self
    }

    /// Paints row `y` of the window's content with a B8G8R8A8 color.
    pub fn with_row(mut self, y: usize, bgra: [u8; 4]) -> Self {
        let stride = self.rect.width() as usize * 4;

        for pixel in self.content[y * stride..(y + 1) * stride].chunks_exact_mut(4) {
            pixel.copy_from_slice(&bgra);
        }

        self
    }

    /// Replaces what is on screen at the window's rect with a single B8G8R8A8 color, as if
    /// another window covered it.
    pub fn covered_by(mut self, bgra: [u8; 4]) -> Self {
        let pixel_count = pixel_count(self.rect);
        self.on_screen = bgra.iter().copied().cycle().take(pixel_count * 4).collect();
        self
    }
}

fn pixel_count(rect: CaptureRect) -> usize {
    rect.width().max(0) as usize * rect.height().max(0) as usize
}

/// Failures to inject into the window system.
#[derive(Debug, Default, Clone, Copy)]
pub struct Failures {
    pub enumeration: bool,
    /// Index into [SURFACE_RESOURCES] of the acquisition that fails.
    pub surface_resource: Option<usize>,
    pub screen_copy: bool,
    pub extraction: bool,
}

/// Every resource acquisition and release, in order.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    pub acquired: Vec<&'static str>,
    pub released: Vec<&'static str>,
    pub full_content_requests: usize,
    pub screen_copies: usize,
}

impl Ledger {
    pub fn is_balanced(&self) -> bool {
        let mut acquired = self.acquired.clone();
        let mut released = self.released.clone();
        acquired.sort_unstable();
        released.sort_unstable();

        acquired == released
    }
}

#[derive(Debug, Default)]
struct MockState {
    windows: Vec<(MockHandle, MockWindow)>,
    next_handle: u32,
    failures: Failures,
    ledger: Ledger,
}

impl MockState {
    fn window(&self, handle: MockHandle) -> Option<&MockWindow> {
        self.windows
            .iter()
            .find(|(window_handle, _)| *window_handle == handle)
            .map(|(_, window)| window)
    }

    fn window_mut(&mut self, handle: MockHandle) -> Option<&mut MockWindow> {
        self.windows
            .iter_mut()
            .find(|(window_handle, _)| *window_handle == handle)
            .map(|(_, window)| window)
    }
}

/// A mock desktop, clones share the same desktop.
#[derive(Debug, Clone, Default)]
pub struct MockWindowSystem {
    state: Rc<RefCell<MockState>>,
}

impl MockWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a window on top of the existing ones, enumeration order is opening order.
    pub fn open(&self, window: MockWindow) -> MockHandle {
        let mut state = self.state.borrow_mut();
        state.next_handle += 1;
        let handle = MockHandle(0x1000 + state.next_handle);
        state.windows.push((handle, window));

        handle
    }

    pub fn close(&self, handle: MockHandle) {
        self.state
            .borrow_mut()
            .windows
            .retain(|(window_handle, _)| *window_handle != handle);
    }

    pub fn set_title(&self, handle: MockHandle, title: &str) {
        if let Some(window) = self.state.borrow_mut().window_mut(handle) {
            window.title = title.to_string();
        }
    }

    pub fn set_failures(&self, failures: Failures) {
        self.state.borrow_mut().failures = failures;
    }

    pub fn ledger(&self) -> Ledger {
        self.state.borrow().ledger.clone()
    }
}

impl WindowSystem for MockWindowSystem {
    type Handle = MockHandle;
    type Surface = MockSurface;

    fn enumerate_windows(&self, visit: &mut dyn FnMut(MockHandle)) -> LabelledResult<()> {
        let handles: Vec<MockHandle> = {
            let state = self.state.borrow();

            if state.failures.enumeration {
                return Err(CallError::from_code(0x5, "EnumWindows"));
            }

            state.windows.iter().map(|(handle, _)| *handle).collect()
        };

        for handle in handles {
            visit(handle);
        }

        Ok(())
    }

    fn is_window_visible(&self, handle: MockHandle) -> bool {
        self.state
            .borrow()
            .window(handle)
            .is_some_and(|window| window.visible)
    }

    fn window_rect(&self, handle: MockHandle) -> LabelledResult<CaptureRect> {
        match self.state.borrow().window(handle) {
            Some(window) if !window.closes_before_capture => Ok(window.rect),
            _ => Err(CallError::from_code(0x578, "GetWindowRect")),
        }
    }

    fn window_title(&self, handle: MockHandle, max_length: usize) -> String {
        self.state
            .borrow()
            .window(handle)
            .map(|window| window.title.chars().take(max_length).collect())
            .unwrap_or_default()
    }

    fn create_surface(&self, width: i32, height: i32) -> LabelledResult<MockSurface> {
        let mut surface = MockSurface {
            state: Rc::clone(&self.state),
            width,
            height,
            bottom_up: vec![0; (width * height * 4) as usize],
            resources: Vec::new(),
        };

        let failing = self.state.borrow().failures.surface_resource;

        for (index, name) in SURFACE_RESOURCES.into_iter().enumerate() {
            if failing == Some(index) {
                // Dropping the partial surface releases what was acquired so far.
                return Err(CallError::failed(name));
            }

            self.state.borrow_mut().ledger.acquired.push(name);
            surface.resources.push(MockResource {
                state: Rc::clone(&self.state),
                name,
            });
        }

        Ok(surface)
    }
}

struct MockResource {
    state: Rc<RefCell<MockState>>,
    name: &'static str,
}

impl Drop for MockResource {
    fn drop(&mut self) {
        self.state.borrow_mut().ledger.released.push(self.name);
    }
}

/// A surface that stores its pixels bottom-up, like a device-independent bitmap.
pub struct MockSurface {
    state: Rc<RefCell<MockState>>,
    width: i32,
    height: i32,
    bottom_up: Vec<u8>,
    resources: Vec<MockResource>,
}

impl MockSurface {
    fn store_top_down(&mut self, top_down: &[u8]) {
        let stride = self.width as usize * 4;
        let rows = top_down.chunks_exact(stride).rev();

        for (destination, source) in self.bottom_up.chunks_exact_mut(stride).zip(rows) {
            destination.copy_from_slice(source);
        }
    }
}

impl DrawingSurface for MockSurface {
    type Handle = MockHandle;

    fn render_full_content(&mut self, window: MockHandle) -> bool {
        let content = {
            let mut state = self.state.borrow_mut();
            state.ledger.full_content_requests += 1;

            match state.window(window) {
                Some(window) if window.renders_full_content => window.content.clone(),
                _ => return false,
            }
        };

        self.store_top_down(&content);
        true
    }

    fn copy_screen_region(&mut self, rect: CaptureRect) -> LabelledResult<()> {
        let on_screen = {
            let mut state = self.state.borrow_mut();
            state.ledger.screen_copies += 1;

            if state.failures.screen_copy {
                return Err(CallError::failed("BitBlt"));
            }

            state
                .windows
                .iter()
                .rev()
                .find(|(_, window)| window.rect == rect)
                .map(|(_, window)| window.on_screen.clone())
        };

        if let Some(on_screen) = on_screen {
            self.store_top_down(&on_screen);
        }

        Ok(())
    }

    fn extract_pixels(&mut self, row_order: RowOrder, buffer: &mut [u8]) -> LabelledResult<()> {
        if self.state.borrow().failures.extraction {
            return Err(CallError::from_code(0x57, "GetDIBits"));
        }

        let stride = self.width as usize * 4;
        match row_order {
            RowOrder::BottomUp => buffer.copy_from_slice(&self.bottom_up),
            RowOrder::TopDown => {
                let rows = self.bottom_up.chunks_exact(stride).rev();
                for (destination, source) in buffer.chunks_exact_mut(stride).zip(rows) {
                    destination.copy_from_slice(source);
                }
            }
        }

        Ok(())
    }
}

impl Drop for MockSurface {
    fn drop(&mut self) {
        while let Some(resource) = self.resources.pop() {
            drop(resource);
        }
    }
}
