//! Modal page viewer with flip transitions
//!
//! The viewer renders the current page into a primary canvas. Flipping to
//! an adjacent page renders it into a hidden secondary canvas, reveals that
//! canvas while a directional transition plays, and when the transition
//! ends copies the secondary bitmap into the primary canvas. No page is
//! rendered twice for one flip.
//!
//! Timing is driven by [`Viewer::tick`]. The caller supplies the clock, so
//! the event loop decides how often to tick and tests can step time.

mod session;

pub use session::{Direction, Session};

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::canvas::Canvas;
use crate::catalog::CatalogEntry;
use crate::pdf::{
    CacheKey, DEFAULT_PAGE_CACHE_SIZE, DocumentLoader, HiDpiViewports, PageCache, RenderError,
    RenderResult, VIEWER_FALLBACK_WIDTH, container_width_or,
};

/// Length of the flip transition
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(430);
/// Quiet period after the last resize before re-rendering
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(120);

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerConfig {
    /// Reported device pixel ratio; clamped to 1..=3 when rendering
    pub device_pixel_ratio: f32,
    pub transition: Duration,
    pub resize_debounce: Duration,
    pub page_cache_size: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            transition: DEFAULT_TRANSITION,
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE,
            page_cache_size: DEFAULT_PAGE_CACHE_SIZE,
        }
    }
}

/// Where the viewer is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Closed,
    /// Modal shown, document not (yet) loaded. A failed load stays here.
    Loading,
    Showing,
    Transitioning {
        direction: Direction,
        target: usize,
        done_at: Instant,
    },
}

/// State of the toolbar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Controls {
    pub current_page: usize,
    pub total_pages: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl Controls {
    fn new() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            prev_enabled: false,
            next_enabled: false,
        }
    }

    /// Page indicator text, e.g. `2 / 5`
    #[must_use]
    pub fn indicator(&self) -> String {
        format!("{} / {}", self.current_page, self.total_pages)
    }
}

#[derive(Clone, Copy)]
enum Slot {
    Primary,
    Secondary,
}

pub struct Viewer {
    loader: Arc<dyn DocumentLoader>,
    config: ViewerConfig,
    session: Session,
    phase: Phase,
    primary: Canvas,
    secondary: Canvas,
    cache: PageCache,
    controls: Controls,
    title: Option<String>,
    download_url: Option<String>,
    container_width: f32,
    stage_height: u32,
    stage_scroll: u32,
    wrap_height: Option<u32>,
    pending_resize: Option<Instant>,
    saved_scroll: Option<usize>,
}

impl Viewer {
    #[must_use]
    pub fn new(loader: Arc<dyn DocumentLoader>, config: ViewerConfig) -> Self {
        let mut secondary = Canvas::new();
        secondary.set_visible(false);
        let cache = PageCache::new(config.page_cache_size);
        Self {
            loader,
            config,
            session: Session::new(),
            phase: Phase::Closed,
            primary: Canvas::new(),
            secondary,
            cache,
            controls: Controls::new(),
            title: None,
            download_url: None,
            container_width: 0.0,
            stage_height: 0,
            stage_scroll: 0,
            wrap_height: None,
            pending_resize: None,
            saved_scroll: None,
        }
    }

    /// Show the modal and load `entry`, rendering page 1.
    ///
    /// `background_scroll` is the scroll position of whatever the modal
    /// covers; it is handed back by [`Viewer::close`]. Load failures are
    /// logged and leave the modal in [`Phase::Loading`].
    pub fn open(&mut self, entry: &CatalogEntry, background_scroll: usize) {
        if self.is_open() {
            self.close();
        }
        info!("Opening {} ({})", entry.title, entry.url);

        self.phase = Phase::Loading;
        self.title = Some(entry.title.clone());
        self.download_url = Some(entry.url.clone());
        self.saved_scroll = Some(background_scroll);

        let document = match self.loader.open(&entry.url) {
            Ok(doc) if doc.page_count() > 0 => doc,
            Ok(_) => {
                error!("Failed to load {}: document has no pages", entry.url);
                return;
            }
            Err(e) => {
                error!("Failed to load {}: {e}", entry.url);
                return;
            }
        };

        self.cache.invalidate_all();
        self.session.load(document);
        self.secondary.set_visible(false);
        self.phase = Phase::Showing;

        if let Err(e) = self.render_into(1, Slot::Primary) {
            error!("Failed to render page 1 of {}: {e}", entry.url);
        }
        self.update_controls();
        self.stage_scroll = 0;
    }

    /// Start flipping to the next page. Returns false if nothing happened.
    pub fn next(&mut self, now: Instant) -> bool {
        self.flip(Direction::Forward, now)
    }

    /// Start flipping to the previous page. Returns false if nothing happened.
    pub fn prev(&mut self, now: Instant) -> bool {
        self.flip(Direction::Back, now)
    }

    fn flip(&mut self, direction: Direction, now: Instant) -> bool {
        let Some(target) = self.session.flip_target(direction) else {
            return false;
        };
        self.session.set_animating(true);

        if let Err(e) = self.render_into(target, Slot::Secondary) {
            error!("Failed to render page {target}: {e}");
            self.secondary.clear();
            self.secondary.set_visible(false);
            self.session.set_animating(false);
            return false;
        }

        self.secondary.set_visible(true);
        self.phase = Phase::Transitioning {
            direction,
            target,
            done_at: now + self.config.transition,
        };
        debug!("Flipping {direction:?} to page {target}");
        true
    }

    /// Advance timers. Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Phase::Transitioning {
            target, done_at, ..
        } = self.phase
        {
            if now >= done_at {
                self.finish_transition(target);
                changed = true;
            }
        }

        // A resize waits for any running transition so the two renders
        // never target the same canvas at once.
        if let Some(due) = self.pending_resize {
            if now >= due && !self.session.is_animating() {
                self.pending_resize = None;
                let page = self.session.current_page();
                match self.render_into(page, Slot::Primary) {
                    Ok(()) => changed = true,
                    Err(e) => error!("Failed to re-render page {page} after resize: {e}"),
                }
            }
        }

        changed
    }

    fn finish_transition(&mut self, target: usize) {
        self.primary.copy_from(&self.secondary);
        self.wrap_height = Some(self.secondary.display_size().1);

        self.secondary.clear();
        self.secondary.set_visible(false);

        self.session.set_current_page(target);
        self.update_controls();
        self.session.set_animating(false);
        self.phase = Phase::Showing;
        self.stage_scroll = 0;
    }

    /// Hide the modal and reset the session.
    ///
    /// Returns the background scroll position saved by [`Viewer::open`].
    pub fn close(&mut self) -> Option<usize> {
        if !self.is_open() {
            return None;
        }

        for canvas in [&mut self.primary, &mut self.secondary] {
            canvas.clear();
            canvas.reset_display_size();
        }
        self.secondary.set_visible(false);
        self.wrap_height = None;

        self.session.reset();
        self.cache.invalidate_all();
        self.pending_resize = None;
        self.phase = Phase::Closed;
        self.title = None;
        self.download_url = None;
        self.stage_scroll = 0;
        self.update_controls();

        info!("Viewer closed");
        self.saved_scroll.take()
    }

    /// The stage changed size; re-render the current page once resizing
    /// settles. Width is in display pixels.
    pub fn resize(&mut self, container_width: f32, stage_height: u32, now: Instant) {
        let width_changed = (self.container_width - container_width).abs() > f32::EPSILON;
        self.container_width = container_width;
        self.stage_height = stage_height;
        self.clamp_stage_scroll();

        if width_changed && self.session.has_document() {
            self.pending_resize = Some(now + self.config.resize_debounce);
        }
    }

    /// Set the stage size without scheduling a re-render, e.g. before the
    /// first open
    pub fn set_stage_size(&mut self, container_width: f32, stage_height: u32) {
        self.container_width = container_width;
        self.stage_height = stage_height;
        self.clamp_stage_scroll();
    }

    /// Scroll the stage by `delta` display pixels, clamped to the page
    pub fn scroll_by(&mut self, delta: i64) {
        let next = i64::from(self.stage_scroll).saturating_add(delta).max(0);
        self.stage_scroll = u32::try_from(next).unwrap_or(u32::MAX);
        self.clamp_stage_scroll();
    }

    fn clamp_stage_scroll(&mut self) {
        let max = self
            .wrap_height
            .unwrap_or(0)
            .saturating_sub(self.stage_height);
        self.stage_scroll = self.stage_scroll.min(max);
    }

    /// Earliest instant at which `tick` has work to do.
    ///
    /// A pending resize cannot run before a running transition ends, so the
    /// transition deadline comes first whenever one is set.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Transitioning { done_at, .. } => Some(done_at),
            _ => self.pending_resize,
        }
    }

    fn render_into(&mut self, page: usize, slot: Slot) -> RenderResult<()> {
        let document = self
            .session
            .document()
            .ok_or_else(|| RenderError::generic("no document loaded"))?;

        let base = document.page_size(page)?;
        let width = container_width_or(self.container_width, VIEWER_FALLBACK_WIDTH);
        let viewports = HiDpiViewports::fit(base, width, self.config.device_pixel_ratio)?;

        let key = CacheKey::new(page, &viewports.device);
        let bitmap = match self.cache.get(&key) {
            Some(bitmap) => bitmap,
            None => self.cache.insert(key, document.render(page, &viewports.device)?),
        };

        let canvas = match slot {
            Slot::Primary => &mut self.primary,
            Slot::Secondary => &mut self.secondary,
        };
        let (pixel_w, pixel_h) = viewports.device.rounded();
        let (display_w, display_h) = viewports.display.rounded();
        canvas.set_size(pixel_w, pixel_h);
        canvas.set_display_size(display_w, display_h);
        canvas.draw_bitmap(&bitmap);

        self.wrap_height = Some(display_h);
        self.clamp_stage_scroll();
        debug!("Rendered page {page} at {pixel_w}x{pixel_h} (display {display_w}x{display_h})");
        Ok(())
    }

    fn update_controls(&mut self) {
        let current = self.session.current_page();
        let total = self.session.total_pages();
        self.controls = Controls {
            current_page: current,
            total_pages: total,
            prev_enabled: current > 1,
            next_enabled: current < total,
        };
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.session.is_animating()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.session.current_page()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.session.total_pages()
    }

    #[must_use]
    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Transition currently applied to the page wrapper
    #[must_use]
    pub fn transition(&self) -> Option<Direction> {
        match self.phase {
            Phase::Transitioning { direction, .. } => Some(direction),
            _ => None,
        }
    }

    /// Running transition and how far along it is at `now`, from 0.0 to 1.0
    #[must_use]
    pub fn transition_progress(&self, now: Instant) -> Option<(Direction, f32)> {
        let Phase::Transitioning {
            direction, done_at, ..
        } = self.phase
        else {
            return None;
        };
        let total = self.config.transition.as_secs_f32();
        if total <= 0.0 {
            return Some((direction, 1.0));
        }
        let remaining = done_at.saturating_duration_since(now).as_secs_f32();
        Some((direction, (1.0 - remaining / total).clamp(0.0, 1.0)))
    }

    #[must_use]
    pub fn primary(&self) -> &Canvas {
        &self.primary
    }

    #[must_use]
    pub fn secondary(&self) -> &Canvas {
        &self.secondary
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Target of the download link
    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    #[must_use]
    pub fn stage_scroll(&self) -> u32 {
        self.stage_scroll
    }

    /// Height of the page wrapper in display pixels
    #[must_use]
    pub fn wrap_height(&self) -> Option<u32> {
        self.wrap_height
    }

    #[must_use]
    pub fn has_pending_resize(&self) -> bool {
        self.pending_resize.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PageSize;
    use crate::test_utils::fake_pdf::{FakeDocumentSpec, FakeLoader, page_color};

    fn loader() -> FakeLoader {
        FakeLoader::new()
            .with_document("three.pdf", FakeDocumentSpec::uniform(3, 600.0, 800.0))
            .with_document(
                "mixed.pdf",
                FakeDocumentSpec::with_pages(vec![
                    PageSize::new(600.0, 800.0),
                    PageSize::new(800.0, 600.0),
                ]),
            )
            .with_document(
                "bad-page.pdf",
                FakeDocumentSpec::uniform(3, 600.0, 800.0).failing_page(2),
            )
    }

    fn viewer_with(loader: &FakeLoader, config: ViewerConfig) -> Viewer {
        let mut viewer = Viewer::new(Arc::new(loader.clone()), config);
        viewer.set_stage_size(300.0, 200);
        viewer
    }

    fn viewer(loader: &FakeLoader) -> Viewer {
        viewer_with(loader, ViewerConfig::default())
    }

    fn entry(url: &str) -> CatalogEntry {
        CatalogEntry::new(url, url)
    }

    fn flip_and_settle(viewer: &mut Viewer, direction: Direction, now: Instant) -> Instant {
        match direction {
            Direction::Forward => viewer.next(now),
            Direction::Back => viewer.prev(now),
        };
        let later = now + DEFAULT_TRANSITION;
        viewer.tick(later);
        later
    }

    #[test]
    fn open_loads_first_page() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        viewer.open(&entry("three.pdf"), 4);

        assert_eq!(viewer.phase(), Phase::Showing);
        assert_eq!(viewer.current_page(), 1);
        assert_eq!(viewer.total_pages(), 3);
        assert_eq!(viewer.download_url(), Some("three.pdf"));
        assert_eq!(viewer.primary().size(), (300, 400));
        assert_eq!(
            viewer.primary().bitmap().and_then(|b| b.pixel(0, 0)),
            Some(page_color(1))
        );
        assert!(!viewer.secondary().is_visible());

        let controls = viewer.controls();
        assert!(!controls.prev_enabled);
        assert!(controls.next_enabled);
        assert_eq!(controls.indicator(), "1 / 3");
    }

    #[test]
    fn hidpi_renders_at_device_scale_and_shows_at_display_size() {
        let loader = loader();
        let config = ViewerConfig {
            device_pixel_ratio: 2.0,
            ..ViewerConfig::default()
        };
        let mut viewer = viewer_with(&loader, config);
        viewer.open(&entry("three.pdf"), 0);

        assert_eq!(viewer.primary().size(), (600, 800));
        assert_eq!(viewer.primary().display_size(), (300, 400));
        assert_eq!(viewer.wrap_height(), Some(400));
    }

    #[test]
    fn dpr_above_three_is_capped() {
        let loader = loader();
        let config = ViewerConfig {
            device_pixel_ratio: 5.0,
            ..ViewerConfig::default()
        };
        let mut viewer = viewer_with(&loader, config);
        viewer.open(&entry("three.pdf"), 0);

        assert_eq!(viewer.primary().size(), (900, 1200));
    }

    #[test]
    fn unknown_stage_width_uses_fallback() {
        let loader = loader();
        let mut viewer = Viewer::new(Arc::new(loader.clone()), ViewerConfig::default());
        viewer.open(&entry("three.pdf"), 0);

        assert_eq!(viewer.primary().display_size().0, VIEWER_FALLBACK_WIDTH as u32);
    }

    #[test]
    fn next_swaps_only_after_transition() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let t0 = Instant::now();
        viewer.open(&entry("three.pdf"), 0);

        assert!(viewer.next(t0));
        assert!(viewer.is_animating());
        assert_eq!(viewer.transition(), Some(Direction::Forward));
        assert!(viewer.secondary().is_visible());
        assert_eq!(viewer.current_page(), 1);

        assert!(!viewer.tick(t0 + Duration::from_millis(429)));
        assert_eq!(viewer.current_page(), 1);

        assert!(viewer.tick(t0 + DEFAULT_TRANSITION));
        assert_eq!(viewer.current_page(), 2);
        assert!(!viewer.is_animating());
        assert!(viewer.transition().is_none());
        assert!(!viewer.secondary().is_visible());
        assert!(!viewer.secondary().has_content());
        assert_eq!(
            viewer.primary().bitmap().and_then(|b| b.pixel(0, 0)),
            Some(page_color(2))
        );
        assert_eq!(viewer.controls().indicator(), "2 / 3");
    }

    #[test]
    fn swap_copies_bitmap_without_rerendering() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let t0 = Instant::now();
        viewer.open(&entry("three.pdf"), 0);
        flip_and_settle(&mut viewer, Direction::Forward, t0);

        let pages: Vec<usize> = loader.renders().iter().map(|r| r.page).collect();
        assert_eq!(pages, vec![1, 2]);
    }

    #[test]
    fn navigation_is_ignored_while_transitioning() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let t0 = Instant::now();
        viewer.open(&entry("three.pdf"), 0);

        assert!(viewer.next(t0));
        assert!(!viewer.next(t0 + Duration::from_millis(10)));
        assert!(!viewer.prev(t0 + Duration::from_millis(20)));

        viewer.tick(t0 + DEFAULT_TRANSITION);
        assert_eq!(viewer.current_page(), 2);
    }

    #[test]
    fn three_page_scenario() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let mut now = Instant::now();
        viewer.open(&entry("three.pdf"), 0);
        assert_eq!(viewer.current_page(), 1);

        now = flip_and_settle(&mut viewer, Direction::Forward, now);
        assert_eq!(viewer.current_page(), 2);

        now = flip_and_settle(&mut viewer, Direction::Forward, now);
        assert_eq!(viewer.current_page(), 3);
        assert!(!viewer.controls().next_enabled);

        assert!(!viewer.next(now));
        assert_eq!(viewer.current_page(), 3);

        flip_and_settle(&mut viewer, Direction::Back, now);
        assert_eq!(viewer.current_page(), 2);
        assert_eq!(viewer.transition(), None);
    }

    #[test]
    fn prev_on_first_page_is_noop() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        viewer.open(&entry("three.pdf"), 0);

        assert!(!viewer.prev(Instant::now()));
        assert_eq!(viewer.current_page(), 1);
        assert!(!viewer.is_animating());
    }

    #[test]
    fn back_transition_is_directional() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let now = Instant::now();
        viewer.open(&entry("three.pdf"), 0);
        let now = flip_and_settle(&mut viewer, Direction::Forward, now);

        viewer.prev(now);
        assert_eq!(viewer.transition(), Some(Direction::Back));
    }

    #[test]
    fn swap_takes_new_page_geometry() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let now = Instant::now();
        viewer.open(&entry("mixed.pdf"), 0);
        assert_eq!(viewer.primary().display_size(), (300, 400));

        flip_and_settle(&mut viewer, Direction::Forward, now);
        assert_eq!(viewer.primary().display_size(), (300, 225));
        assert_eq!(viewer.wrap_height(), Some(225));
    }

    #[test]
    fn close_resets_session_and_returns_scroll() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let now = Instant::now();
        viewer.open(&entry("three.pdf"), 7);
        flip_and_settle(&mut viewer, Direction::Forward, now);

        assert_eq!(viewer.close(), Some(7));
        assert!(!viewer.is_open());
        assert_eq!(viewer.current_page(), 1);
        assert_eq!(viewer.total_pages(), 1);
        assert!(!viewer.primary().has_content());
        assert!(!viewer.secondary().has_content());
        assert!(viewer.download_url().is_none());
        assert_eq!(viewer.controls().indicator(), "1 / 1");

        assert_eq!(viewer.close(), None);
    }

    #[test]
    fn close_mid_transition_abandons_it() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let now = Instant::now();
        viewer.open(&entry("three.pdf"), 0);
        viewer.next(now);

        viewer.close();
        assert!(!viewer.tick(now + DEFAULT_TRANSITION));
        assert_eq!(viewer.current_page(), 1);
        assert!(!viewer.is_animating());
    }

    #[test]
    fn failed_load_stays_loading_and_inert() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        viewer.open(&entry("missing.pdf"), 3);

        assert!(viewer.is_open());
        assert!(viewer.is_loading());
        assert!(!viewer.next(Instant::now()));
        assert_eq!(viewer.current_page(), 1);
        assert_eq!(viewer.close(), Some(3));
    }

    #[test]
    fn failed_page_render_abandons_flip() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        viewer.open(&entry("bad-page.pdf"), 0);

        assert!(!viewer.next(Instant::now()));
        assert_eq!(viewer.current_page(), 1);
        assert!(!viewer.is_animating());
        assert!(!viewer.secondary().is_visible());
    }

    #[test]
    fn resize_rerenders_after_debounce() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let t0 = Instant::now();
        viewer.open(&entry("three.pdf"), 0);

        viewer.resize(400.0, 200, t0);
        viewer.resize(500.0, 200, t0 + Duration::from_millis(50));
        assert!(!viewer.tick(t0 + Duration::from_millis(120)));
        assert_eq!(viewer.primary().display_size(), (300, 400));

        assert!(viewer.tick(t0 + Duration::from_millis(170)));
        assert_eq!(viewer.primary().display_size(), (500, 667));
        assert!(!viewer.has_pending_resize());
    }

    #[test]
    fn resize_waits_for_transition() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let t0 = Instant::now();
        viewer.open(&entry("three.pdf"), 0);

        viewer.next(t0);
        viewer.resize(600.0, 200, t0);
        viewer.tick(t0 + DEFAULT_RESIZE_DEBOUNCE);
        assert!(viewer.has_pending_resize());

        viewer.tick(t0 + DEFAULT_TRANSITION);
        assert_eq!(viewer.current_page(), 2);
        assert!(!viewer.has_pending_resize());
        assert_eq!(viewer.primary().display_size(), (600, 800));
        assert_eq!(
            viewer.primary().bitmap().and_then(|b| b.pixel(0, 0)),
            Some(page_color(2))
        );
    }

    #[test]
    fn resize_without_document_schedules_nothing() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        viewer.resize(640.0, 200, Instant::now());
        assert!(!viewer.has_pending_resize());
    }

    #[test]
    fn revisiting_a_page_uses_the_cache() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let now = Instant::now();
        viewer.open(&entry("three.pdf"), 0);
        let now = flip_and_settle(&mut viewer, Direction::Forward, now);
        flip_and_settle(&mut viewer, Direction::Back, now);

        assert_eq!(viewer.current_page(), 1);
        assert_eq!(loader.renders().len(), 2);
    }

    #[test]
    fn stage_scroll_is_clamped_and_reset_by_flip() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let now = Instant::now();
        viewer.open(&entry("three.pdf"), 0);

        viewer.scroll_by(1_000);
        assert_eq!(viewer.stage_scroll(), 200);
        viewer.scroll_by(-50);
        assert_eq!(viewer.stage_scroll(), 150);
        viewer.scroll_by(-1_000);
        assert_eq!(viewer.stage_scroll(), 0);

        viewer.scroll_by(100);
        flip_and_settle(&mut viewer, Direction::Forward, now);
        assert_eq!(viewer.stage_scroll(), 0);
    }

    #[test]
    fn next_deadline_tracks_transition() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let t0 = Instant::now();
        viewer.open(&entry("three.pdf"), 0);
        assert!(viewer.next_deadline().is_none());

        viewer.next(t0);
        assert_eq!(viewer.next_deadline(), Some(t0 + DEFAULT_TRANSITION));
    }

    #[test]
    fn next_deadline_is_earliest_pending_work() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let t0 = Instant::now();
        viewer.open(&entry("three.pdf"), 0);

        viewer.next(t0);
        viewer.resize(500.0, 200, t0 + Duration::from_millis(400));
        let deadline = viewer.next_deadline().unwrap();
        assert_eq!(deadline, t0 + DEFAULT_TRANSITION);

        // The transition finishes at that deadline; the resize is still queued
        assert!(viewer.tick(deadline));
        assert_eq!(viewer.current_page(), 2);
        assert_eq!(
            viewer.next_deadline(),
            Some(t0 + Duration::from_millis(400) + DEFAULT_RESIZE_DEBOUNCE)
        );
    }

    #[test]
    fn transition_progress_runs_from_zero_to_one() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        let t0 = Instant::now();
        viewer.open(&entry("three.pdf"), 0);
        assert!(viewer.transition_progress(t0).is_none());

        viewer.next(t0);
        let (direction, start) = viewer.transition_progress(t0).unwrap();
        assert_eq!(direction, Direction::Forward);
        assert!(start.abs() < 1e-3);

        let (_, end) = viewer
            .transition_progress(t0 + Duration::from_secs(1))
            .unwrap();
        assert!((end - 1.0).abs() < 1e-6);
    }

    #[test]
    fn reopening_switches_documents() {
        let loader = loader();
        let mut viewer = viewer(&loader);
        viewer.open(&entry("three.pdf"), 1);
        viewer.open(&entry("mixed.pdf"), 2);

        assert_eq!(viewer.total_pages(), 2);
        assert_eq!(viewer.current_page(), 1);
        assert_eq!(viewer.close(), Some(2));
    }
}
