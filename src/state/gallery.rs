//! Carousel state for one category gallery.
//!
//! Holds the ordered image references, the current page and the in-flight
//! drag gesture. All mutation happens on the UI thread in response to input
//! events; nothing here performs I/O.

use crate::config::{DEFAULT_CONTAINER_WIDTH_PX, SWIPE_THRESHOLD_PX};
use log::debug;

/// Direction for paging through images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Gesture phase.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DragPhase {
    Idle,
    Dragging { start_x: f32 },
}

/// Discrete input delivered by the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GalleryEvent {
    /// Pointer or touch pressed at `x`.
    DragStart(f32),
    /// Pointer or touch moved to `x`.
    DragMove(f32),
    /// Pointer or touch released.
    DragEnd,
    /// Pointer left the gallery area; resolves like a release.
    PointerLeave,
    /// Previous/next control pressed.
    NavButton(Direction),
    /// Indicator dot pressed.
    Dot(usize),
    /// Image at the given index tapped.
    ImageTap(usize),
}

/// What a released gesture did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The gesture crossed the threshold and paged in this direction.
    Navigated(Direction),
    /// The gesture was too short and was dropped.
    Discarded,
    /// No gesture was in progress.
    Ignored,
}

/// Presentation values derived from the current state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryView {
    pub current_index: usize,
    pub image_count: usize,
    /// Horizontal translation of the image strip, in percent of the container width.
    pub translate_percent: f32,
    /// Whether the strip should animate to its position (false while tracking a drag).
    pub animate: bool,
    /// Empty list: show the placeholder instead of strip, controls and dots.
    pub show_placeholder: bool,
    /// Previous/next controls and indicator dots are visible.
    pub show_navigation: bool,
}

/// Manages the image list, current page and drag gesture of one gallery.
#[derive(Debug, Clone)]
pub struct GalleryState {
    images: Vec<String>,
    current_index: usize,
    drag_offset: f32,
    phase: DragPhase,
    container_width: f32,
    /// Set when a released swipe paged; a tap reported after that release is dropped.
    swallow_tap: bool,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl GalleryState {
    /// Creates a gallery positioned on the first image.
    pub fn new(images: Vec<String>) -> Self {
        Self {
            images,
            current_index: 0,
            drag_offset: 0.0,
            phase: DragPhase::Idle,
            container_width: DEFAULT_CONTAINER_WIDTH_PX,
            swallow_tap: false,
        }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn drag_offset(&self) -> f32 {
        self.drag_offset
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// A drag is in progress and already past the swipe threshold.
    fn is_swiping(&self) -> bool {
        self.is_dragging() && self.drag_offset().abs() > SWIPE_THRESHOLD_PX
    }

    /// Replaces the image list, keeping the current position where possible.
    ///
    /// The index is clamped in the same call so no out-of-range index is ever
    /// observable. An empty list resets to index 0 and drops any drag.
    pub fn set_images(&mut self, images: Vec<String>) {
        self.images = images;

        if self.images.is_empty() {
            self.current_index = 0;
            self.phase = DragPhase::Idle;
            self.drag_offset = 0.0;
        } else if self.current_index >= self.images.len() {
            debug!(
                "Clamping gallery index {} to {}",
                self.current_index,
                self.images.len() - 1
            );
            self.current_index = self.images.len() - 1;
        }
    }

    /// Records the rendered width of the gallery; non-positive widths fall back
    /// to the default.
    pub fn set_container_width(&mut self, width: f32) {
        self.container_width = if width > 0.0 {
            width
        } else {
            DEFAULT_CONTAINER_WIDTH_PX
        };
    }

    /// Pages one image in `direction`, wrapping at both ends.
    pub fn navigate(&mut self, direction: Direction) {
        let len = self.images.len();
        if len <= 1 {
            return;
        }

        self.current_index = match direction {
            Direction::Next => {
                if self.current_index + 1 < len {
                    self.current_index + 1
                } else {
                    0
                }
            }
            Direction::Previous => {
                if self.current_index > 0 {
                    self.current_index - 1
                } else {
                    len - 1
                }
            }
        };
        debug!("Gallery navigated {:?} to {}", direction, self.current_index);
    }

    /// Moves directly to `index`.
    pub fn jump_to(&mut self, index: usize) {
        debug_assert!(
            index < self.images.len(),
            "jump_to({index}) out of range for {} images",
            self.images.len()
        );
        self.current_index = self.clamp_index(index);
    }

    /// Starts tracking a drag at `x`.
    pub fn drag_start(&mut self, x: f32) {
        if self.is_empty() {
            return;
        }
        self.phase = DragPhase::Dragging { start_x: x };
        self.drag_offset = 0.0;
        self.swallow_tap = false;
    }

    /// Updates the drag offset; the page does not change until release.
    pub fn drag_move(&mut self, x: f32) {
        if let DragPhase::Dragging { start_x } = self.phase {
            self.drag_offset = x - start_x;
        }
    }

    /// Resolves the gesture: pages when the offset exceeds the swipe threshold.
    pub fn drag_end(&mut self) -> GestureOutcome {
        if !self.is_dragging() {
            return GestureOutcome::Ignored;
        }

        let offset = self.drag_offset;
        self.phase = DragPhase::Idle;
        self.drag_offset = 0.0;

        if offset.abs() > SWIPE_THRESHOLD_PX && self.len() > 1 {
            let direction = if offset > 0.0 {
                Direction::Previous
            } else {
                Direction::Next
            };
            self.navigate(direction);
            self.swallow_tap = true;
            GestureOutcome::Navigated(direction)
        } else {
            GestureOutcome::Discarded
        }
    }

    /// Routes a UI event. Returns the index to activate for image taps;
    /// navigation controls and dots never activate an image.
    ///
    /// A tap is dropped while a drag is past the threshold (the toolkit reports
    /// the click before the release) and once right after a paging release.
    pub fn handle(&mut self, event: GalleryEvent) -> Option<usize> {
        match event {
            GalleryEvent::DragStart(x) => self.drag_start(x),
            GalleryEvent::DragMove(x) => self.drag_move(x),
            GalleryEvent::DragEnd | GalleryEvent::PointerLeave => {
                self.drag_end();
            }
            GalleryEvent::NavButton(direction) => self.navigate(direction),
            GalleryEvent::Dot(index) => self.jump_to(index),
            GalleryEvent::ImageTap(_) if self.swallow_tap || self.is_swiping() => {
                self.swallow_tap = false;
            }
            GalleryEvent::ImageTap(index) => {
                debug_assert!(index < self.images.len(), "tap on missing image {index}");
                if !self.images.is_empty() {
                    return Some(self.clamp_index(index));
                }
            }
        }
        None
    }

    /// Computes the presentation of the current state.
    pub fn view(&self) -> GalleryView {
        let drag_percent = self.drag_offset / self.container_width * 100.0;
        GalleryView {
            current_index: self.current_index,
            image_count: self.images.len(),
            translate_percent: -(self.current_index as f32) * 100.0 + drag_percent,
            animate: !self.is_dragging(),
            show_placeholder: self.images.is_empty(),
            show_navigation: self.images.len() > 1,
        }
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.images.len().saturating_sub(1))
    }
}

/// A titled gallery with an optional activation callback.
pub struct Gallery {
    title: String,
    state: GalleryState,
    on_select: Option<Box<dyn FnMut(usize) + Send>>,
}

impl Gallery {
    pub fn new(
        title: impl Into<String>,
        images: Vec<String>,
        on_select: Option<Box<dyn FnMut(usize) + Send>>,
    ) -> Self {
        Self {
            title: title.into(),
            state: GalleryState::new(images),
            on_select,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GalleryState {
        &mut self.state
    }

    /// Notifies the callback that `index` was activated. The page is unchanged.
    pub fn activate(&mut self, index: usize) {
        if let Some(on_select) = self.on_select.as_mut() {
            on_select(index);
        }
    }

    /// Routes a UI event and fires the callback for image taps.
    pub fn handle(&mut self, event: GalleryEvent) {
        if let Some(index) = self.state.handle(event) {
            self.activate(index);
        }
    }
}

impl std::fmt::Debug for Gallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gallery")
            .field("title", &self.title)
            .field("state", &self.state)
            .field("on_select", &self.on_select.is_some())
            .finish()
    }
}
