#![forbid(unsafe_code)]

//! Pointer interaction over a placed layout.
//!
//! [`CloudView`] owns the current placements and tracks which word is under
//! the pointer and which words have been selected by click. It never draws:
//! hosts feed it pointer positions in canvas coordinates and read back the
//! hover target, the tooltip text and value [`Badge`]s for selected words.
//!
//! Hit testing uses each word's unpadded rotated rectangle. When rectangles
//! share a point the word placed last wins, matching paint order.

use std::fmt;

use rustc_hash::FxHashSet;
use tracing::trace;
use wcloud_core::geometry::{Footprint, Point};
use wcloud_layout::PlacedWord;

/// Handler invoked with the word an event targets.
pub type WordCallback = Box<dyn FnMut(&PlacedWord)>;

/// Formats the tooltip for the hovered word.
pub type TooltipFormatter = Box<dyn Fn(&PlacedWord) -> String>;

/// `"{text} ({value})"`.
pub fn default_tooltip(word: &PlacedWord) -> String {
    format!("{} ({})", word.text, word.value)
}

/// Optional event handlers. Absent handlers are simply skipped.
pub struct Callbacks {
    pub on_word_click: Option<WordCallback>,
    pub on_word_mouse_over: Option<WordCallback>,
    pub on_word_mouse_out: Option<WordCallback>,
    pub word_tooltip: TooltipFormatter,
}

impl Default for Callbacks {
    fn default() -> Self {
        Self {
            on_word_click: None,
            on_word_mouse_over: None,
            on_word_mouse_out: None,
            word_tooltip: Box::new(default_tooltip),
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_word_click", &self.on_word_click.is_some())
            .field("on_word_mouse_over", &self.on_word_mouse_over.is_some())
            .field("on_word_mouse_out", &self.on_word_mouse_out.is_some())
            .finish_non_exhaustive()
    }
}

impl Callbacks {
    #[must_use]
    pub fn on_click(mut self, f: impl FnMut(&PlacedWord) + 'static) -> Self {
        self.on_word_click = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_mouse_over(mut self, f: impl FnMut(&PlacedWord) + 'static) -> Self {
        self.on_word_mouse_over = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_mouse_out(mut self, f: impl FnMut(&PlacedWord) + 'static) -> Self {
        self.on_word_mouse_out = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn tooltip(mut self, f: impl Fn(&PlacedWord) -> String + 'static) -> Self {
        self.word_tooltip = Box::new(f);
        self
    }
}

/// Value label pinned to the top-right corner of a selected word.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub text: String,
    pub label: String,
    pub anchor: Point,
}

/// Hover and selection state for one rendered cloud.
#[derive(Debug)]
pub struct CloudView {
    words: Vec<PlacedWord>,
    hovered: Option<usize>,
    selected: FxHashSet<String>,
    callbacks: Callbacks,
    tooltips: bool,
}

impl Default for CloudView {
    fn default() -> Self {
        Self::new(Callbacks::default())
    }
}

impl CloudView {
    pub fn new(callbacks: Callbacks) -> Self {
        Self {
            words: Vec::new(),
            hovered: None,
            selected: FxHashSet::default(),
            callbacks,
            tooltips: true,
        }
    }

    /// Enable or disable tooltip text.
    #[must_use]
    pub fn with_tooltips(mut self, enabled: bool) -> Self {
        self.tooltips = enabled;
        self
    }

    /// Replace the placements.
    ///
    /// Hover is cleared without firing `on_word_mouse_out`, since the hovered
    /// element no longer exists. Selection is keyed by text and survives.
    pub fn set_layout(&mut self, placed: Vec<PlacedWord>) {
        self.hovered = None;
        self.words = placed;
    }

    #[inline]
    pub fn words(&self) -> &[PlacedWord] {
        &self.words
    }

    /// Index of the topmost word under `point`.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.words.iter().rposition(|w| text_rect(w).contains_point(point))
    }

    pub fn hovered(&self) -> Option<&PlacedWord> {
        self.hovered.map(|i| &self.words[i])
    }

    /// Move the pointer, firing mouse-out and mouse-over on target change.
    pub fn pointer_moved(&mut self, point: Point) -> Option<&PlacedWord> {
        let hit = self.hit_test(point);
        if hit != self.hovered {
            self.fire_mouse_out();
            if let Some(i) = hit {
                trace!(word = %self.words[i].text, "hover");
                if let Some(cb) = self.callbacks.on_word_mouse_over.as_mut() {
                    cb(&self.words[i]);
                }
            }
            self.hovered = hit;
        }
        self.hovered()
    }

    /// The pointer left the canvas.
    pub fn pointer_left(&mut self) {
        self.fire_mouse_out();
        self.hovered = None;
    }

    fn fire_mouse_out(&mut self) {
        if let Some(prev) = self.hovered
            && let Some(cb) = self.callbacks.on_word_mouse_out.as_mut()
        {
            cb(&self.words[prev]);
        }
    }

    /// Click at `point`: toggles selection of the word there and fires
    /// `on_word_click`. Clicking empty canvas does nothing.
    pub fn click(&mut self, point: Point) -> Option<&PlacedWord> {
        let i = self.hit_test(point)?;
        let text = &self.words[i].text;
        if !self.selected.remove(text) {
            self.selected.insert(text.clone());
        }
        trace!(word = %text, selected = self.selected.contains(text), "click");
        if let Some(cb) = self.callbacks.on_word_click.as_mut() {
            cb(&self.words[i]);
        }
        Some(&self.words[i])
    }

    #[inline]
    pub fn is_selected(&self, text: &str) -> bool {
        self.selected.contains(text)
    }

    pub fn select(&mut self, text: impl Into<String>) {
        self.selected.insert(text.into());
    }

    pub fn deselect(&mut self, text: &str) -> bool {
        self.selected.remove(text)
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selected words present in the current layout, in placement order.
    pub fn selected_words(&self) -> impl Iterator<Item = &PlacedWord> {
        self.words
            .iter()
            .filter(|w| self.selected.contains(w.text.as_str()))
    }

    /// Tooltip for the hovered word, if tooltips are enabled.
    pub fn tooltip(&self) -> Option<String> {
        if !self.tooltips {
            return None;
        }
        self.hovered().map(|w| (self.callbacks.word_tooltip)(w))
    }

    /// One badge per selected word still in the layout.
    pub fn badges(&self) -> Vec<Badge> {
        self.selected_words()
            .map(|w| {
                let aabb = text_rect(w).aabb();
                Badge {
                    text: w.text.clone(),
                    label: w.value.to_string(),
                    anchor: Point::new(aabb.max_x, aabb.min_y),
                }
            })
            .collect()
    }
}

fn text_rect(word: &PlacedWord) -> Footprint {
    Footprint::new(
        Point::new(word.x, word.y),
        word.width,
        word.height,
        word.rotation,
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn placed(text: &str, value: f64, x: f64, y: f64, width: f64, height: f64) -> PlacedWord {
        PlacedWord {
            text: text.to_string(),
            value,
            font_size: height,
            rotation: 0.0,
            x,
            y,
            width,
            height,
            footprint: Footprint::new(Point::new(x, y), width, height, 0.0, 1.0),
        }
    }

    fn two_words() -> Vec<PlacedWord> {
        vec![
            placed("alpha", 10.0, 50.0, 50.0, 40.0, 10.0),
            placed("beta", 2.5, 150.0, 50.0, 30.0, 10.0),
        ]
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn recording(log: &Log, tag: &'static str) -> impl FnMut(&PlacedWord) + 'static {
        let log = Rc::clone(log);
        move |w| log.borrow_mut().push(format!("{tag}:{}", w.text))
    }

    #[test]
    fn hover_fires_over_and_out() {
        let log: Log = Rc::default();
        let callbacks = Callbacks::default()
            .on_mouse_over(recording(&log, "over"))
            .on_mouse_out(recording(&log, "out"));
        let mut view = CloudView::new(callbacks);
        view.set_layout(two_words());

        assert_eq!(
            view.pointer_moved(Point::new(50.0, 50.0)).map(|w| w.text.as_str()),
            Some("alpha")
        );
        // Moving within the same word fires nothing new.
        view.pointer_moved(Point::new(55.0, 52.0));
        view.pointer_moved(Point::new(150.0, 50.0));
        view.pointer_moved(Point::new(0.0, 0.0));
        assert!(view.hovered().is_none());

        assert_eq!(
            *log.borrow(),
            ["over:alpha", "out:alpha", "over:beta", "out:beta"]
        );
    }

    #[test]
    fn pointer_left_clears_hover() {
        let log: Log = Rc::default();
        let mut view = CloudView::new(Callbacks::default().on_mouse_out(recording(&log, "out")));
        view.set_layout(two_words());
        view.pointer_moved(Point::new(150.0, 50.0));
        view.pointer_left();
        assert!(view.hovered().is_none());
        assert_eq!(*log.borrow(), ["out:beta"]);
    }

    #[test]
    fn click_toggles_selection() {
        let log: Log = Rc::default();
        let mut view = CloudView::new(Callbacks::default().on_click(recording(&log, "click")));
        view.set_layout(two_words());

        view.click(Point::new(50.0, 50.0));
        assert!(view.is_selected("alpha"));
        view.click(Point::new(50.0, 50.0));
        assert!(!view.is_selected("alpha"));

        assert!(view.click(Point::new(100.0, 90.0)).is_none());
        assert_eq!(*log.borrow(), ["click:alpha", "click:alpha"]);
    }

    #[test]
    fn tooltip_uses_formatter() {
        let mut view = CloudView::default();
        view.set_layout(two_words());
        assert_eq!(view.tooltip(), None);

        view.pointer_moved(Point::new(150.0, 50.0));
        assert_eq!(view.tooltip().as_deref(), Some("beta (2.5)"));

        let mut custom = CloudView::new(Callbacks::default().tooltip(|w| w.text.to_uppercase()));
        custom.set_layout(two_words());
        custom.pointer_moved(Point::new(50.0, 50.0));
        assert_eq!(custom.tooltip().as_deref(), Some("ALPHA"));

        let mut silent = CloudView::default().with_tooltips(false);
        silent.set_layout(two_words());
        silent.pointer_moved(Point::new(50.0, 50.0));
        assert_eq!(silent.tooltip(), None);
    }

    #[test]
    fn badges_sit_top_right_of_selected_words() {
        let mut view = CloudView::default();
        view.set_layout(two_words());
        view.click(Point::new(50.0, 50.0));

        assert_eq!(
            view.badges(),
            vec![Badge {
                text: "alpha".into(),
                label: "10".into(),
                anchor: Point::new(70.0, 45.0),
            }]
        );
    }

    #[test]
    fn selection_survives_relayout_but_hover_does_not() {
        let mut view = CloudView::default();
        view.set_layout(two_words());
        view.click(Point::new(150.0, 50.0));
        view.pointer_moved(Point::new(150.0, 50.0));

        view.set_layout(vec![placed("beta", 2.5, 20.0, 20.0, 30.0, 10.0)]);
        assert!(view.hovered().is_none());
        assert!(view.is_selected("beta"));
        assert_eq!(view.badges().len(), 1);

        view.set_layout(vec![placed("gamma", 1.0, 20.0, 20.0, 30.0, 10.0)]);
        assert!(view.is_selected("beta"));
        assert!(view.badges().is_empty());
    }

    #[test]
    fn later_word_wins_hit_test() {
        let mut view = CloudView::default();
        view.set_layout(vec![
            placed("under", 1.0, 50.0, 50.0, 40.0, 10.0),
            placed("over", 1.0, 60.0, 50.0, 40.0, 10.0),
        ]);
        assert_eq!(view.hit_test(Point::new(55.0, 50.0)), Some(1));
        assert_eq!(view.hit_test(Point::new(32.0, 50.0)), Some(0));
    }

    #[test]
    fn rotated_words_hit_along_their_axis() {
        let mut word = placed("tall", 1.0, 50.0, 50.0, 40.0, 10.0);
        word.rotation = 90.0;
        let mut view = CloudView::default();
        view.set_layout(vec![word]);
        assert_eq!(view.hit_test(Point::new(50.0, 65.0)), Some(0));
        assert_eq!(view.hit_test(Point::new(65.0, 50.0)), None);
    }
}
