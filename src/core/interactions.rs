//! Page event wiring: mobile menu, navigation shadow and section reveal.
//!
//! Each piece is wired once against the rendered document (after checking
//! that the elements it needs exist) and then reacts to [`PageEvent`]s.

use crate::core::document::{Document, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MENU_BUTTON_ID: &str = "mobile-menu-btn";
pub const MENU_ID: &str = "mobile-menu";
pub const HIDDEN_CLASS: &str = "hidden";
pub const SHADOW_CLASS: &str = "shadow-md";
pub const REVEAL_CLASS: &str = "animate-fade-in-up";

pub struct MobileMenu {
    panel: Selector,
    links: usize,
}

impl MobileMenu {
    /// `None` unless both the trigger and the panel are on the page.
    pub fn wire(document: &Document) -> Option<Self> {
        let trigger = Selector::id(MENU_BUTTON_ID);
        let panel = Selector::id(MENU_ID);
        if !document.contains(&trigger) || !document.contains(&panel) {
            return None;
        }
        let links = document.count_descendants(&panel, "a");
        Some(Self { panel, links })
    }

    pub fn link_count(&self) -> usize {
        self.links
    }

    pub fn is_open(&self, document: &Document) -> bool {
        !document.has_class(&self.panel, HIDDEN_CLASS)
    }

    pub fn on_trigger_click(&self, document: &mut Document) {
        document.toggle_class(&self.panel, HIDDEN_CLASS);
    }

    /// Links wired at load time close the menu; other indices are ignored.
    pub fn on_link_click(&self, document: &mut Document, index: usize) {
        if index < self.links {
            document.add_class(&self.panel, HIDDEN_CLASS);
        }
    }
}

pub struct NavShadow {
    nav: Selector,
    threshold: f64,
}

impl NavShadow {
    pub fn wire(document: &Document, threshold: f64) -> Option<Self> {
        let nav = Selector::tag("nav");
        document.contains(&nav).then_some(Self { nav, threshold })
    }

    pub fn on_scroll(&self, document: &mut Document, scroll_y: f64) {
        if scroll_y > self.threshold {
            document.add_class(&self.nav, SHADOW_CLASS);
        } else {
            document.remove_class(&self.nav, SHADOW_CLASS);
        }
    }
}

/// Intersection settings for the section reveal.
///
/// An element counts as intersecting only when its visible ratio is above
/// zero and at least `threshold`. A browser observer also reports
/// `isIntersecting` for any non-zero overlap, including on the initial
/// callback after `observe()`; here those sub-threshold overlaps do not
/// reveal. Nothing fires on `observe()` itself: reveals happen only through
/// intersection or viewport events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealOptions {
    pub threshold: f64,
    /// Bottom root margin in px; negative values shrink the viewport.
    pub root_margin_bottom: f64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin_bottom: -100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBounds {
    pub target: Selector,
    /// Offset from the top of the page.
    pub top: f64,
    pub height: f64,
}

impl RevealOptions {
    /// Visible fraction of the element inside the margin-adjusted viewport.
    pub fn intersection_ratio(&self, viewport: Viewport, top: f64, height: f64) -> f64 {
        let root_top = viewport.scroll_y;
        let root_bottom = viewport.scroll_y + viewport.height + self.root_margin_bottom;
        if root_bottom <= root_top {
            return 0.0;
        }
        if height <= 0.0 {
            return if top >= root_top && top <= root_bottom { 1.0 } else { 0.0 };
        }

        let visible = (top + height).min(root_bottom) - top.max(root_top);
        (visible.max(0.0) / height).min(1.0)
    }

    pub fn is_intersecting(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// One-shot reveal: an element gets the reveal class the first time it
/// intersects and is then dropped from the watch set for good.
pub struct RevealObserver {
    options: RevealOptions,
    watched: Vec<Selector>,
    revealed: HashSet<Selector>,
}

impl RevealObserver {
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            watched: Vec::new(),
            revealed: HashSet::new(),
        }
    }

    pub fn observe(&mut self, target: Selector) {
        if !self.revealed.contains(&target) && !self.watched.contains(&target) {
            self.watched.push(target);
        }
    }

    /// Watches every `section > div` of the page. Returns the watch count.
    pub fn observe_sections(&mut self, document: &Document) -> usize {
        for target in document.section_children() {
            self.observe(target);
        }
        tracing::debug!("Watching {} section children for reveal", self.watched.len());
        self.watched.len()
    }

    pub fn is_watching(&self, target: &Selector) -> bool {
        self.watched.contains(target)
    }

    pub fn is_revealed(&self, target: &Selector) -> bool {
        self.revealed.contains(target)
    }

    pub fn watched(&self) -> &[Selector] {
        &self.watched
    }

    /// Returns `true` only on the call that reveals the element.
    pub fn on_intersection(&mut self, document: &mut Document, target: &Selector, ratio: f64) -> bool {
        if !self.is_watching(target) || !self.options.is_intersecting(ratio) {
            return false;
        }

        document.add_class(target, REVEAL_CLASS);
        self.watched.retain(|t| t != target);
        self.revealed.insert(target.clone());
        true
    }

    pub fn on_viewport(
        &mut self,
        document: &mut Document,
        viewport: Viewport,
        bounds: &[ElementBounds],
    ) -> Vec<Selector> {
        bounds
            .iter()
            .filter_map(|b| {
                let ratio = self.options.intersection_ratio(viewport, b.top, b.height);
                self.on_intersection(document, &b.target, ratio)
                    .then(|| b.target.clone())
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    MenuToggle,
    MenuLinkClick {
        #[serde(default)]
        index: usize,
    },
    Scroll {
        y: f64,
    },
    Intersect {
        target: Selector,
        ratio: f64,
    },
    Viewport {
        scroll_y: f64,
        height: f64,
        #[serde(default)]
        bounds: Vec<ElementBounds>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub nav_shadow_threshold: f64,
    pub reveal: RevealOptions,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            nav_shadow_threshold: 100.0,
            reveal: RevealOptions::default(),
        }
    }
}

/// Everything wired on page-ready and page-load.
pub struct Interactions {
    pub menu: Option<MobileMenu>,
    pub nav: Option<NavShadow>,
    pub reveal: RevealObserver,
}

impl Interactions {
    pub fn wire(document: &Document, config: &InteractionConfig) -> Self {
        let menu = MobileMenu::wire(document);
        let nav = NavShadow::wire(document, config.nav_shadow_threshold);
        let mut reveal = RevealObserver::new(config.reveal);
        reveal.observe_sections(document);

        tracing::debug!(
            "Wired interactions: menu={}, nav={}",
            menu.is_some(),
            nav.is_some()
        );
        Self { menu, nav, reveal }
    }

    pub fn dispatch(&mut self, document: &mut Document, event: &PageEvent) {
        match event {
            PageEvent::MenuToggle => {
                if let Some(menu) = &self.menu {
                    menu.on_trigger_click(document);
                }
            }
            PageEvent::MenuLinkClick { index } => {
                if let Some(menu) = &self.menu {
                    menu.on_link_click(document, *index);
                }
            }
            PageEvent::Scroll { y } => {
                if let Some(nav) = &self.nav {
                    nav.on_scroll(document, *y);
                }
            }
            PageEvent::Intersect { target, ratio } => {
                self.reveal.on_intersection(document, target, *ratio);
            }
            PageEvent::Viewport {
                scroll_y,
                height,
                bounds,
            } => {
                let viewport = Viewport {
                    scroll_y: *scroll_y,
                    height: *height,
                };
                self.reveal.on_viewport(document, viewport, bounds);
            }
        }
    }

    pub fn replay(&mut self, document: &mut Document, events: &[PageEvent]) {
        for event in events {
            self.dispatch(document, event);
        }
        tracing::debug!("Replayed {} page events", events.len());
    }
}
