use portfolio_page::core::document::{Document, Selector};
use portfolio_page::core::interactions::{
    ElementBounds, InteractionConfig, Interactions, MobileMenu, NavShadow, PageEvent,
    RevealObserver, RevealOptions, Viewport, HIDDEN_CLASS, REVEAL_CLASS, SHADOW_CLASS,
};

const SAMPLE_PAGE: &str = include_str!("../site/index.html");

fn nav_has_shadow(document: &Document) -> bool {
    document.has_class(&Selector::tag("nav"), SHADOW_CLASS)
}

#[test]
fn test_menu_toggle_and_link_close() {
    let mut document = Document::parse(SAMPLE_PAGE);
    let menu = MobileMenu::wire(&document).expect("menu elements present");

    assert_eq!(menu.link_count(), 4);
    assert!(!menu.is_open(&document));

    menu.on_trigger_click(&mut document);
    assert!(menu.is_open(&document));

    menu.on_link_click(&mut document, 2);
    assert!(!menu.is_open(&document));

    // closing is idempotent
    menu.on_link_click(&mut document, 0);
    assert!(!menu.is_open(&document));
    assert_eq!(
        document
            .class_list(&Selector::id("mobile-menu"))
            .unwrap()
            .iter()
            .filter(|c| c.as_str() == HIDDEN_CLASS)
            .count(),
        1
    );

    menu.on_trigger_click(&mut document);
    menu.on_trigger_click(&mut document);
    assert!(!menu.is_open(&document));
}

#[test]
fn test_menu_not_wired_without_trigger() {
    let document = Document::parse(r#"<nav><div id="mobile-menu" class="hidden"></div></nav>"#);
    assert!(MobileMenu::wire(&document).is_none());
}

#[test]
fn test_nav_shadow_threshold() {
    let mut document = Document::parse(SAMPLE_PAGE);
    let nav = NavShadow::wire(&document, 100.0).unwrap();

    for y in [0.0, 50.0, 99.5, 100.0] {
        nav.on_scroll(&mut document, y);
        assert!(!nav_has_shadow(&document), "no shadow at {}", y);
    }
    for y in [100.5, 101.0, 2000.0] {
        nav.on_scroll(&mut document, y);
        assert!(nav_has_shadow(&document), "shadow at {}", y);
    }

    // scrolling back up removes it again
    nav.on_scroll(&mut document, 40.0);
    assert!(!nav_has_shadow(&document));
}

#[test]
fn test_nav_shadow_not_wired_without_nav() {
    let document = Document::parse("<main></main>");
    assert!(NavShadow::wire(&document, 100.0).is_none());
}

#[test]
fn test_reveal_at_most_once() {
    let mut document = Document::parse(SAMPLE_PAGE);
    let mut observer = RevealObserver::new(RevealOptions::default());

    assert_eq!(observer.observe_sections(&document), 4);
    let target = Selector::SectionChild { section: 1, child: 0 };

    assert!(!observer.on_intersection(&mut document, &target, 0.05));
    assert!(!document.has_class(&target, REVEAL_CLASS));

    assert!(observer.on_intersection(&mut document, &target, 0.5));
    assert!(document.has_class(&target, REVEAL_CLASS));
    assert!(!observer.is_watching(&target));
    assert!(observer.is_revealed(&target));

    // leave and re-enter: nothing more happens
    document.remove_class(&target, REVEAL_CLASS);
    assert!(!observer.on_intersection(&mut document, &target, 1.0));
    assert!(!document.has_class(&target, REVEAL_CLASS));

    observer.observe(target.clone());
    assert!(!observer.is_watching(&target));
    assert_eq!(observer.watched().len(), 3);
}

#[test]
fn test_reveal_from_viewport_geometry() {
    let mut document = Document::parse(SAMPLE_PAGE);
    let mut observer = RevealObserver::new(RevealOptions::default());
    observer.observe_sections(&document);

    let bounds = vec![
        ElementBounds {
            target: Selector::SectionChild { section: 0, child: 0 },
            top: 128.0,
            height: 300.0,
        },
        ElementBounds {
            target: Selector::SectionChild { section: 1, child: 0 },
            top: 760.0,
            height: 600.0,
        },
    ];

    let revealed = observer.on_viewport(
        &mut document,
        Viewport {
            scroll_y: 0.0,
            height: 800.0,
        },
        &bounds,
    );
    assert_eq!(revealed, vec![Selector::SectionChild { section: 0, child: 0 }]);

    let revealed = observer.on_viewport(
        &mut document,
        Viewport {
            scroll_y: 400.0,
            height: 800.0,
        },
        &bounds,
    );
    assert_eq!(revealed, vec![Selector::SectionChild { section: 1, child: 0 }]);

    let revealed = observer.on_viewport(
        &mut document,
        Viewport {
            scroll_y: 0.0,
            height: 800.0,
        },
        &bounds,
    );
    assert!(revealed.is_empty());
}

#[test]
fn test_replayed_session() {
    let mut document = Document::parse(SAMPLE_PAGE);
    let mut interactions = Interactions::wire(&document, &InteractionConfig::default());

    let events: Vec<PageEvent> = serde_json::from_str(
        r#"[
            {"type": "menu_toggle"},
            {"type": "scroll", "y": 350},
            {"type": "intersect", "target": {"section_child": {"section": 2, "child": 0}}, "ratio": 0.3},
            {"type": "intersect", "target": {"section_child": {"section": 2, "child": 0}}, "ratio": 0.9}
        ]"#,
    )
    .unwrap();
    interactions.replay(&mut document, &events);

    assert!(interactions.menu.as_ref().unwrap().is_open(&document));
    assert!(nav_has_shadow(&document));

    let skills = Selector::SectionChild { section: 2, child: 0 };
    let classes = document.class_list(&skills).unwrap();
    assert_eq!(classes.iter().filter(|c| c.as_str() == REVEAL_CLASS).count(), 1);

    interactions.dispatch(&mut document, &PageEvent::MenuLinkClick { index: 3 });
    interactions.dispatch(&mut document, &PageEvent::Scroll { y: 10.0 });
    assert!(!interactions.menu.as_ref().unwrap().is_open(&document));
    assert!(!nav_has_shadow(&document));
}
