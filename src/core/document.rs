//! Page document backed by an html5ever tree.
//!
//! The page is stored as serialized HTML and parsed into an `RcDom` for each
//! operation, so the document itself stays `Send` and can sit behind the
//! shared render lock. Element handles are [`Selector`]s rather than node
//! references: they stay valid across mounts that rewrite other parts of the
//! page.

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, Attribute, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// How page code refers to an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// `#id`
    Id(String),
    /// First element with this tag name.
    Tag(String),
    /// `section > div`: the `child`-th direct div of the `section`-th section.
    SectionChild { section: usize, child: usize },
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Selector::Id(id.into())
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Selector::Tag(name.into())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{}", id),
            Selector::Tag(name) => write!(f, "{}", name),
            Selector::SectionChild { section, child } => {
                write!(f, "section[{}] > div[{}]", section, child)
            }
        }
    }
}

/// Tag name and attributes of one element, attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    fn from_node(node: &Handle) -> Option<Self> {
        match &node.data {
            NodeData::Element { name, attrs, .. } => Some(Self {
                tag: name.local.to_string(),
                attrs: attrs
                    .borrow()
                    .iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect(),
            }),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn parse_dom(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

/// Parses `markup` as the content of a `context` element.
fn parse_nodes(context: &QualName, markup: &str) -> Vec<Handle> {
    let dom = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        context.clone(),
        Vec::new(),
    )
    .one(markup);

    let root = dom.document.children.borrow().first().cloned();
    root.map(|html| html.children.take()).unwrap_or_default()
}

fn serialize_children(node: &Handle) -> String {
    let mut out = Vec::new();
    let handle: SerializableHandle = node.clone().into();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    if let Err(e) = serialize(&mut out, &handle, opts) {
        tracing::warn!("Failed to serialize markup: {}", e);
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn attr(node: &Handle, key: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == key)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn set_attr(node: &Handle, key: &str, value: String) {
    let NodeData::Element { attrs, .. } = &node.data else {
        return;
    };
    let mut attrs = attrs.borrow_mut();
    match attrs.iter_mut().find(|a| &*a.name.local == key) {
        Some(existing) => existing.value = value.into(),
        None => attrs.push(Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(key)),
            value: value.into(),
        }),
    }
}

/// Every element below `node`, in document order.
fn descendants(node: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack: Vec<Handle> = node.children.borrow().iter().rev().cloned().collect();
    while let Some(next) = stack.pop() {
        stack.extend(next.children.borrow().iter().rev().cloned());
        if tag_name(&next).is_some() {
            out.push(next);
        }
    }
    out
}

fn child_elements(node: &Handle, name: &str) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| tag_name(child) == Some(name))
        .cloned()
        .collect()
}

fn sections(root: &Handle) -> Vec<Handle> {
    descendants(root)
        .into_iter()
        .filter(|node| tag_name(node) == Some("section"))
        .collect()
}

fn resolve(root: &Handle, selector: &Selector) -> Option<Handle> {
    match selector {
        Selector::Id(id) => descendants(root)
            .into_iter()
            .find(|node| attr(node, "id").as_deref() == Some(id.as_str())),
        Selector::Tag(name) => {
            let name = name.to_ascii_lowercase();
            descendants(root)
                .into_iter()
                .find(|node| tag_name(node) == Some(name.as_str()))
        }
        Selector::SectionChild { section, child } => {
            let section = sections(root).into_iter().nth(*section)?;
            child_elements(&section, "div").into_iter().nth(*child)
        }
    }
}

fn replace_children(parent: &Handle, nodes: Vec<Handle>) {
    for old in parent.children.take() {
        old.parent.set(None);
    }
    for node in &nodes {
        node.parent.set(Some(Rc::downgrade(parent)));
    }
    *parent.children.borrow_mut() = nodes;
}

fn split_classes(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    html: String,
}

impl Document {
    /// Parses `html` as a full page. Fragments are wrapped into
    /// `<html><head></head><body>…</body></html>` the way a browser does.
    pub fn parse(html: impl AsRef<str>) -> Self {
        let dom = parse_dom(html.as_ref());
        Self {
            html: serialize_children(&dom.document),
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    fn read<T>(&self, f: impl FnOnce(&Handle) -> T) -> T {
        let dom = parse_dom(&self.html);
        f(&dom.document)
    }

    /// Runs `f` on the parsed tree and keeps its changes when it returns
    /// `Some`. On `None` the source is left untouched.
    fn edit<T>(&mut self, f: impl FnOnce(&Handle) -> Option<T>) -> Option<T> {
        let dom = parse_dom(&self.html);
        let result = f(&dom.document)?;
        self.html = serialize_children(&dom.document);
        Some(result)
    }

    pub fn find(&self, selector: &Selector) -> Option<Element> {
        self.read(|root| resolve(root, selector).and_then(|node| Element::from_node(&node)))
    }

    pub fn contains(&self, selector: &Selector) -> bool {
        self.find(selector).is_some()
    }

    pub fn inner_html(&self, selector: &Selector) -> Option<String> {
        self.read(|root| resolve(root, selector).map(|node| serialize_children(&node)))
    }

    /// Replaces everything inside the element in one assignment.
    /// Returns `false` when the element does not exist or is void.
    pub fn set_inner_html(&mut self, selector: &Selector, markup: &str) -> bool {
        self.edit(|root| {
            let node = resolve(root, selector)?;
            let NodeData::Element { name, .. } = &node.data else {
                return None;
            };
            if VOID_ELEMENTS.contains(&&*name.local) {
                return None;
            }
            replace_children(&node, parse_nodes(name, markup));
            Some(())
        })
        .is_some()
    }

    /// Swaps every element `render` returns markup for with that markup,
    /// parsed in body context. Returns how many elements were replaced.
    pub fn replace_elements(&mut self, mut render: impl FnMut(&Element) -> Option<String>) -> usize {
        self.edit(|root| {
            let body = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
            let mut replaced = 0;

            for node in descendants(root) {
                let Some(markup) = Element::from_node(&node).and_then(|el| render(&el)) else {
                    continue;
                };
                let Some(parent) = node.parent.take().and_then(|weak| weak.upgrade()) else {
                    continue;
                };

                let nodes = parse_nodes(&body, &markup);
                for new in &nodes {
                    new.parent.set(Some(Rc::downgrade(&parent)));
                }
                let mut children = parent.children.borrow_mut();
                if let Some(pos) = children.iter().position(|c| Rc::ptr_eq(c, &node)) {
                    children.splice(pos..=pos, nodes);
                    replaced += 1;
                }
            }

            (replaced > 0).then_some(replaced)
        })
        .unwrap_or(0)
    }

    /// `section > div` for every section in the page, in document order.
    pub fn section_children(&self) -> Vec<Selector> {
        self.read(|root| {
            sections(root)
                .iter()
                .enumerate()
                .flat_map(|(section, node)| {
                    (0..child_elements(node, "div").len())
                        .map(move |child| Selector::SectionChild { section, child })
                })
                .collect()
        })
    }

    /// Number of `<tag>` descendants inside the selected element.
    pub fn count_descendants(&self, selector: &Selector, tag: &str) -> usize {
        let tag = tag.to_ascii_lowercase();
        self.read(|root| {
            resolve(root, selector).map_or(0, |node| {
                descendants(&node)
                    .iter()
                    .filter(|d| tag_name(d) == Some(tag.as_str()))
                    .count()
            })
        })
    }

    pub fn class_list(&self, selector: &Selector) -> Option<Vec<String>> {
        self.read(|root| {
            let node = resolve(root, selector)?;
            Some(attr(&node, "class").map(|v| split_classes(&v)).unwrap_or_default())
        })
    }

    pub fn has_class(&self, selector: &Selector, class: &str) -> bool {
        self.class_list(selector)
            .is_some_and(|classes| classes.iter().any(|c| c == class))
    }

    /// Returns `false` when the element does not exist.
    pub fn add_class(&mut self, selector: &Selector, class: &str) -> bool {
        self.update_classes(selector, |classes| {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        })
        .is_some()
    }

    pub fn remove_class(&mut self, selector: &Selector, class: &str) -> bool {
        self.update_classes(selector, |classes| classes.retain(|c| c != class))
            .is_some()
    }

    /// Returns whether the class is present afterwards, or `None` when the
    /// element does not exist.
    pub fn toggle_class(&mut self, selector: &Selector, class: &str) -> Option<bool> {
        self.update_classes(selector, |classes| {
            if classes.iter().any(|c| c == class) {
                classes.retain(|c| c != class);
                false
            } else {
                classes.push(class.to_string());
                true
            }
        })
    }

    fn update_classes<T>(
        &mut self,
        selector: &Selector,
        update: impl FnOnce(&mut Vec<String>) -> T,
    ) -> Option<T> {
        self.edit(|root| {
            let node = resolve(root, selector)?;
            let mut classes = attr(&node, "class")
                .map(|v| split_classes(&v))
                .unwrap_or_default();
            let result = update(&mut classes);
            set_attr(&node, "class", classes.join(" "));
            Some(result)
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::parse("")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <script>if (a < b) { document.write("<div id='fake'></div>"); }</script>
</head>
<body>
    <nav class="fixed w-full">
        <button id="mobile-menu-btn">Menu</button>
        <div id="mobile-menu" class="hidden md:hidden">
            <a href="#projects">Projects</a>
            <a href="#skills">Skills</a>
        </div>
    </nav>
    <!-- <section><div>commented out</div></section> -->
    <section id="projects">
        <div class="max-w-6xl">
            <div id="projects-container" class='grid'><p>Loading...</p></div>
        </div>
    </section>
    <section id="skills">
        <div class=intro><h2>Skills</h2></div>
        <div id="skills-container"></div>
    </section>
</body>
</html>"##;

    #[test]
    fn test_find_by_id_and_inner_html() {
        let doc = Document::parse(PAGE);
        assert_eq!(
            doc.inner_html(&Selector::id("projects-container")).as_deref(),
            Some("<p>Loading...</p>")
        );
        assert!(!doc.contains(&Selector::id("missing")));
        assert_eq!(
            doc.find(&Selector::id("projects-container"))
                .unwrap()
                .attr("class"),
            Some("grid")
        );
    }

    #[test]
    fn test_script_content_is_not_scanned() {
        let doc = Document::parse(PAGE);
        assert!(!doc.contains(&Selector::id("fake")));
        assert!(doc.html().contains("document.write(\"<div id='fake'></div>\")"));
    }

    #[test]
    fn test_set_inner_html_replaces_whole_content() {
        let mut doc = Document::parse(PAGE);
        assert!(doc.set_inner_html(&Selector::id("projects-container"), "<div>A</div>"));
        assert!(doc.set_inner_html(&Selector::id("projects-container"), "<div>B</div>"));
        assert_eq!(
            doc.inner_html(&Selector::id("projects-container")).as_deref(),
            Some("<div>B</div>")
        );
        assert!(!doc.html().contains("Loading..."));
    }

    #[test]
    fn test_set_inner_html_missing_element() {
        let mut doc = Document::parse(PAGE);
        let before = doc.html().to_string();
        assert!(!doc.set_inner_html(&Selector::id("nope"), "x"));
        assert_eq!(doc.html(), before);
    }

    #[test]
    fn test_section_children_are_direct_divs_only() {
        let doc = Document::parse(PAGE);
        let children = doc.section_children();
        assert_eq!(
            children,
            vec![
                Selector::SectionChild { section: 0, child: 0 },
                Selector::SectionChild { section: 1, child: 0 },
                Selector::SectionChild { section: 1, child: 1 },
            ]
        );
        assert_eq!(doc.class_list(&children[1]), Some(vec!["intro".to_string()]));
    }

    #[test]
    fn test_slash_on_non_void_element_is_ignored() {
        let doc = Document::parse(r#"<section><div class="a"/><p>x</p></div></section>"#);

        assert_eq!(
            doc.section_children(),
            vec![Selector::SectionChild { section: 0, child: 0 }]
        );
        assert_eq!(
            doc.inner_html(&Selector::SectionChild { section: 0, child: 0 })
                .as_deref(),
            Some("<p>x</p>")
        );
    }

    #[test]
    fn test_class_operations() {
        let mut doc = Document::parse(PAGE);
        let menu = Selector::id("mobile-menu");
        let nav = Selector::tag("nav");
        let button = Selector::id("mobile-menu-btn");

        assert!(doc.has_class(&menu, "hidden"));
        assert_eq!(doc.toggle_class(&menu, "hidden"), Some(false));
        assert!(!doc.has_class(&menu, "hidden"));
        assert!(doc.has_class(&menu, "md:hidden"));

        assert!(doc.add_class(&nav, "shadow-md"));
        assert!(doc.add_class(&nav, "shadow-md"));
        assert_eq!(
            doc.class_list(&nav),
            Some(vec!["fixed".to_string(), "w-full".to_string(), "shadow-md".to_string()])
        );
        assert!(doc.remove_class(&nav, "shadow-md"));
        assert!(!doc.has_class(&nav, "shadow-md"));

        assert!(doc.add_class(&button, "open"));
        assert!(doc.html().contains(r#"<button id="mobile-menu-btn" class="open">"#));
        assert_eq!(doc.toggle_class(&Selector::id("nope"), "x"), None);
    }

    #[test]
    fn test_count_descendants() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.count_descendants(&Selector::id("mobile-menu"), "a"), 2);
        assert_eq!(doc.count_descendants(&Selector::id("skills-container"), "a"), 0);
    }

    #[test]
    fn test_void_elements_do_not_nest() {
        let mut doc = Document::parse(r#"<div id="a"><img src="x.png"><br/><span>t</span></div>"#);
        assert_eq!(
            doc.inner_html(&Selector::id("a")).as_deref(),
            Some(r#"<img src="x.png"><br><span>t</span>"#)
        );
        assert!(!doc.set_inner_html(&Selector::tag("img"), "x"));
    }

    #[test]
    fn test_replace_elements() {
        let mut doc = Document::parse(r#"<p><b>one</b> and <b>two</b></p>"#);
        let replaced = doc.replace_elements(|el| {
            (el.tag == "b").then(|| "<strong>bold</strong>".to_string())
        });

        assert_eq!(replaced, 2);
        assert_eq!(
            doc.inner_html(&Selector::tag("p")).as_deref(),
            Some("<strong>bold</strong> and <strong>bold</strong>")
        );
        assert_eq!(doc.replace_elements(|_| None), 0);
    }
}
