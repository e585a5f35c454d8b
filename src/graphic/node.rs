use super::error::GraphicError;
use super::selector::Selector;

/// The four numbers of an SVG `viewBox` attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut fields = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().ok());
        let view_box = ViewBox {
            x: fields.next()??,
            y: fields.next()??,
            width: fields.next()??,
            height: fields.next()??,
        };
        fields.next().is_none().then_some(view_box)
    }
}

impl std::fmt::Display for ViewBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            format_number(self.x),
            format_number(self.y),
            format_number(self.width),
            format_number(self.height)
        )
    }
}

pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_owned();
    }
    value.to_string()
}

#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    Element(Node),
    Text(String),
}

/// One SVG element together with everything below it.
///
/// Nodes own their children, so attaching a node somewhere moves it there and
/// [`Clone`] is a deep copy that shares nothing with the original.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Child>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(idx).1)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    fn number(&self, name: &str) -> f64 {
        self.attr(name)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0.0)
    }

    fn set_number(&mut self, name: &str, value: f64) -> &mut Self {
        self.set_attr(name, format_number(value))
    }

    pub fn x(&self) -> f64 {
        self.number("x")
    }

    pub fn set_x(&mut self, x: f64) -> &mut Self {
        self.set_number("x", x)
    }

    pub fn y(&self) -> f64 {
        self.number("y")
    }

    pub fn set_y(&mut self, y: f64) -> &mut Self {
        self.set_number("y", y)
    }

    pub fn width(&self) -> f64 {
        self.number("width")
    }

    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.set_number("width", width)
    }

    pub fn height(&self) -> f64 {
        self.number("height")
    }

    pub fn set_height(&mut self, height: f64) -> &mut Self {
        self.set_number("height", height)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.set_attr("id", id)
    }

    pub fn view_box(&self) -> Option<ViewBox> {
        self.attr("viewBox").and_then(ViewBox::parse)
    }

    pub fn set_view_box(&mut self, view_box: ViewBox) -> &mut Self {
        self.set_attr("viewBox", view_box.to_string())
    }

    pub fn view_box_x(&self) -> Option<f64> {
        self.view_box().map(|vb| vb.x)
    }

    pub fn view_box_y(&self) -> Option<f64> {
        self.view_box().map(|vb| vb.y)
    }

    pub fn view_box_width(&self) -> Option<f64> {
        self.view_box().map(|vb| vb.width)
    }

    pub fn view_box_height(&self) -> Option<f64> {
        self.view_box().map(|vb| vb.height)
    }

    /// Edit the existing viewBox in place; a node without one is left alone.
    pub fn update_view_box(&mut self, edit: impl FnOnce(&mut ViewBox)) -> &mut Self {
        if let Some(mut view_box) = self.view_box() {
            edit(&mut view_box);
            self.set_view_box(view_box);
        }
        self
    }

    /// Width of the coordinate system children are drawn in.
    pub fn frame_width(&self) -> f64 {
        self.view_box_width().unwrap_or_else(|| self.width())
    }

    pub fn frame_height(&self) -> f64 {
        self.view_box_height().unwrap_or_else(|| self.height())
    }

    pub fn center_x_in(&mut self, frame_width: f64) -> &mut Self {
        let x = (frame_width - self.width()) / 2.0;
        self.set_x(x)
    }

    pub fn center_y_in(&mut self, frame_height: f64) -> &mut Self {
        let y = (frame_height - self.height()) / 2.0;
        self.set_y(y)
    }

    pub fn center_x_on(&mut self, reference: &Node) -> &mut Self {
        self.center_x_in(reference.frame_width())
    }

    pub fn center_y_on(&mut self, reference: &Node) -> &mut Self {
        self.center_y_in(reference.frame_height())
    }

    /// Position this node in the middle of `reference`'s drawing area.
    pub fn center_on(&mut self, reference: &Node) -> &mut Self {
        self.center_x_on(reference).center_y_on(reference)
    }

    /// Move this node so that its center lands on the given coordinates.
    pub fn center_at(&mut self, x: Option<f64>, y: Option<f64>) -> &mut Self {
        if let Some(x) = x {
            let corner = x - self.width() / 2.0;
            self.set_x(corner);
        }
        if let Some(y) = y {
            let corner = y - self.height() / 2.0;
            self.set_y(corner);
        }
        self
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Direct element children, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|child| match child {
            Child::Element(node) => Some(node),
            Child::Text(_) => None,
        })
    }

    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Child::Text(text) => Some(text.as_str()),
                Child::Element(_) => None,
            })
            .collect()
    }

    /// Replace all text content, keeping element children.
    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.children.retain(|child| matches!(child, Child::Element(_)));
        self.children.push(Child::Text(text.into()));
        self
    }

    pub(crate) fn push_child(&mut self, child: Child) {
        self.children.push(child);
    }

    pub fn append(&mut self, child: Node) -> &mut Self {
        self.children.push(Child::Element(child));
        self
    }

    pub fn extend<I>(&mut self, children: I) -> &mut Self
    where
        I: IntoIterator<Item = Node>,
    {
        self.children
            .extend(children.into_iter().map(Child::Element));
        self
    }

    /// Detach the first direct child matching `selector` and hand it back.
    pub fn remove(&mut self, selector: &Selector) -> Result<Node, GraphicError> {
        let idx = self
            .children
            .iter()
            .position(|child| matches!(child, Child::Element(node) if selector.matches(node)))
            .ok_or_else(|| GraphicError::not_found(selector))?;
        match self.children.remove(idx) {
            Child::Element(node) => Ok(node),
            Child::Text(_) => Err(GraphicError::not_found(selector)),
        }
    }

    /// First descendant matching `selector`, in document order.
    pub fn find_one(&self, selector: &Selector) -> Result<&Node, GraphicError> {
        self.descendants()
            .find(|node| selector.matches(node))
            .ok_or_else(|| GraphicError::not_found(selector))
    }

    pub fn find_one_mut(&mut self, selector: &Selector) -> Result<&mut Node, GraphicError> {
        find_first_mut(self, selector).ok_or_else(|| GraphicError::not_found(selector))
    }

    /// Every descendant matching `selector`; an empty result is an error.
    pub fn find_all(&self, selector: &Selector) -> Result<Vec<&Node>, GraphicError> {
        let found: Vec<&Node> = self
            .descendants()
            .filter(|node| selector.matches(node))
            .collect();
        if found.is_empty() {
            return Err(GraphicError::not_found(selector));
        }
        Ok(found)
    }

    /// Pre-order walk over everything below this node.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.elements().collect::<Vec<_>>().into_iter().rev().collect(),
        }
    }

    /// Every `id` in the subtree, this node included, in document order.
    pub fn ids(&self) -> Vec<&str> {
        self.id()
            .into_iter()
            .chain(self.descendants().filter_map(Node::id))
            .collect()
    }
}

fn find_first_mut<'a>(node: &'a mut Node, selector: &Selector) -> Option<&'a mut Node> {
    for child in node.children.iter_mut() {
        if let Child::Element(element) = child {
            if selector.matches(element) {
                return Some(element);
            }
            if let Some(found) = find_first_mut(element, selector) {
                return Some(found);
            }
        }
    }
    None
}

pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(node.elements());
        self.stack[start..].reverse();
        Some(node)
    }
}
