use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FacturaError;
use super::format::format_decimal;
use super::validation::Validate;

/// One element of the ordered output tree.
///
/// Child order is significant: it is the element order of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// A leaf element holding `text`.
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(name)
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn push(&mut self, child: Node) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn push_text(&mut self, name: &str, text: impl Into<String>) -> &mut Self {
        self.push(Node::leaf(name, text))
    }

    /// Push a leaf only when `text` is present and non-blank.
    pub fn push_opt(&mut self, name: &str, text: Option<&str>) -> &mut Self {
        if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
            self.push_text(name, text);
        }
        self
    }

    pub fn push_amount(&mut self, name: &str, amount: Decimal) -> &mut Self {
        self.push_text(name, format_decimal(amount))
    }

    pub fn push_opt_amount(&mut self, name: &str, amount: Option<Decimal>) -> &mut Self {
        if let Some(amount) = amount {
            self.push_amount(name, amount);
        }
        self
    }

    /// First direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children named `name`, in order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first direct child named `name`.
    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    /// Names of the direct children, in order.
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }
}

/// An entity that renders to exactly one output element.
pub trait ToFragment: Validate {
    /// Element name of the fragment.
    fn tag(&self) -> &str;

    /// Emit the fragment without validating.
    ///
    /// Callers must have validated `self` (directly or through its owner).
    fn build_fragment(&self) -> Node;

    /// Validate, then emit. Never produces partial output.
    fn to_fragment(&self) -> Result<Node, FacturaError> {
        self.validate().into_result()?;
        Ok(self.build_fragment())
    }
}
