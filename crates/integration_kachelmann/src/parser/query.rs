//! Named structural queries over the forecast markup
//!
//! Each [`Query`] walks direct children step by step, matching a tag name and
//! optionally a class. Count checks report the query's field name so a layout
//! change points at the landmark that moved.

use scraper::ElementRef;

use crate::error::ParseError;

/// One level of a query path
#[derive(Debug, Clone, Copy)]
pub struct Step {
    tag: &'static str,
    class: Option<&'static str>,
}

impl Step {
    /// A `<div>` carrying the given class
    pub const fn div(class: &'static str) -> Self {
        Self {
            tag: "div",
            class: Some(class),
        }
    }

    /// Any `<div>`
    pub const fn any_div() -> Self {
        Self {
            tag: "div",
            class: None,
        }
    }

    /// Any `<img>`
    pub const fn img() -> Self {
        Self {
            tag: "img",
            class: None,
        }
    }

    fn matches(&self, element: ElementRef<'_>) -> bool {
        let value = element.value();
        value.name() == self.tag
            && self
                .class
                .is_none_or(|class| value.classes().any(|c| c == class))
    }
}

/// A path of [`Step`]s with the name of the field it locates
#[derive(Debug, Clone, Copy)]
pub struct Query {
    field: &'static str,
    path: &'static [Step],
}

impl Query {
    pub const fn new(field: &'static str, path: &'static [Step]) -> Self {
        Self { field, path }
    }

    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// All elements reached by the path, in document order
    pub fn elements<'a>(&self, from: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.path.iter().fold(vec![from], |current, step| {
            current
                .into_iter()
                .flat_map(|parent| parent.children().filter_map(ElementRef::wrap))
                .filter(|child| step.matches(*child))
                .collect()
        })
    }

    /// Non-blank text nodes directly below the matched elements
    pub fn texts<'a>(&self, from: ElementRef<'a>) -> Vec<&'a str> {
        self.elements(from)
            .into_iter()
            .flat_map(|element| element.children().filter_map(|node| node.value().as_text()))
            .map(|text| &**text)
            .filter(|text| !text.trim().is_empty())
            .collect()
    }

    /// The single element reached by the path
    pub fn one<'a>(&self, from: ElementRef<'a>) -> Result<ElementRef<'a>, ParseError> {
        let [element] = self.exactly(from)?;
        Ok(element)
    }

    /// Exactly `N` elements reached by the path
    pub fn exactly<'a, const N: usize>(
        &self,
        from: ElementRef<'a>,
    ) -> Result<[ElementRef<'a>; N], ParseError> {
        exactly(self.field, self.elements(from))
    }

    /// The single text node below the path
    pub fn one_text<'a>(&self, from: ElementRef<'a>) -> Result<&'a str, ParseError> {
        let [text] = self.texts_exactly(from)?;
        Ok(text)
    }

    /// Exactly `N` text nodes below the path
    pub fn texts_exactly<'a, const N: usize>(
        &self,
        from: ElementRef<'a>,
    ) -> Result<[&'a str; N], ParseError> {
        exactly(self.field, self.texts(from))
    }

    /// All matched elements, failing if there are none
    pub fn at_least_one<'a>(&self, from: ElementRef<'a>) -> Result<Vec<ElementRef<'a>>, ParseError> {
        let elements = self.elements(from);
        if elements.is_empty() {
            return Err(ParseError::MissingElement {
                field: self.field,
                expected: 1,
                found: 0,
            });
        }
        Ok(elements)
    }
}

fn exactly<T, const N: usize>(field: &'static str, items: Vec<T>) -> Result<[T; N], ParseError> {
    let found = items.len();
    items.try_into().map_err(|_| ParseError::MissingElement {
        field,
        expected: N,
        found,
    })
}
