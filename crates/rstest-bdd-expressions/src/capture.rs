//! Capture-group trees mirroring the structure of a compiled regex.
//!
//! A [`TreeRegexp`] pairs a [`Regex`] with a [`GroupBuilder`] tree derived
//! from the regex source. Matching yields a [`Group`] tree whose root is the
//! whole match and whose children are the outermost capturing groups, each
//! holding the capturing groups nested inside it. Non-capturing groups do not
//! appear in the tree; their capturing descendants move up to the nearest
//! capturing ancestor.

use regex::{Captures, Regex};

/// A matched capture group and the capture groups nested inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    value: Option<String>,
    start: Option<usize>,
    end: Option<usize>,
    children: Vec<Group>,
}

impl Group {
    /// Matched text, or `None` when the group did not participate.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Byte offset where the match starts.
    #[must_use]
    pub const fn start(&self) -> Option<usize> {
        self.start
    }

    /// Byte offset one past the end of the match.
    #[must_use]
    pub const fn end(&self) -> Option<usize> {
        self.end
    }

    /// Capturing groups directly nested inside this one.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Values handed to a parameter transform.
    ///
    /// A group without nested groups yields its own value; otherwise each
    /// direct child contributes one entry.
    #[must_use]
    pub fn values(&self) -> Vec<Option<&str>> {
        if self.children.is_empty() {
            return vec![self.value()];
        }
        self.children.iter().map(Self::value).collect()
    }
}

/// Shape of one capturing group in a regex source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBuilder {
    index: usize,
    capturing: bool,
    children: Vec<GroupBuilder>,
}

impl GroupBuilder {
    const fn new(index: usize, capturing: bool) -> Self {
        Self {
            index,
            capturing,
            children: Vec::new(),
        }
    }

    /// Capture-group index in the compiled regex; `0` for the root.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Capturing groups directly nested inside this one.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    fn build(&self, captures: &Captures<'_>) -> Group {
        let matched = captures.get(self.index);
        Group {
            value: matched.map(|m| m.as_str().to_string()),
            start: matched.map(|m| m.start()),
            end: matched.map(|m| m.end()),
            children: self
                .children
                .iter()
                .map(|child| child.build(captures))
                .collect(),
        }
    }

    fn adopt(&mut self, child: Self) {
        if child.capturing {
            self.children.push(child);
        } else {
            self.children.extend(child.children);
        }
    }
}

/// Scan a regex source and describe its capturing groups as a tree.
///
/// Escaped characters and character classes are skipped. `(` opens a
/// capturing group unless it is followed by `?`, with named groups
/// (`(?P<name>` and `(?<name>`) counting as capturing.
///
/// # Examples
/// ```
/// use rstest_bdd_expressions::create_group_builder;
///
/// let root = create_group_builder(r"^(a(?:b(c))?)\((d)$");
/// let indices: Vec<usize> = root.children().iter().map(|g| g.index()).collect();
/// assert_eq!(indices, vec![1, 3]);
/// let nested: Vec<usize> = root
///     .children()
///     .first()
///     .map(|g| g.children().iter().map(|c| c.index()).collect())
///     .unwrap_or_default();
/// assert_eq!(nested, vec![2]);
/// ```
#[must_use]
pub fn create_group_builder(source: &str) -> GroupBuilder {
    let mut stack = vec![GroupBuilder::new(0, true)];
    let mut next_index = 1;
    let mut escaping = false;
    let mut class_depth = 0usize;
    // Set right after `[` or `[^`, where `]` is literal.
    let mut class_opened = false;
    let mut chars = source.chars();

    while let Some(ch) = chars.next() {
        if escaping {
            escaping = false;
            class_opened = false;
            continue;
        }
        if ch == '\\' {
            escaping = true;
            continue;
        }
        if class_depth > 0 {
            match ch {
                '^' if class_opened => continue,
                ']' if class_opened => {}
                '[' => class_depth += 1,
                ']' => class_depth -= 1,
                _ => {}
            }
            class_opened = ch == '[';
            continue;
        }
        match ch {
            '[' => {
                class_depth = 1;
                class_opened = true;
            }
            '(' => {
                let capturing = opens_capturing_group(chars.clone());
                let index = if capturing {
                    let index = next_index;
                    next_index += 1;
                    index
                } else {
                    0
                };
                stack.push(GroupBuilder::new(index, capturing));
            }
            ')' => {
                if stack.len() > 1 {
                    if let (Some(closed), Some(parent)) = (stack.pop(), stack.last_mut()) {
                        parent.adopt(closed);
                    }
                }
            }
            _ => {}
        }
    }

    while stack.len() > 1 {
        if let (Some(closed), Some(parent)) = (stack.pop(), stack.last_mut()) {
            parent.adopt(closed);
        }
    }
    stack
        .pop()
        .unwrap_or_else(|| GroupBuilder::new(0, true))
}

fn opens_capturing_group(mut rest: impl Iterator<Item = char>) -> bool {
    if rest.next() != Some('?') {
        return true;
    }
    match rest.next() {
        Some('P') => rest.next() == Some('<'),
        Some('<') => !matches!(rest.next(), Some('=' | '!')),
        _ => false,
    }
}

/// A compiled regex together with the tree of its capturing groups.
#[derive(Debug, Clone)]
pub struct TreeRegexp {
    regex: Regex,
    group_builder: GroupBuilder,
}

impl TreeRegexp {
    /// Derive the group tree for `regex`.
    #[must_use]
    pub fn new(regex: Regex) -> Self {
        let group_builder = create_group_builder(regex.as_str());
        Self {
            regex,
            group_builder,
        }
    }

    /// The compiled regex.
    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Root of the capture-group tree.
    #[must_use]
    pub const fn group_builder(&self) -> &GroupBuilder {
        &self.group_builder
    }

    /// Match `text`, returning the group tree, or `None` when it does not
    /// match.
    #[must_use]
    pub fn match_text(&self, text: &str) -> Option<Group> {
        let captures = self.regex.captures(text)?;
        Some(self.group_builder.build(&captures))
    }
}
