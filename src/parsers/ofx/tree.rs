//! Owned markup tree shared by the SGML normalizer and the XML reader.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Text(String),
    Children(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    content: Content,
}

impl Node {
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Content::Text(text.into().trim().to_string()),
        }
    }

    pub fn container(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            content: Content::Children(children),
        }
    }

    /// Unnamed root holding the top-level elements of a document.
    pub fn document(children: Vec<Node>) -> Self {
        Self::container(String::new(), children)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Children(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Text(_) => &[],
            Content::Children(children) => children,
        }
    }

    /// First node reached by following `path` child by child, in document order.
    pub fn find(&self, path: &[&str]) -> Option<&Node> {
        let Some((head, rest)) = path.split_first() else {
            return Some(self);
        };

        self.children()
            .iter()
            .filter(|child| child.name == *head)
            .find_map(|child| child.find(rest))
    }

    pub fn find_all(&self, path: &[&str]) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_path(path, &mut found);
        found
    }

    fn collect_path<'a>(&'a self, path: &[&str], found: &mut Vec<&'a Node>) {
        let Some((head, rest)) = path.split_first() else {
            found.push(self);
            return;
        };

        for child in self.children().iter().filter(|child| child.name == *head) {
            child.collect_path(rest, found);
        }
    }

    /// First descendant named `name`, depth-first in document order.
    pub fn descendant(&self, name: &str) -> Option<&Node> {
        self.children().iter().find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                child.descendant(name)
            }
        })
    }

    pub fn descendants(&self, name: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Node>) {
        for child in self.children() {
            if child.name == name {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }

    /// Trimmed text of the leaf at `path`; `None` when absent or empty.
    pub fn value(&self, path: &[&str]) -> Option<&str> {
        self.find_all(path)
            .into_iter()
            .find_map(Node::text)
            .filter(|text| !text.is_empty())
    }

    pub fn owned_value(&self, path: &[&str]) -> Option<String> {
        self.value(path).map(str::to_string)
    }
}
