use {
    crate::method::MethodTable,
    std::fmt::{self, Write},
};

/// What a node matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// Literal bytes.
    Static,
    /// One path segment, up to the next `/`. Prefix is always `":"`.
    Param,
    /// The rest of the path. Prefix is always `"*"`.
    Wildcard,
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) prefix: Vec<u8>,
    pub(crate) children: Vec<Node>,
    pub(crate) table: Option<MethodTable>,
    /// Parameter names of the latest registration that ended here.
    pub(crate) param_names: Vec<String>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Self::new(NodeKind::Static, Vec::new(), Vec::new())
    }

    pub(crate) fn new(kind: NodeKind, prefix: Vec<u8>, param_names: Vec<String>) -> Self {
        Self {
            kind,
            prefix,
            children: Vec::new(),
            table: None,
            param_names,
        }
    }

    /// First byte of the prefix, used to pick a child.
    pub(crate) fn label(&self) -> Option<u8> {
        self.prefix.first().copied()
    }

    pub(crate) fn static_child(&self, label: u8) -> Option<&Node> {
        self.children
            .iter()
            .find(|child| child.kind == NodeKind::Static && child.label() == Some(label))
    }

    pub(crate) fn param_child(&self) -> Option<&Node> {
        self.child_of_kind(NodeKind::Param)
    }

    pub(crate) fn wildcard_child(&self) -> Option<&Node> {
        self.child_of_kind(NodeKind::Wildcard)
    }

    /// Whether a lookup could still succeed here through a Param or Wildcard
    /// child after a static branch failed.
    pub(crate) fn has_dynamic_child(&self) -> bool {
        self.children.iter().any(|child| child.kind != NodeKind::Static)
    }

    /// Index of the child whose label is `label`, whatever its kind.
    pub(crate) fn child_index(&self, label: u8) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.label() == Some(label))
    }

    fn child_of_kind(&self, kind: NodeKind) -> Option<&Node> {
        self.children.iter().find(|child| child.kind == kind)
    }

    /// Writes this node and its descendants, one per line, indented by depth.
    pub(crate) fn write_tree(&self, out: &mut impl Write, depth: usize) -> fmt::Result {
        write!(
            out,
            "{:indent$}{} {:?}",
            "",
            String::from_utf8_lossy(&self.prefix),
            self.kind,
            indent = depth * 2
        )?;
        if let Some(table) = &self.table {
            write!(out, " [{}]", table.allowed_methods())?;
            if table.cors().is_some() {
                out.write_str(" cors")?;
            }
        }
        if !self.param_names.is_empty() && self.table.is_some() {
            write!(out, " ({})", self.param_names.join(", "))?;
        }
        out.write_char('\n')?;
        for child in &self.children {
            child.write_tree(out, depth + 1)?;
        }
        Ok(())
    }
}
