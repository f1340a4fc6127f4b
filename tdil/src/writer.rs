//! Nested output nodes of a generated TDIL file.
//!
//! A [`Node`] writes its header lazily on the first append, accepts content
//! until it is finalized, and renders its footer exactly once. Units are
//! opened from a file and sections from a unit; the child borrows its parent
//! for as long as it is open and is folded into the parent's text when it is
//! closed or dropped, so children always finish before their parent.

use std::fmt;
use std::ops::{Deref, DerefMut};

use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Unit,
    Section,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Unit => write!(f, "unit"),
            NodeKind::Section => write!(f, "section"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Empty,
    HeaderWritten,
    Finalized,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriterError {
    #[error("cannot write to a file that has been finalized")]
    FileFinalized,
    #[error("cannot write to unit '{0}' after it has been finalized")]
    UnitFinalized(String),
    #[error("cannot write to section '{0}' after it has been finalized")]
    SectionFinalized(String),
    #[error("a {child} cannot be opened inside a {parent}")]
    InvalidNesting { parent: NodeKind, child: NodeKind },
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    name: String,
    header: String,
    footer: String,
    buffer: String,
    state: NodeState,
}

impl Node {
    fn new(kind: NodeKind, name: &str, header: String, footer: &str) -> Self {
        Node {
            kind,
            name: name.to_string(),
            header,
            footer: footer.to_string(),
            buffer: String::new(),
            state: NodeState::Empty,
        }
    }

    /// A generated file stamped with the compiler version and generation time.
    pub fn file(version: &str, generated_on: &str) -> Self {
        let header = format!(
            "// Compiler generated file\n// Buddy Compiler version {}\n// Generated on {}\n\n",
            version, generated_on
        );
        Node::new(NodeKind::File, "", header, "")
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == NodeState::Finalized
    }

    fn finalized_error(&self) -> WriterError {
        match self.kind {
            NodeKind::File => WriterError::FileFinalized,
            NodeKind::Unit => WriterError::UnitFinalized(self.name.clone()),
            NodeKind::Section => WriterError::SectionFinalized(self.name.clone()),
        }
    }

    fn write_header(&mut self) {
        if self.state == NodeState::Empty {
            trace!(kind = %self.kind, name = %self.name, "header written");
            self.buffer.push_str(&self.header);
            self.state = NodeState::HeaderWritten;
        }
    }

    fn writable(&mut self) -> Result<(), WriterError> {
        if self.is_finalized() {
            return Err(self.finalized_error());
        }
        self.write_header();
        Ok(())
    }

    pub fn append(&mut self, text: &str) -> Result<(), WriterError> {
        self.writable()?;
        self.buffer.push_str(text);
        Ok(())
    }

    pub fn append_line(&mut self, line: &str) -> Result<(), WriterError> {
        self.writable()?;
        self.buffer.push_str(line);
        self.buffer.push('\n');
        Ok(())
    }

    /// Write the footer and return the complete text. Later calls return the
    /// same text without touching the node again.
    pub fn finalize(&mut self) -> &str {
        if !self.is_finalized() {
            self.write_header();
            self.buffer.push_str(&self.footer);
            self.state = NodeState::Finalized;
            trace!(kind = %self.kind, name = %self.name, "finalized");
        }
        &self.buffer
    }

    fn child(&mut self, child: Node) -> Result<ChildNode<'_>, WriterError> {
        let allowed = matches!(
            (self.kind, child.kind),
            (NodeKind::File, NodeKind::Unit) | (NodeKind::Unit, NodeKind::Section)
        );
        if !allowed {
            return Err(WriterError::InvalidNesting {
                parent: self.kind,
                child: child.kind,
            });
        }
        self.writable()?;
        Ok(ChildNode {
            parent: self,
            node: child,
        })
    }

    /// Open `Unit <qualified> [(<params>)]` inside a file.
    pub fn unit(&mut self, qualified: &str, params: &[String]) -> Result<ChildNode<'_>, WriterError> {
        let header = if params.is_empty() {
            format!("Unit {}\n\n", qualified)
        } else {
            format!("Unit {} ({})\n\n", qualified, params.join(", "))
        };
        self.child(Node::new(NodeKind::Unit, qualified, header, "End\n"))
    }

    /// Open `<name>:[(<params>)]` inside a unit.
    pub fn section(&mut self, name: &str, params: &[String]) -> Result<ChildNode<'_>, WriterError> {
        let header = if params.is_empty() {
            format!("{}:\n", name)
        } else {
            format!("{}:({})\n", name, params.join(", "))
        };
        self.child(Node::new(NodeKind::Section, name, header, "End\n\n"))
    }
}

/// An open child node. Its rendered text is appended to the parent when it
/// is closed or dropped.
pub struct ChildNode<'p> {
    parent: &'p mut Node,
    node: Node,
}

impl ChildNode<'_> {
    pub fn close(self) {}
}

impl Deref for ChildNode<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.node
    }
}

impl DerefMut for ChildNode<'_> {
    fn deref_mut(&mut self) -> &mut Node {
        &mut self.node
    }
}

impl Drop for ChildNode<'_> {
    fn drop(&mut self) {
        let text = self.node.finalize();
        self.parent.buffer.push_str(text);
    }
}
