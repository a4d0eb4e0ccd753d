//! Semantic transcript items.

/// One semantic unit of a transcript, in file order.
///
/// Items are produced once by the parser and only read afterwards.
/// All text has already been sanitized of terminal escape sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A turn typed by the human.
    Human {
        /// Trimmed, sanitized prompt text.
        text: String,
    },
    /// A text block written by the assistant (markdown).
    Assistant {
        /// Trimmed, sanitized markdown text.
        text: String,
    },
    /// A tool invocation issued by the assistant.
    ToolUse {
        /// Tool name (e.g. `Read`, `Bash`).
        name: String,
        /// Short argument summary, at most [`MAX_LABEL_CHARS`] characters.
        label: String,
    },
    /// Output returned to the assistant by a tool.
    ToolResult {
        /// Trimmed, sanitized result text.
        text: String,
        /// Whether the tool reported a failure.
        is_error: bool,
    },
}

/// Maximum display length of a tool-use label, ellipsis included.
pub const MAX_LABEL_CHARS: usize = 72;

impl Item {
    /// Kind of the item, used by the renderer to connect neighbours.
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Human { .. } => ItemKind::Human,
            Item::Assistant { .. } => ItemKind::Assistant,
            Item::ToolUse { .. } => ItemKind::ToolUse,
            Item::ToolResult { .. } => ItemKind::ToolResult,
        }
    }

    /// Convenience constructor for a human item.
    pub fn human(text: impl Into<String>) -> Self {
        Item::Human { text: text.into() }
    }

    /// Convenience constructor for an assistant item.
    pub fn assistant(text: impl Into<String>) -> Self {
        Item::Assistant { text: text.into() }
    }

    /// Convenience constructor for a tool-use item.
    pub fn tool_use(name: impl Into<String>, label: impl Into<String>) -> Self {
        Item::ToolUse {
            name: name.into(),
            label: label.into(),
        }
    }

    /// Convenience constructor for a tool-result item.
    pub fn tool_result(text: impl Into<String>, is_error: bool) -> Self {
        Item::ToolResult {
            text: text.into(),
            is_error,
        }
    }
}

/// Discriminant of [`Item`] without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// [`Item::Human`]
    Human,
    /// [`Item::Assistant`]
    Assistant,
    /// [`Item::ToolUse`]
    ToolUse,
    /// [`Item::ToolResult`]
    ToolResult,
}
