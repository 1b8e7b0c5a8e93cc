use futures::channel::oneshot;
use ratatui::layout::Rect;
use serde::Deserialize;
use std::fmt;
use std::time::Instant;

pub const DEFAULT_TITLE: &str = "Confirm action";
pub const DEFAULT_MESSAGE: &str = "Are you sure you want to continue?";
pub const DEFAULT_CONFIRM_LABEL: &str = "Confirm";
pub const DEFAULT_CANCEL_LABEL: &str = "Cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfirmId(u64);

impl ConfirmId {
    pub(super) fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConfirmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "confirm_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmKind {
    #[default]
    Warning,
    Danger,
    Info,
    Success,
}

impl ConfirmKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "warning" | "warn" => Some(Self::Warning),
            "danger" | "error" => Some(Self::Danger),
            "info" => Some(Self::Info),
            "success" => Some(Self::Success),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Warning => "!",
            Self::Danger => "X",
            Self::Info => "i",
            Self::Success => "v",
        }
    }
}

impl<'de> Deserialize<'de> for ConfirmKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Unknown kinds degrade to the default instead of rejecting the options.
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(ConfirmKind::parse)
            .unwrap_or_default())
    }
}

/// Caller-supplied configuration for one prompt. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfirmOptions {
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type", alias = "kind")]
    pub kind: Option<ConfirmKind>,
    #[serde(alias = "confirmLabel", alias = "confirmText")]
    pub confirm_label: Option<String>,
    #[serde(alias = "cancelLabel", alias = "cancelText")]
    pub cancel_label: Option<String>,
}

impl ConfirmOptions {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn kind(mut self, kind: ConfirmKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = Some(label.into());
        self
    }

    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = Some(label.into());
        self
    }
}

fn non_blank_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmTrigger {
    Confirm,
    Cancel,
    Backdrop,
    Escape,
    Timeout,
    Dismissed,
}

impl ConfirmTrigger {
    pub fn outcome(self) -> bool {
        matches!(self, Self::Confirm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmState {
    Pending,
    Resolved {
        confirmed: bool,
        trigger: ConfirmTrigger,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmFocus {
    Confirm,
    Cancel,
}

impl ConfirmFocus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Confirm => Self::Cancel,
            Self::Cancel => Self::Confirm,
        }
    }
}

/// Screen regions of one rendered modal. Registered by the renderer, owned by
/// the request, dropped when the request resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalBindings {
    pub content: Rect,
    pub confirm_button: Rect,
    pub cancel_button: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalHit {
    ConfirmButton,
    CancelButton,
    Content,
    Backdrop,
}

fn rect_contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

impl ModalBindings {
    pub fn hit(&self, column: u16, row: u16) -> ModalHit {
        if rect_contains(self.confirm_button, column, row) {
            ModalHit::ConfirmButton
        } else if rect_contains(self.cancel_button, column, row) {
            ModalHit::CancelButton
        } else if rect_contains(self.content, column, row) {
            ModalHit::Content
        } else {
            ModalHit::Backdrop
        }
    }
}

pub struct ConfirmRequest {
    pub id: ConfirmId,
    pub kind: ConfirmKind,
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub created_at: Instant,
    pub state: ConfirmState,
    pub focus: ConfirmFocus,
    pub(super) deadline: Option<Instant>,
    pub(super) bindings: Option<ModalBindings>,
    pub(super) resolver: Option<oneshot::Sender<bool>>,
    pub(super) closing_until: Option<Instant>,
}

impl ConfirmRequest {
    pub(super) fn new(
        id: ConfirmId,
        options: ConfirmOptions,
        created_at: Instant,
        deadline: Instant,
        resolver: oneshot::Sender<bool>,
    ) -> Self {
        let kind = options.kind.unwrap_or_default();
        Self {
            id,
            kind,
            title: non_blank_or(options.title, DEFAULT_TITLE),
            message: non_blank_or(options.message, DEFAULT_MESSAGE),
            confirm_label: non_blank_or(options.confirm_label, DEFAULT_CONFIRM_LABEL),
            cancel_label: non_blank_or(options.cancel_label, DEFAULT_CANCEL_LABEL),
            created_at,
            state: ConfirmState::Pending,
            focus: if kind == ConfirmKind::Danger {
                ConfirmFocus::Cancel
            } else {
                ConfirmFocus::Confirm
            },
            deadline: Some(deadline),
            bindings: None,
            resolver: Some(resolver),
            closing_until: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == ConfirmState::Pending
    }

    pub fn is_closing(&self) -> bool {
        self.closing_until.is_some()
    }

    pub fn resolution(&self) -> Option<bool> {
        match self.state {
            ConfirmState::Pending => None,
            ConfirmState::Resolved { confirmed, .. } => Some(confirmed),
        }
    }

    #[cfg(test)]
    pub fn bindings(&self) -> Option<&ModalBindings> {
        self.bindings.as_ref()
    }
}
