use serde::Serialize;

/// What the translated column of the panel shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum PanelStatus {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl PanelStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, PanelStatus::Loading)
    }

    /// True once a result has been applied (success or error).
    pub fn is_settled(&self) -> bool {
        matches!(self, PanelStatus::Success(_) | PanelStatus::Error(_))
    }
}

/// The only view of the reader state the rendering layer consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PanelState {
    pub visible: bool,
    pub source_text: String,
    /// Heading of the translated column: the reader's chosen language.
    pub target_language: String,
    pub status: PanelStatus,
}
