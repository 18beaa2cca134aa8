//! Memory Record Models
//!
//! Data structures for the per-user memory record: profile, working memory,
//! long-term knowledge, and the event timeline. These are the shapes stored
//! in the datastore file; the HTTP layer deserializes requests into them.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Preferred day of week for planning flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Preferences that guide weekly planning flows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeeklyPlanningSettings {
    /// Preferred day of week for planning
    pub planning_day: Option<PlanningDay>,
    /// Preferred local time for planning, HH:MM (24h)
    pub planning_time_local: Option<String>,
    /// Reference calendar to anchor planning sessions
    pub calendar_link: Option<String>,
    /// IANA timezone identifier (e.g., America/New_York)
    pub timezone: Option<String>,
}

fn planning_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid planning time regex"))
}

impl WeeklyPlanningSettings {
    /// Validate the planning time format, if set
    pub fn validate(&self) -> Result<(), String> {
        if let Some(time) = &self.planning_time_local {
            if !planning_time_re().is_match(time) {
                return Err(format!(
                    "planning_time_local must be HH:MM in 24-hour time, got: {}",
                    time
                ));
            }
        }
        Ok(())
    }
}

/// Profile metadata used to personalize the memory experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Profile {
    /// Display name for the user
    pub name: Option<String>,
    /// Short role descriptor for context
    pub role: Option<String>,
    /// Arbitrary, user-defined preferences for prompting and formatting
    #[serde(default)]
    pub preferences: Map<String, Value>,
    /// Recurring planning preferences
    #[serde(default)]
    pub weekly_planning: WeeklyPlanningSettings,
}

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Delegated,
}

/// Actionable item the assistant should keep top-of-mind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identifier for deduplication
    pub id: Option<String>,
    /// Human readable task summary
    pub title: String,
    /// Lifecycle state of the task
    #[serde(default)]
    pub status: TaskStatus,
    /// Optional due date (RFC 3339)
    pub due_at: Option<String>,
    /// Supporting notes or context
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Classification of a recorded decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    Strategic,
    #[default]
    Tactical,
    Process,
}

/// Recorded decision with explicit categorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Unique identifier for this decision
    pub id: Option<String>,
    /// What was decided
    pub summary: String,
    /// Short reasoning behind the choice
    pub rationale: Option<String>,
    /// strategic for long-term direction, tactical for near-term actions,
    /// process for workflow agreements
    #[serde(default)]
    pub decision_type: DecisionType,
    /// When the decision occurred (RFC 3339)
    pub decided_at: Option<String>,
}

/// Type of time being reserved by a timeblock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeblockType {
    #[default]
    Focus,
    Meeting,
    Break,
    Admin,
}

/// Calendar block the assistant should respect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeblock {
    /// Identifier used to sync with calendars
    pub id: Option<String>,
    /// Short label for the block
    pub label: String,
    /// Type of time being reserved
    #[serde(default)]
    pub block_type: TimeblockType,
    /// Start time for the block (RFC 3339)
    pub start_at: String,
    /// End time for the block (RFC 3339)
    pub end_at: String,
}

impl Timeblock {
    /// Validate that end_at is strictly after start_at.
    ///
    /// The store assumes this already holds for records it receives; the
    /// boundary layer calls this before handing documents to the core.
    pub fn validate(&self) -> Result<(), String> {
        let start = chrono::DateTime::parse_from_rfc3339(&self.start_at)
            .map_err(|e| format!("start_at is not a valid RFC 3339 timestamp: {}", e))?;
        let end = chrono::DateTime::parse_from_rfc3339(&self.end_at)
            .map_err(|e| format!("end_at is not a valid RFC 3339 timestamp: {}", e))?;
        if end <= start {
            return Err("end_at must be after start_at".to_string());
        }
        Ok(())
    }
}

/// Short-term memory that powers fast contextual responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkingMemory {
    /// Active focus thread identifier used to disambiguate context
    #[serde(default)]
    pub current_focus_thread: String,
    /// Key priorities the assistant should emphasize in responses
    #[serde(default)]
    pub active_priorities: Vec<String>,
    /// Actionable to-do items
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Decisions that inform upcoming work
    #[serde(default)]
    pub decisions: Vec<Decision>,
    /// Upcoming or ongoing calendar timeblocks
    #[serde(default)]
    pub timeblocks: Vec<Timeblock>,
}

/// Current project status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Blocked,
    Done,
}

/// Project the user is working on with goals and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Stable project identifier
    pub id: Option<String>,
    /// Project name
    pub name: String,
    /// Goals or success criteria
    #[serde(default)]
    pub objectives: Vec<String>,
    /// Current project status
    pub status: Option<ProjectStatus>,
}

/// Key person with a role or relationship to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stakeholder {
    /// Stakeholder identifier or handle
    pub id: Option<String>,
    /// Stakeholder name
    pub name: String,
    /// Role or relationship to the user
    pub role: Option<String>,
    /// Preferred contact channel
    pub contact: Option<String>,
}

/// System, tool, or integration the user relies on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    /// System identifier
    pub id: Option<String>,
    /// Name of the system or integration
    pub name: String,
    /// Notes about configuration or usage
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Durable knowledge that rarely changes but remains critical
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LongTermKnowledge {
    /// Projects in flight
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Important people and their roles
    #[serde(default)]
    pub stakeholders: Vec<Stakeholder>,
    /// Systems/tools in use
    #[serde(default)]
    pub systems: Vec<System>,
}

/// Classification of a timeline event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Live discussion
    Meeting,
    /// Assistant-authored summary
    Snapshot,
    /// Quick context drop
    #[default]
    Note,
}

fn meeting_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^meeting-\d{8}-[a-z0-9-]+$").expect("valid meeting id regex"))
}

fn snapshot_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^snapshot-\d{8}-\d{6}$").expect("valid snapshot id regex"))
}

/// Structured event in the user's memory timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Event {
    /// Stable identifier for deduplication. meeting-YYYYMMDD-slug for
    /// meetings, snapshot-YYYYMMDD-HHMMSS for snapshots.
    pub id: Option<String>,
    /// Classification of the event
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    /// Human-friendly title
    pub title: Option<String>,
    /// Short synopsis of the event
    pub summary: Option<String>,
    /// When the event happened (RFC 3339)
    pub occurred_at: Option<String>,
    /// When the assistant captured the event (RFC 3339). Filled with the
    /// current instant at merge time when absent.
    pub captured_at: Option<String>,
    /// Structured decisions captured from the event
    #[serde(default)]
    pub decisions: Vec<Decision>,
    /// Actionable tasks that surfaced during the event
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Lightweight notes that do not fit task or decision structure
    #[serde(default)]
    pub notes: Vec<String>,
    /// Structured metadata such as participants or tags
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Event {
    /// Create an event of the given type
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            ..Self::default()
        }
    }

    /// Set the event id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the summary
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the occurrence timestamp
    pub fn with_occurred_at(mut self, occurred_at: impl Into<String>) -> Self {
        self.occurred_at = Some(occurred_at.into());
        self
    }

    /// Set the capture timestamp
    pub fn with_captured_at(mut self, captured_at: impl Into<String>) -> Self {
        self.captured_at = Some(captured_at.into());
        self
    }

    /// Validate the id format for the event type, if an id is set
    pub fn validate(&self) -> Result<(), String> {
        let Some(id) = &self.id else {
            return Ok(());
        };
        match self.event_type {
            EventType::Meeting if !meeting_id_re().is_match(id) => Err(format!(
                "meeting ids must use meeting-YYYYMMDD-slug format, got: {}",
                id
            )),
            EventType::Snapshot if !snapshot_id_re().is_match(id) => Err(format!(
                "snapshot ids must use snapshot-YYYYMMDD-HHMMSS format, got: {}",
                id
            )),
            _ => Ok(()),
        }
    }
}

/// Complete memory state for a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMemory {
    /// Unique user identifier
    pub user_id: String,
    /// User profile and preferences
    #[serde(default)]
    pub profile: Profile,
    /// Short-term working memory backing quick responses
    #[serde(default)]
    pub working_memory: WorkingMemory,
    /// Durable knowledge about projects, people, and systems
    #[serde(default)]
    pub long_term_knowledge: LongTermKnowledge,
    /// Timeline of meetings, snapshots, and notes
    #[serde(default)]
    pub events: Vec<Event>,
}

impl UserMemory {
    /// Create an empty memory record for a user
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            profile: Profile::default(),
            working_memory: WorkingMemory::default(),
            long_term_knowledge: LongTermKnowledge::default(),
            events: Vec::new(),
        }
    }

    /// Validate structural invariants the boundary layer is responsible for:
    /// timeblock ordering, planning time format, and event id formats.
    pub fn validate(&self) -> Result<(), String> {
        self.profile.weekly_planning.validate()?;
        for block in &self.working_memory.timeblocks {
            block.validate()?;
        }
        for event in &self.events {
            event.validate()?;
        }
        Ok(())
    }
}
