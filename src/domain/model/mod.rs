// Domain models - Labels, derived intervals and player shifts

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

/// Open key/value payload as stored in the project document
pub type Context = Map<String, Value>;

/// Player id -> shifts of that player
pub type ShiftMap = BTreeMap<String, PlayerShiftInfo>;

/// Label kind tags as they appear in the project document
pub mod kind {
    pub const SEGMENT: &str = "Segment";
    pub const STOPPAGE: &str = "Stoppage";
    pub const SHIFT_CHANGE: &str = "ShiftChange";
    pub const GOAL: &str = "Goal";
    pub const PENALTY: &str = "Penalty";
}

/// Context key carrying the period tag of Stoppage and ShiftChange labels
pub const PERIOD_NAME_KEY: &str = "period_name";

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Which of the two teams an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Home,
    Away,
}

/// Operator-placed point event on the raw video timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLabel", into = "RawLabel")]
pub struct Label {
    pub id: String,
    /// Raw video time in seconds
    pub time: f64,
    pub kind: LabelKind,
    /// Period the label falls into, assigned during derivation
    pub period_name: Option<String>,
}

/// Kind of a label together with its kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum LabelKind {
    /// Period boundary; consecutive pairs form a period
    Segment(Context),
    /// Play stoppage boundary; consecutive pairs form a stoppage
    Stoppage(Context),
    /// Snapshot of who is on the ice from this instant
    ShiftChange(ShiftChangeContext),
    Goal(GoalContext),
    /// Penalty boundary; labels with identical context pair up
    Penalty(PenaltyContext),
    /// Any other kind, or a known kind whose context could not be read
    Other { kind: String, context: Context },
}

impl LabelKind {
    /// Tag used in the project document
    pub fn name(&self) -> &str {
        match self {
            LabelKind::Segment(_) => kind::SEGMENT,
            LabelKind::Stoppage(_) => kind::STOPPAGE,
            LabelKind::ShiftChange(_) => kind::SHIFT_CHANGE,
            LabelKind::Goal(_) => kind::GOAL,
            LabelKind::Penalty(_) => kind::PENALTY,
            LabelKind::Other { kind, .. } => kind,
        }
    }
}

/// Payload of a ShiftChange label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftChangeContext {
    /// Everyone on the ice; an empty list means nobody is
    pub players_on_ice: Vec<OnIceEntry>,
    #[serde(flatten)]
    pub extra: Context,
}

impl ShiftChangeContext {
    /// Entries that carry both an id and a name
    pub fn valid_players(&self) -> impl Iterator<Item = &PlayerRef> {
        self.players_on_ice.iter().filter_map(|entry| match entry {
            OnIceEntry::Player(player) => Some(player),
            OnIceEntry::Malformed(_) => None,
        })
    }

    /// Entries that could not be read as a player reference
    pub fn malformed(&self) -> impl Iterator<Item = &Value> {
        self.players_on_ice.iter().filter_map(|entry| match entry {
            OnIceEntry::Malformed(value) => Some(value),
            OnIceEntry::Player(_) => None,
        })
    }
}

/// One element of `players_on_ice`; malformed entries are kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OnIceEntry {
    Player(PlayerRef),
    Malformed(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    #[serde(alias = "id_fhm")]
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Context,
}

impl PlayerRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Context::new(),
        }
    }
}

/// Payload of a Goal label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(flatten)]
    pub extra: Context,
}

/// Payload of a Penalty label, also stored on derived Penalty intervals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PenaltyContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, alias = "player_id_fhm", skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_type: Option<String>,
    #[serde(flatten)]
    pub extra: Context,
}

impl PenaltyContext {
    pub fn new(team: &str, player_id: &str, player_name: &str, violation_type: &str) -> Self {
        Self {
            team: Some(team.to_string()),
            player_id: Some(player_id.to_string()),
            player_name: Some(player_name.to_string()),
            violation_type: Some(violation_type.to_string()),
            extra: Context::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.team.is_none()
            && self.player_id.is_none()
            && self.player_name.is_none()
            && self.violation_type.is_none()
            && self.extra.is_empty()
    }
}

impl Label {
    /// Create a label with a fresh id
    pub fn new(kind: LabelKind, time: f64) -> Self {
        Self::with_id(new_id(), kind, time)
    }

    pub fn with_id(id: impl Into<String>, kind: LabelKind, time: f64) -> Self {
        Self {
            id: id.into(),
            time,
            kind,
            period_name: None,
        }
    }

    pub fn segment(time: f64) -> Self {
        Self::new(LabelKind::Segment(Context::new()), time)
    }

    pub fn stoppage(time: f64) -> Self {
        Self::new(LabelKind::Stoppage(Context::new()), time)
    }

    pub fn goal(time: f64, team: &str) -> Self {
        Self::new(
            LabelKind::Goal(GoalContext {
                team: Some(team.to_string()),
                extra: Context::new(),
            }),
            time,
        )
    }

    pub fn penalty(time: f64, context: PenaltyContext) -> Self {
        Self::new(LabelKind::Penalty(context), time)
    }

    /// ShiftChange label listing `(id, name)` pairs currently on ice
    pub fn shift_change(time: f64, players: &[(&str, &str)]) -> Self {
        let players_on_ice = players
            .iter()
            .map(|(id, name)| OnIceEntry::Player(PlayerRef::new(*id, *name)))
            .collect();
        Self::new(
            LabelKind::ShiftChange(ShiftChangeContext {
                players_on_ice,
                extra: Context::new(),
            }),
            time,
        )
    }

    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }
}

/// Wire shape of a label: `{id, kind, time, context}`
#[derive(Serialize, Deserialize)]
struct RawLabel {
    #[serde(default = "new_id")]
    id: String,
    #[serde(alias = "label_type")]
    kind: String,
    #[serde(alias = "global_time")]
    time: f64,
    #[serde(default)]
    context: Option<Context>,
}

fn parse_context<T: DeserializeOwned>(
    id: &str,
    kind: &str,
    context: Context,
    wrap: fn(T) -> LabelKind,
) -> LabelKind {
    match serde_json::from_value::<T>(Value::Object(context.clone())) {
        Ok(parsed) => wrap(parsed),
        Err(e) => {
            warn!(label_id = id, kind, error = %e, "Label context is unreadable, keeping it untyped");
            LabelKind::Other {
                kind: kind.to_string(),
                context,
            }
        }
    }
}

impl From<RawLabel> for Label {
    fn from(raw: RawLabel) -> Self {
        let mut context = raw.context.unwrap_or_default();
        let period_name = context
            .remove(PERIOD_NAME_KEY)
            .and_then(|value| value.as_str().map(str::to_owned));

        let kind = match raw.kind.as_str() {
            kind::SEGMENT => LabelKind::Segment(context),
            kind::STOPPAGE => LabelKind::Stoppage(context),
            kind::SHIFT_CHANGE => parse_context(&raw.id, &raw.kind, context, LabelKind::ShiftChange),
            kind::GOAL => parse_context(&raw.id, &raw.kind, context, LabelKind::Goal),
            kind::PENALTY => parse_context(&raw.id, &raw.kind, context, LabelKind::Penalty),
            _ => LabelKind::Other {
                kind: raw.kind.clone(),
                context,
            },
        };

        Label {
            id: raw.id,
            time: raw.time,
            kind,
            period_name,
        }
    }
}

fn to_context<T: Serialize>(payload: &T) -> Context {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => map,
        _ => Context::new(),
    }
}

impl From<Label> for RawLabel {
    fn from(label: Label) -> Self {
        let (kind, mut context) = match label.kind {
            LabelKind::Segment(context) => (kind::SEGMENT.to_string(), context),
            LabelKind::Stoppage(context) => (kind::STOPPAGE.to_string(), context),
            LabelKind::ShiftChange(ctx) => (kind::SHIFT_CHANGE.to_string(), to_context(&ctx)),
            LabelKind::Goal(ctx) => (kind::GOAL.to_string(), to_context(&ctx)),
            LabelKind::Penalty(ctx) => (kind::PENALTY.to_string(), to_context(&ctx)),
            LabelKind::Other { kind, context } => (kind, context),
        };
        if let Some(period_name) = label.period_name {
            context.insert(PERIOD_NAME_KEY.to_string(), Value::String(period_name));
        }
        RawLabel {
            id: label.id,
            kind,
            time: label.time,
            context: Some(context),
        }
    }
}

/// Kind of a derived interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalKind {
    WholeVideo,
    Period,
    CleanPlay,
    Score,
    Penalty,
    NumericStrength,
    /// Record written by an older tool version; replaced on the next derivation
    #[serde(other)]
    Unknown,
}

impl fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntervalKind::WholeVideo => "WholeVideo",
            IntervalKind::Period => "Period",
            IntervalKind::CleanPlay => "CleanPlay",
            IntervalKind::Score => "Score",
            IntervalKind::Penalty => "Penalty",
            IntervalKind::NumericStrength => "NumericStrength",
            IntervalKind::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

/// Penalised player active during a numeric-strength window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePenalty {
    pub team: String,
    pub player_name: String,
    #[serde(alias = "player_id_fhm")]
    pub player_id: String,
    pub violation_type: String,
}

/// Kind-specific payload of a derived interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntervalContext {
    Strength { active_penalties: Vec<ActivePenalty> },
    Penalty(PenaltyContext),
}

/// Derived, reproducible time range in raw video time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub id: String,
    pub name: String,
    #[serde(alias = "label_type")]
    pub kind: IntervalKind,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub source_label_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<IntervalContext>,
}

impl Interval {
    /// Create an interval with a fresh id
    pub fn new(name: impl Into<String>, kind: IntervalKind, start_time: f64, end_time: f64) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            kind,
            start_time,
            end_time,
            source_label_ids: Vec::new(),
            context: None,
        }
    }

    pub fn with_sources(mut self, ids: Vec<String>) -> Self {
        self.source_label_ids = ids;
        self
    }

    pub fn with_context(mut self, context: IntervalContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Closed-span containment, as used for period membership
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time
    }

    pub fn contains_span(&self, start: f64, end: f64) -> bool {
        self.contains(start) && self.contains(end)
    }

    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        !(end <= self.start_time || start >= self.end_time)
    }

    pub fn penalty_context(&self) -> Option<&PenaltyContext> {
        match &self.context {
            Some(IntervalContext::Penalty(ctx)) => Some(ctx),
            _ => None,
        }
    }

    pub fn active_penalties(&self) -> &[ActivePenalty] {
        match &self.context {
            Some(IntervalContext::Strength { active_penalties }) => active_penalties,
            _ => &[],
        }
    }
}

/// Intervals of one kind, in input order
pub fn of_kind(intervals: &[Interval], kind: IntervalKind) -> impl Iterator<Item = &Interval> {
    intervals.iter().filter(move |interval| interval.kind == kind)
}

/// One continuous stay on the ice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerShift {
    /// 1-based, sequential per player
    pub number: u32,
    pub start_time: f64,
    pub end_time: f64,
}

impl PlayerShift {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerShiftInfo {
    #[serde(alias = "id_fhm")]
    pub player_id: String,
    pub name: String,
    #[serde(default)]
    pub shifts: Vec<PlayerShift>,
}

impl PlayerShiftInfo {
    pub fn new(player_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            shifts: Vec::new(),
        }
    }

    /// Total time on ice across all shifts
    pub fn total_time(&self) -> f64 {
        self.shifts.iter().map(PlayerShift::duration).sum()
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    })
}

/// Roster entry as delivered by the lineup collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    #[serde(default, alias = "id_fhm")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub number: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub lineup_group: String,
    #[serde(default)]
    pub lineup_position: String,
    #[serde(flatten)]
    pub extra: Context,
}
