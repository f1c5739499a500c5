use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// Reference to the task a time entry is booked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One tracked interval.
///
/// ClickUp encodes `start`, `end` and `duration` as decimal strings holding
/// milliseconds; plain numbers are accepted as well. A running entry has no
/// `end` and a negative `duration`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: String,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub start: i64,
    #[serde_as(as = "Option<PickFirst<(DisplayFromStr, _)>>")]
    pub end: Option<i64>,
    #[serde_as(as = "Option<PickFirst<(DisplayFromStr, _)>>")]
    pub duration: Option<i64>,
    #[serde(default)]
    pub task: Option<TaskRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub billable: bool,
}

impl TimeEntry {
    pub fn task_id(&self) -> Option<&str> {
        self.task
            .as_ref()
            .map(|task| task.id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none() || self.duration.is_some_and(|duration| duration < 0)
    }
}

/// Body of `POST /team/{team_id}/time_entries/start`.
///
/// `tid` is left out of the JSON entirely when no task is given; ClickUp
/// treats a missing field differently from an empty one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartTimeEntryPayload {
    pub description: String,
    pub billable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,
}

impl StartTimeEntryPayload {
    pub fn new(task_id: Option<&str>, description: Option<&str>) -> Self {
        Self {
            description: description.unwrap_or_default().to_string(),
            billable: false,
            tid: task_id.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn running_entry_decodes_string_timestamps() {
        let entry: TimeEntry = serde_json::from_value(json!({
            "id": "3959520840960386042",
            "task": { "id": "86a1b2c3", "name": "Write docs", "status": {} },
            "wid": "9001",
            "billable": false,
            "start": "1718000000000",
            "duration": "-1718000000000",
            "description": ""
        }))
        .unwrap();

        assert_eq!(entry.start, 1_718_000_000_000);
        assert_eq!(entry.task_id(), Some("86a1b2c3"));
        assert!(entry.is_running());
    }

    #[test]
    fn stopped_entry_with_numeric_fields() {
        let entry: TimeEntry = serde_json::from_value(json!({
            "id": "1",
            "start": 1718000000000_i64,
            "end": 1718000060000_i64,
            "duration": 60000
        }))
        .unwrap();

        assert!(!entry.is_running());
        assert_eq!(entry.task_id(), None);
    }

    #[test]
    fn start_payload_omits_missing_task() {
        let payload = serde_json::to_value(StartTimeEntryPayload::new(None, None)).unwrap();
        assert_eq!(payload, json!({ "description": "", "billable": false }));
    }

    #[test]
    fn start_payload_includes_task_and_description() {
        let payload =
            serde_json::to_value(StartTimeEntryPayload::new(Some("86a1b2c3"), Some("review")))
                .unwrap();
        assert_eq!(
            payload,
            json!({ "description": "review", "billable": false, "tid": "86a1b2c3" })
        );
    }
}
