use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::SessionRecord;

/// Any JSON scalar the upstream API may put where text is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Integer(i64),
    Float(f64),
    Other(IgnoredAny),
}

impl Loose {
    fn into_text(self) -> String {
        match self {
            Loose::Text(text) => text,
            Loose::Integer(number) => number.to_string(),
            Loose::Float(number) => number.to_string(),
            Loose::Other(_) => String::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseList {
    Items(Vec<Loose>),
    Single(Loose),
}

impl LooseList {
    fn into_texts(self) -> Vec<String> {
        let items = match self {
            LooseList::Items(items) => items,
            LooseList::Single(item) => vec![item],
        };

        items
            .into_iter()
            .map(Loose::into_text)
            .filter(|text| !text.is_empty())
            .collect()
    }
}

/// Wire shape of a session. Nulls, numbers and other stray values turn into
/// empty or stringified fields, so a bad field only fails the parse of that
/// field and never the whole record.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawSessionRecord {
    id: Option<Loose>,
    #[serde(rename = "_id")]
    object_id: Option<Loose>,
    kind: Option<Loose>,
    title: Option<Loose>,
    session_days: Option<LooseList>,
    start_date: Option<Loose>,
    end_date: Option<Loose>,
    start_time: Option<Loose>,
    end_time: Option<Loose>,
}

fn text(value: Option<Loose>) -> String {
    value.map(Loose::into_text).unwrap_or_default()
}

impl From<RawSessionRecord> for SessionRecord {
    fn from(raw: RawSessionRecord) -> Self {
        let id = match text(raw.id) {
            id if id.is_empty() => text(raw.object_id),
            id => id,
        };

        SessionRecord {
            id,
            kind: text(raw.kind),
            title: text(raw.title),
            session_days: raw
                .session_days
                .map(LooseList::into_texts)
                .unwrap_or_default(),
            start_date: text(raw.start_date),
            end_date: text(raw.end_date),
            start_time: text(raw.start_time),
            end_time: text(raw.end_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::{layout_day, month_view, LayoutConfig, SessionRecord};

    fn decode(value: serde_json::Value) -> SessionRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn null_times_keep_the_record_on_the_grid() {
        let session = decode(json!({
            "_id": "x",
            "sessionDays": ["Mon"],
            "startDate": "2025-01-01",
            "endDate": "2025-01-31",
            "startTime": null,
            "endTime": null
        }));
        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let sessions = vec![session];

        let view = month_view(monday, monday, &sessions);
        let cell = view.cells.iter().find(|cell| cell.date == monday).unwrap();
        assert_eq!(cell.count, 1);
        assert_eq!(cell.events[0].id, "x");

        assert!(layout_day(&sessions, &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn numbers_and_stray_values_become_text() {
        let session = decode(json!({
            "id": 17,
            "title": null,
            "sessionDays": ["Mon", null, 3],
            "startDate": "2025-01-01",
            "endDate": false,
            "startTime": 9,
            "endTime": { "hours": 10 }
        }));

        assert_eq!(session.id, "17");
        assert_eq!(session.title, "");
        assert_eq!(session.session_days, vec!["Mon", "3"]);
        assert_eq!(session.end_date, "");
        assert_eq!(session.start_time, "9");
        assert_eq!(session.end_time, "");
        assert!(session.schedule().is_none());
    }

    #[test]
    fn id_wins_over_object_id() {
        let session = decode(json!({ "id": "public", "_id": "64f0" }));
        assert_eq!(session.id, "public");

        let session = decode(json!({ "id": null, "_id": "64f0" }));
        assert_eq!(session.id, "64f0");
    }

    #[test]
    fn single_weekday_and_null_list() {
        let session = decode(json!({ "sessionDays": "Fri" }));
        assert_eq!(session.session_days, vec!["Fri"]);

        let session = decode(json!({ "sessionDays": null }));
        assert!(session.session_days.is_empty());
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(serde_json::from_value::<SessionRecord>(json!("not an object")).is_err());
    }
}
