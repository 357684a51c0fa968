use serde::Serialize;
use serde_json::Value;

/// Placeholder shown wherever a nested path is absent from a record.
pub const PLACEHOLDER: &str = "-";

/// Column headers, in the fixed order used for both the terminal table
/// and the exported sheet.
pub const COLUMNS: [&str; 14] = [
    "Mode",
    "Type",
    "Activity ID",
    "Subject",
    "Assigned to",
    "Created on",
    "Due on",
    "Priority",
    "Substatus",
    "Case ID",
    "Queue name",
    "Department name",
    "Reason for last action",
    "Contact point",
];

/// One activity flattened for display and export. Every field falls
/// back to the placeholder independently; a record with no
/// recognizable structure still yields a full row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRow {
    pub mode: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub id: String,
    pub subject: String,
    pub assigned_to: String,
    pub created_on: String,
    pub due_on: String,
    pub priority: String,
    pub substatus: String,
    pub case_id: String,
    pub queue_name: String,
    pub department_name: String,
    pub last_action_reason: String,
    pub contact_point: String,
}

impl ActivityRow {
    pub fn from_record(record: &Value) -> Self {
        let customer_name = display_at(record, "/customer/customerName");
        let contact_email = display_at(
            record,
            "/customer/contactPersons/contactPerson/0/contactPoints/contactPoint/0/type/email/emailAddress",
        );

        Self {
            mode: display_at(record, "/mode/value"),
            activity_type: display_at(record, "/type/displayValue"),
            id: display_at(record, "/id"),
            subject: display_at(record, "/subject"),
            assigned_to: display_at(record, "/status/assigned/user/name"),
            created_on: display_at(record, "/created/date"),
            due_on: display_at(record, "/lastModified/date"),
            priority: display_at(record, "/priority"),
            substatus: display_at(record, "/status/substatus/displayValue"),
            case_id: display_at(record, "/case/id"),
            queue_name: display_at(record, "/queue/name"),
            department_name: display_at(record, "/department/name"),
            last_action_reason: display_at(record, "/status/activityFolder/name/displayValue"),
            contact_point: format!("{customer_name} | {contact_email}"),
        }
    }

    /// Cell values in `COLUMNS` order.
    pub fn values(&self) -> [&str; 14] {
        [
            &self.mode,
            &self.activity_type,
            &self.id,
            &self.subject,
            &self.assigned_to,
            &self.created_on,
            &self.due_on,
            &self.priority,
            &self.substatus,
            &self.case_id,
            &self.queue_name,
            &self.department_name,
            &self.last_action_reason,
            &self.contact_point,
        ]
    }
}

/// Walk a JSON pointer and render the leaf as display text. Missing
/// segments, nulls, and non-scalar leaves all degrade to the
/// placeholder; ids may arrive as numbers, so those are stringified.
fn display_at(record: &Value, pointer: &str) -> String {
    match record.pointer(pointer) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> Value {
        json!({
            "id": 4217,
            "subject": "Refund request",
            "mode": { "value": "Inbound" },
            "type": { "value": "email", "displayValue": "Email" },
            "priority": 3,
            "created": { "date": "2024-05-01T09:30:00.000Z" },
            "lastModified": { "date": "2024-05-02T10:00:00.000Z" },
            "status": {
                "assigned": { "user": { "name": "jdoe" } },
                "substatus": { "displayValue": "Assigned-In Progress" },
                "activityFolder": { "name": { "displayValue": "Pulled" } }
            },
            "case": { "id": "1042" },
            "queue": { "name": "Billing" },
            "department": { "name": "Service" },
            "customer": {
                "customerName": "Ada Lovelace",
                "contactPersons": {
                    "contactPerson": [{
                        "contactPoints": {
                            "contactPoint": [{
                                "type": { "email": { "emailAddress": "ada@example.com" } }
                            }]
                        }
                    }]
                }
            }
        })
    }

    #[test]
    fn full_record_maps_every_field() {
        let row = ActivityRow::from_record(&sample_record());
        assert_eq!(row.mode, "Inbound");
        assert_eq!(row.activity_type, "Email");
        assert_eq!(row.id, "4217");
        assert_eq!(row.subject, "Refund request");
        assert_eq!(row.assigned_to, "jdoe");
        assert_eq!(row.created_on, "2024-05-01T09:30:00.000Z");
        assert_eq!(row.due_on, "2024-05-02T10:00:00.000Z");
        assert_eq!(row.priority, "3");
        assert_eq!(row.substatus, "Assigned-In Progress");
        assert_eq!(row.case_id, "1042");
        assert_eq!(row.queue_name, "Billing");
        assert_eq!(row.department_name, "Service");
        assert_eq!(row.last_action_reason, "Pulled");
        assert_eq!(row.contact_point, "Ada Lovelace | ada@example.com");
    }

    #[test]
    fn missing_status_subtree_degrades_only_status_fields() {
        let mut record = sample_record();
        record.as_object_mut().unwrap().remove("status");

        let row = ActivityRow::from_record(&record);
        assert_eq!(row.assigned_to, PLACEHOLDER);
        assert_eq!(row.substatus, PLACEHOLDER);
        assert_eq!(row.last_action_reason, PLACEHOLDER);
        // Unrelated paths are unaffected.
        assert_eq!(row.mode, "Inbound");
        assert_eq!(row.activity_type, "Email");
        assert_eq!(row.subject, "Refund request");
    }

    #[test]
    fn unrecognizable_record_is_all_placeholders() {
        let row = ActivityRow::from_record(&json!({}));
        for value in row.values() {
            if value == format!("{PLACEHOLDER} | {PLACEHOLDER}") {
                continue;
            }
            assert_eq!(value, PLACEHOLDER);
        }
        assert_eq!(row.contact_point, "- | -");
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let record = sample_record();
        assert_eq!(
            ActivityRow::from_record(&record),
            ActivityRow::from_record(&record)
        );
    }

    #[test]
    fn values_follow_column_order() {
        let row = ActivityRow::from_record(&sample_record());
        let values = row.values();
        assert_eq!(values.len(), COLUMNS.len());
        assert_eq!(values[COLUMNS.iter().position(|c| *c == "Mode").unwrap()], "Inbound");
        assert_eq!(
            values[COLUMNS.iter().position(|c| *c == "Contact point").unwrap()],
            "Ada Lovelace | ada@example.com"
        );
    }

    #[test]
    fn missing_customer_still_renders_contact_separator() {
        let mut record = sample_record();
        record.as_object_mut().unwrap().remove("customer");
        let row = ActivityRow::from_record(&record);
        assert_eq!(row.contact_point, "- | -");
    }
}
