//! Backend job records and their mapping onto [`JobStatus`].

use chrono::{DateTime, Utc};
use neuroscan_core::{JobId, OwnerId};
use neuroscan_poller::JobStatus;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Message used when the backend marks a job failed without saying why.
pub const DEFAULT_FAILURE_MESSAGE: &str = "job failed";

/// A scan-analysis job as stored by the backend.
///
/// `status` is kept as the raw wire string; use [`ScanJob::status`] to
/// interpret it.
///
/// Decoding accepts `id`, `_id` or both (preferring `id`). An `ownerId` that
/// is not a valid [`OwnerId`] is dropped rather than failing the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireScanJob<T>")]
pub struct ScanJob<T> {
    pub id: JobId,
    pub status: String,
    pub owner_id: Option<OwnerId>,
    pub file_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub result: Option<T>,
    pub error_message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireScanJob<T> {
    id: Option<String>,
    #[serde(rename = "_id")]
    mongo_id: Option<String>,
    status: String,
    owner_id: Option<String>,
    file_name: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    result: Option<T>,
    error_message: Option<String>,
}

impl<T> TryFrom<WireScanJob<T>> for ScanJob<T> {
    type Error = String;

    fn try_from(wire: WireScanJob<T>) -> Result<Self, Self::Error> {
        let id = wire
            .id
            .or(wire.mongo_id)
            .ok_or("job record has neither `id` nor `_id`")?;
        let id = JobId::new(id).map_err(|e| e.to_string())?;

        let owner_id = wire.owner_id.and_then(|raw| match OwnerId::new(raw) {
            Ok(owner) => Some(owner),
            Err(e) => {
                tracing::debug!(job_id = %id, error = %e, "ignoring malformed ownerId");
                None
            }
        });

        Ok(Self {
            id,
            status: wire.status,
            owner_id,
            file_name: wire.file_name,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            result: wire.result,
            error_message: wire.error_message,
        })
    }
}

impl<T> ScanJob<T> {
    /// Interpret the record as a [`JobStatus`].
    ///
    /// Status names are matched case-insensitively. Anything else is an
    /// [`ApiError::UnknownStatus`], as is `completed` without a `result`
    /// ([`ApiError::MissingResult`]); the poller treats both as transport
    /// failures rather than polling forever.
    pub fn status(self) -> Result<JobStatus<T>, ApiError> {
        let raw = self.status.trim();
        if raw.eq_ignore_ascii_case("pending") {
            Ok(JobStatus::Pending)
        } else if raw.eq_ignore_ascii_case("processing") {
            Ok(JobStatus::Processing)
        } else if raw.eq_ignore_ascii_case("completed") {
            self.result
                .map(JobStatus::Completed)
                .ok_or(ApiError::MissingResult(self.id))
        } else if raw.eq_ignore_ascii_case("failed") {
            Ok(JobStatus::Failed(
                self.error_message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            ))
        } else {
            Err(ApiError::UnknownStatus(self.status))
        }
    }
}

/// MIME type for an uploaded scan, from its file extension.
pub fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "dcm" | "dicom" => "application/dicom",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn record(v: Value) -> ScanJob<Value> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn decodes_camel_case_record() {
        let job = record(json!({
            "_id": "6650a1",
            "status": "pending",
            "ownerId": "patient-7",
            "fileName": "flair.png",
            "createdAt": "2024-05-24T10:00:00Z"
        }));
        assert_eq!(job.id.as_str(), "6650a1");
        assert_eq!(job.owner_id.as_ref().map(OwnerId::as_str), Some("patient-7"));
        assert_eq!(job.file_name.as_deref(), Some("flair.png"));
        assert!(job.created_at.is_some());
        assert_eq!(job.status().unwrap(), JobStatus::Pending);
    }

    #[test]
    fn both_ids_prefer_id() {
        let job = record(json!({ "_id": "6650a1", "id": "scan-9", "status": "pending" }));
        assert_eq!(job.id.as_str(), "scan-9");

        let job = record(json!({ "_id": "6650a1", "id": "6650a1", "status": "pending" }));
        assert_eq!(job.id.as_str(), "6650a1");
    }

    #[test]
    fn record_without_any_id_is_rejected() {
        let err = serde_json::from_value::<ScanJob<Value>>(json!({ "status": "pending" }))
            .unwrap_err();
        assert!(err.to_string().contains("neither `id` nor `_id`"), "{err}");
    }

    #[test]
    fn malformed_owner_does_not_fail_the_record() {
        let job = record(json!({ "id": "j1", "status": "processing", "ownerId": "a/b" }));
        assert!(job.owner_id.is_none());
        assert_eq!(job.status().unwrap(), JobStatus::Processing);

        let job = record(json!({ "id": "j1", "status": "pending", "ownerId": "  " }));
        assert!(job.owner_id.is_none());
    }

    #[test]
    fn serializes_back_with_plain_id() {
        let job = record(json!({ "_id": "6650a1", "status": "pending", "fileName": "t1.dcm" }));
        let v = serde_json::to_value(&job).unwrap();
        assert_eq!(v["id"], "6650a1");
        assert_eq!(v["fileName"], "t1.dcm");
        assert_eq!(record(v), job);
    }

    #[test]
    fn completed_carries_result() {
        let job = record(json!({
            "id": "j1",
            "status": "completed",
            "result": { "prediction": "meningioma", "confidence": 0.91 }
        }));
        assert_eq!(
            job.status().unwrap(),
            JobStatus::Completed(json!({ "prediction": "meningioma", "confidence": 0.91 }))
        );
    }

    #[test]
    fn completed_without_result_is_a_protocol_error() {
        let job = record(json!({ "id": "j1", "status": "completed", "result": null }));
        assert!(matches!(job.status(), Err(ApiError::MissingResult(id)) if id.as_str() == "j1"));
    }

    #[test]
    fn failed_uses_error_message_or_default() {
        let job = record(json!({ "id": "j1", "status": "failed", "errorMessage": "bad scan" }));
        assert_eq!(job.status().unwrap(), JobStatus::Failed("bad scan".into()));

        let job = record(json!({ "id": "j1", "status": "FAILED" }));
        assert_eq!(job.status().unwrap(), JobStatus::Failed(DEFAULT_FAILURE_MESSAGE.into()));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(guess_mime("scan.PNG"), "image/png");
        assert_eq!(guess_mime("scan.jpeg"), "image/jpeg");
        assert_eq!(guess_mime("series.dcm"), "application/dicom");
        assert_eq!(guess_mime("README"), "application/octet-stream");
    }

    proptest! {
        /// Any status outside the four known names is rejected, never mapped.
        #[test]
        fn unknown_statuses_are_rejected(raw in "[a-z_]{1,16}") {
            prop_assume!(!["pending", "processing", "completed", "failed"].contains(&raw.as_str()));
            let job: ScanJob<Value> = ScanJob {
                id: JobId::new("j").unwrap(),
                status: raw.clone(),
                owner_id: None,
                file_name: None,
                created_at: None,
                updated_at: None,
                result: Some(json!(1)),
                error_message: None,
            };
            prop_assert!(matches!(job.status(), Err(ApiError::UnknownStatus(s)) if s == raw));
        }
    }
}
