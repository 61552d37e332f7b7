// Job preconditions checked before any leaf call

use crate::domain::FaxJob;
use crate::error::{FaxError, Result};

/// Submit precondition: target address and a non-empty regular file
pub async fn validate_submit(job: &FaxJob) -> Result<()> {
    let has_target = job
        .target_address
        .as_deref()
        .is_some_and(|address| !address.trim().is_empty());
    if !has_target {
        return Err(FaxError::Validation(
            "Fax job target address not provided.".to_string(),
        ));
    }

    let path = job
        .file_path()
        .ok_or_else(|| FaxError::Validation("Fax job file not provided.".to_string()))?;

    let metadata = tokio::fs::metadata(path).await.map_err(|_| {
        FaxError::Validation(format!("Fax job file: {} does not exist.", path.display()))
    })?;
    if !metadata.is_file() {
        return Err(FaxError::Validation(format!(
            "Fax job file: {} is not a file.",
            path.display()
        )));
    }
    if metadata.len() == 0 {
        return Err(FaxError::Validation(format!(
            "Fax job file: {} is empty.",
            path.display()
        )));
    }

    Ok(())
}

/// Suspend/resume/cancel/status precondition
pub fn validate_job_id(job: &FaxJob) -> Result<()> {
    if job.id.trim().is_empty() {
        return Err(FaxError::Validation("Fax job ID not provided.".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn message(err: FaxError) -> String {
        match err {
            FaxError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_target_address() {
        let job = FaxJob::new();
        let err = validate_submit(&job).await.unwrap_err();
        assert_eq!(message(err), "Fax job target address not provided.");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let mut job = FaxJob::new();
        job.target_address = Some("555-0100".to_string());

        let err = validate_submit(&job).await.unwrap_err();
        assert_eq!(message(err), "Fax job file not provided.");
    }

    #[tokio::test]
    async fn test_file_checks() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = FaxJob::new();
        job.target_address = Some("555-0100".to_string());

        job.set_file_path(dir.path().join("missing.pdf"));
        assert!(message(validate_submit(&job).await.unwrap_err()).ends_with("does not exist."));

        job.set_file_path(dir.path());
        assert!(message(validate_submit(&job).await.unwrap_err()).ends_with("is not a file."));

        let empty = dir.path().join("empty.pdf");
        std::fs::File::create(&empty).unwrap();
        job.set_file_path(&empty);
        assert!(message(validate_submit(&job).await.unwrap_err()).ends_with("is empty."));

        let full = dir.path().join("full.pdf");
        std::fs::File::create(&full).unwrap().write_all(b"%PDF").unwrap();
        job.set_file_path(&full);
        tokio_test::assert_ok!(validate_submit(&job).await);
    }

    #[test]
    fn test_job_id_required() {
        let mut job = FaxJob::new();
        assert_eq!(message(validate_job_id(&job).unwrap_err()), "Fax job ID not provided.");

        job.id = "  ".to_string();
        assert!(validate_job_id(&job).is_err());

        job.id = "12".to_string();
        assert!(validate_job_id(&job).is_ok());
    }
}
