//! Free-text form field checks shared by the save route and record building.

/// Patient identifiers: 1-64 characters, no control characters.
pub fn validate_patient_id(patient_id: &str) -> Result<(), &'static str> {
    let char_count = patient_id.chars().count();
    if char_count == 0 {
        return Err("Patient_ID must not be empty");
    }
    if char_count > 64 {
        return Err("Patient_ID must be at most 64 characters");
    }
    if patient_id.chars().any(|c| c.is_control()) {
        return Err("Patient_ID must not contain control characters");
    }
    Ok(())
}

/// Upload size guard applied before decoding.
pub fn validate_upload_size(len: usize, max_bytes: usize) -> Result<(), String> {
    if len == 0 {
        return Err("uploaded photo is empty".to_string());
    }
    if len > max_bytes {
        return Err(format!(
            "uploaded photo is {len} bytes, limit is {max_bytes} bytes"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_patient_id_accepted() {
        assert!(validate_patient_id("P01").is_ok());
    }

    #[test]
    fn patient_id_with_comma_accepted() {
        // CSV quoting takes care of separators
        assert!(validate_patient_id("Doe, J.").is_ok());
    }

    #[test]
    fn empty_patient_id_rejected() {
        assert!(validate_patient_id("").is_err());
    }

    #[test]
    fn long_patient_id_rejected() {
        assert!(validate_patient_id(&"x".repeat(65)).is_err());
        assert!(validate_patient_id(&"x".repeat(64)).is_ok());
    }

    #[test]
    fn unicode_patient_id_counts_characters() {
        assert!(validate_patient_id(&"é".repeat(64)).is_ok());
    }

    #[test]
    fn control_characters_rejected() {
        assert!(validate_patient_id("P01\nP02").is_err());
    }

    #[test]
    fn upload_size_bounds() {
        assert!(validate_upload_size(0, 10).is_err());
        assert!(validate_upload_size(10, 10).is_ok());
        assert!(validate_upload_size(11, 10).is_err());
    }
}
