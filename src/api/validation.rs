use super::ApiError;

pub fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_rating(rating: i32) -> Result<i32, ApiError> {
    const MIN_RATING: i32 = 0;
    const MAX_RATING: i32 = 10;

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ApiError::validation(format!(
            "Invalid rating: {}. Rating must be between {} and {}",
            rating, MIN_RATING, MAX_RATING
        )));
    }
    Ok(rating)
}

pub fn validate_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Name cannot be empty"));
    }
    Ok(trimmed)
}

/// Presence check for request-body fields; absence is a bad request, not a
/// deserialization failure.
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::validation(format!("Missing required field: {field}")))
}
