use crate::errors::ServiceError;
use serde::de::DeserializeOwned;

#[derive(Deserialize)]
pub struct Validator<T>(T);

pub trait Validate<T> {
    fn validate(&self) -> Result<(), ServiceError>;
}

impl<T> Validator<T> {
    pub fn new(i: T) -> Validator<T> {
        Validator::<T>(i)
    }
}

impl<T> Validator<T>
where
    T: Validate<T>,
    T: DeserializeOwned,
{
    pub fn validate(self) -> Result<T, ServiceError> {
        self.0.validate()?;
        Ok(self.0)
    }
}

/// Slots and blackouts both describe a window of whole hours on a single
/// day: `start` and `end` within [0, 23], end strictly after start.
pub fn validate_hour_range(start: i16, end: i16) -> Result<(), ServiceError> {
    if !(0..=23).contains(&start) {
        bad_request!("start hour must be between 0 and 23");
    }

    if !(0..=23).contains(&end) {
        bad_request!("end hour must be between 0 and 23");
    }

    if end <= start {
        bad_request!("end hour must be greater than start hour");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Validate<bool> for bool {
        fn validate(&self) -> Result<(), ServiceError> {
            if *self {
                return Ok(());
            }
            Err(ServiceError::BadRequest("invalid input".to_string()))
        }
    }

    #[test]
    fn invalid_value() {
        let invalid = Validator::new(false);

        assert!(invalid.validate().is_err());
    }

    #[test]
    fn valid_value() {
        let valid = Validator::new(true);

        assert!(valid.validate().is_ok());
    }

    #[test]
    fn hour_ranges() {
        assert!(validate_hour_range(9, 11).is_ok());
        assert!(validate_hour_range(0, 23).is_ok());

        // zero-width and inverted windows
        assert!(validate_hour_range(9, 9).is_err());
        assert!(validate_hour_range(11, 9).is_err());

        // out of the day
        assert!(validate_hour_range(-1, 9).is_err());
        assert!(validate_hour_range(9, 24).is_err());
    }
}
