use thiserror::Error;

/// Reasons a proposed reservation slot is rejected, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotViolation {
    #[error("The entered time must be greater than the current one")]
    PastStart,

    #[error("The entered time must be greater than the start")]
    InvertedInterval,

    #[error("The duration of the reservation cannot exceed 30 minutes")]
    DurationExceeded,

    #[error("The reservation for the entered time already exists")]
    Conflict,
}

impl SlotViolation {
    /// Request field the violation is attributed to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::PastStart => Some("start"),
            Self::InvertedInterval => Some("end"),
            Self::DurationExceeded | Self::Conflict => None,
        }
    }

    /// Stable label used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PastStart => "past_start",
            Self::InvertedInterval => "inverted_interval",
            Self::DurationExceeded => "duration_exceeded",
            Self::Conflict => "conflict",
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} with {field}: {value} not found")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error(transparent)]
    Slot(#[from] SlotViolation),

    #[error("Reservation with id: {reservation_id} belongs to another user")]
    Ownership { reservation_id: i32 },

    #[error("Already exists: {0}")]
    UniqueViolation(String),

    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_violations_map_to_fields() {
        assert_eq!(SlotViolation::PastStart.field(), Some("start"));
        assert_eq!(SlotViolation::InvertedInterval.field(), Some("end"));
        assert_eq!(SlotViolation::DurationExceeded.field(), None);
        assert_eq!(SlotViolation::Conflict.field(), None);
    }

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = DomainError::not_found("Reservation", 7);
        assert_eq!(err.to_string(), "Reservation with id: 7 not found");
    }

    #[test]
    fn slot_violation_converts_into_domain_error() {
        let err: DomainError = SlotViolation::Conflict.into();
        assert!(matches!(err, DomainError::Slot(SlotViolation::Conflict)));
        assert_eq!(
            err.to_string(),
            "The reservation for the entered time already exists"
        );
    }
}
