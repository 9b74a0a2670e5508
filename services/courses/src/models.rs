//! API models for request and response payloads

use serde::{Deserialize, Serialize, Serializer};

/// Largest magnitude at which every integer is exactly representable in an `f64`
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Course entity as stored in the `courses` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: f64,
    pub instructor: String,
}

/// The four mutable fields of a course, used for both create and update
#[derive(Debug, Clone, PartialEq)]
pub struct CourseInput {
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub instructor: String,
}

impl Course {
    /// Whether this course carries exactly the given field values
    pub fn matches(&self, input: &CourseInput) -> bool {
        self.title == input.title
            && self.description == input.description
            && self.duration == input.duration
            && self.instructor == input.instructor
    }
}

/// Query parameters for course listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseQuery {
    /// Case-insensitive substring the title must contain
    pub title: Option<String>,
}

/// Request for user login
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Integral durations go out as JSON integers (`5`, not `5.0`)
fn serialize_duration<S>(duration: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if duration.fract() == 0.0 && duration.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*duration as i64)
    } else {
        serializer.serialize_f64(*duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course(duration: f64) -> Course {
        Course {
            id: 1,
            title: "T".to_string(),
            description: "D".to_string(),
            duration,
            instructor: "I".to_string(),
        }
    }

    #[test]
    fn test_integral_duration_serializes_as_integer() {
        let value = serde_json::to_value(course(5.0)).unwrap();
        assert_eq!(
            value,
            json!({"id": 1, "title": "T", "description": "D", "duration": 5, "instructor": "I"})
        );
    }

    #[test]
    fn test_fractional_duration_serializes_as_float() {
        let value = serde_json::to_value(course(1.5)).unwrap();
        assert_eq!(value["duration"], json!(1.5));
    }

    #[test]
    fn test_course_deserializes_integer_duration() {
        let parsed: Course = serde_json::from_value(
            json!({"id": 3, "title": "T", "description": "D", "duration": 10, "instructor": "I"}),
        )
        .unwrap();
        assert_eq!(parsed.duration, 10.0);
    }
}
