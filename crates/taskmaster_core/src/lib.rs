pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod logging;
pub mod model;
pub mod notify;
pub mod storage;
pub mod task_store;
pub mod view;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::Task;

    #[test]
    fn task_serializes_with_camel_case_timestamp() {
        let task = Task {
            id: 1_766_219_400_000,
            text: "demo".to_string(),
            completed: false,
            created_at: "2025-12-20T00:00:00Z".to_string(),
        };

        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["createdAt"], "2025-12-20T00:00:00Z");
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_input("missing text");
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(err.to_string(), "invalid_input - missing text");
    }
}
