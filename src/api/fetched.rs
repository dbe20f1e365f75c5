//! Outcome of a tutor API call

use super::error::ApiError;

/// Result of fetching a resource from the backend
///
/// Separates "the server has nothing for us" from "the request failed" so
/// views can render the two differently.
#[derive(Debug)]
pub enum Fetched<T> {
    /// Request succeeded and returned content
    Data(T),
    /// Request succeeded but there is nothing to show
    NoData,
    /// Network error, non-success status or malformed body
    Failed(ApiError),
}

impl<T> Fetched<T> {
    /// Classify a single-record response; a 404 counts as no data
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Fetched::Data(value),
            Err(e) if e.is_not_found() => Fetched::NoData,
            Err(e) => Fetched::Failed(e),
        }
    }

    /// Get the data, if any
    pub fn data(&self) -> Option<&T> {
        match self {
            Fetched::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Get the failure, if any
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Fetched::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Fetched::Failed(_))
    }

    /// Collapse to the data, treating no-data and failure alike
    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Data(value) => Some(value),
            Fetched::NoData | Fetched::Failed(_) => None,
        }
    }

}

impl<T> Fetched<Vec<T>> {
    /// Classify a list response; an empty list or a 404 counts as no data
    pub fn from_list(result: Result<Vec<T>, ApiError>) -> Self {
        match Fetched::from_result(result) {
            Fetched::Data(items) if items.is_empty() => Fetched::NoData,
            other => other,
        }
    }

    /// Collapse to a list, empty on no-data or failure
    pub fn into_vec(self) -> Vec<T> {
        self.into_option().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error() -> ApiError {
        ApiError::Status { status: 500, message: "boom".into() }
    }

    #[test]
    fn empty_list_is_no_data() {
        let fetched: Fetched<Vec<u8>> = Fetched::from_list(Ok(Vec::new()));
        assert!(matches!(fetched, Fetched::NoData));
    }

    #[test]
    fn non_empty_list_is_data() {
        let fetched = Fetched::from_list(Ok(vec![1, 2]));
        assert_eq!(fetched.data(), Some(&vec![1, 2]));
    }

    #[test]
    fn not_found_is_no_data() {
        let fetched: Fetched<u8> =
            Fetched::from_result(Err(ApiError::Status { status: 404, message: String::new() }));
        assert!(matches!(fetched, Fetched::NoData));
    }

    #[test]
    fn server_error_is_failed() {
        let fetched: Fetched<u8> = Fetched::from_result(Err(server_error()));
        assert!(fetched.is_failed());
        assert!(fetched.error().is_some());
    }

    #[test]
    fn failed_list_collapses_to_empty() {
        let fetched: Fetched<Vec<u8>> = Fetched::from_list(Err(server_error()));
        assert!(fetched.into_vec().is_empty());
    }

    #[test]
    fn failed_record_collapses_to_none() {
        let fetched: Fetched<u8> = Fetched::from_result(Err(server_error()));
        assert_eq!(fetched.into_option(), None);
    }
}
