//! Operation status returned by every controller request
//!
//! Connection failures, controller errors and missing data are all reported
//! as a [`Status`] inside an [`Outcome`], never as a Rust error.

use std::fmt;

use crate::controller::HttpResponse;

/// Outcome category of one controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    /// No response at all (connection refused, timeout, ...)
    ConnError,
    /// A response with no body
    CtrlInternalError,
    /// A non-200 HTTP status; the raw response is attached
    HttpError,
    /// The response parsed but the expected key path was missing
    DataNotFound,
    /// The caller's input or the controller's document could not be used
    MalformData,
}

impl Status {
    pub fn brief(&self) -> &'static str {
        match self {
            Status::Ok => "Success",
            Status::ConnError => "Server connection error",
            Status::CtrlInternalError => "Internal server error",
            Status::HttpError => "HTTP error",
            Status::DataNotFound => "Requested data not found",
            Status::MalformData => "Malformed data",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.brief())
    }
}

/// Status plus the raw response for HTTP errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperStatus {
    status: Status,
    response: Option<HttpResponse>,
}

impl OperStatus {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            response: None,
        }
    }

    pub fn ok() -> Self {
        Self::new(Status::Ok)
    }

    pub fn http_error(response: HttpResponse) -> Self {
        Self {
            status: Status::HttpError,
            response: Some(response),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is(&self, status: Status) -> bool {
        self.status == status
    }

    pub fn is_ok(&self) -> bool {
        self.is(Status::Ok)
    }

    /// Raw controller response, kept for HTTP errors
    pub fn response(&self) -> Option<&HttpResponse> {
        self.response.as_ref()
    }

    /// Human-readable description including the HTTP code and body, if any
    pub fn detailed(&self) -> String {
        match &self.response {
            Some(resp) => format!(
                "{} (code {}): {}",
                self.status.brief(),
                resp.status_code,
                resp.content.as_deref().unwrap_or("")
            ),
            None => self.status.brief().to_string(),
        }
    }
}

impl fmt::Display for OperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detailed())
    }
}

/// Status and data of one operation. `data` is set only on success.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub status: OperStatus,
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: OperStatus::ok(),
            data: Some(data),
        }
    }

    pub fn failed(status: OperStatus) -> Self {
        Self { status, data: None }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Convert to a `Result` for callers that prefer `?`
    pub fn into_result(self) -> std::result::Result<T, OperStatus> {
        match (self.status.is_ok(), self.data) {
            (true, Some(data)) => Ok(data),
            (_, _) => Err(self.status),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            status: self.status,
            data: self.data.map(f),
        }
    }
}

impl Outcome<()> {
    /// Successful operation with no data to return
    pub fn done() -> Self {
        Self::ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detailed_includes_response() {
        let status = OperStatus::http_error(HttpResponse::new(404, Some("no such flow")));
        assert!(status.is(Status::HttpError));
        assert_eq!(status.detailed(), "HTTP error (code 404): no such flow");
    }

    #[test]
    fn test_detailed_without_response() {
        assert_eq!(OperStatus::new(Status::ConnError).detailed(), "Server connection error");
    }

    #[test]
    fn test_outcome_into_result() {
        assert_eq!(Outcome::ok(5).into_result().unwrap(), 5);

        let failed: Outcome<u32> = Outcome::failed(OperStatus::new(Status::DataNotFound));
        assert!(!failed.is_ok());
        assert!(failed.into_result().unwrap_err().is(Status::DataNotFound));
    }

    #[test]
    fn test_outcome_map_keeps_status() {
        let o = Outcome::ok(2).map(|v| v * 10);
        assert!(o.is_ok());
        assert_eq!(o.data, Some(20));
    }
}
