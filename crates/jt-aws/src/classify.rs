use std::{error::Error, fmt::Debug};

use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use jt_core::{ErrorClass, PlatformError};

const TRANSIENT_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestThrottled",
    "RequestThrottledException",
    "RequestLimitExceeded",
    "TooManyRequestsException",
    "ProvisionedThroughputExceededException",
    "RequestTimeout",
    "RequestTimeoutException",
    "ServerException",
    "InternalError",
    "InternalFailure",
    "InternalServerError",
    "ServiceUnavailable",
    "ServiceUnavailableException",
    "Unavailable",
];

/// Maps a service error code onto an [`ErrorClass`].
///
/// EC2 reports missing ids as `Invalid<Thing>.NotFound`, the other services
/// as `ResourceNotFoundException`.
pub fn classify_code(code: Option<&str>) -> ErrorClass {
    match code {
        Some(code) if TRANSIENT_CODES.contains(&code) => ErrorClass::Transient,
        Some("ResourceNotFoundException") => ErrorClass::NotFound,
        Some(code) if code.ends_with(".NotFound") => ErrorClass::NotFound,
        _ => ErrorClass::Permanent,
    }
}

/// Converts an SDK failure of `op`. Transport level failures never reached
/// the service and are always worth another try.
pub(crate) fn classify<E, R>(op: &'static str, err: SdkError<E, R>) -> PlatformError
where
    E: ProvideErrorMetadata + Error + 'static,
    R: Debug,
{
    let class = match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            ErrorClass::Transient
        }
        _ => classify_code(err.code()),
    };
    PlatformError::new(op, class, DisplayErrorContext(&err).to_string())
}
