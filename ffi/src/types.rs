//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible fields: `*mut c_char`
//! instead of `String`, pointer + length instead of `Vec`. Conversions live
//! here so `lib.rs` stays focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use neople_core::{HttpRequest, NeopleApiError};
use serde_json::Value;

/// Opaque handle to a `UrlBuilder`.
pub struct FfiUrlBuilder {
    pub(crate) inner: neople_core::UrlBuilder,
}

/// Heap C string owned by the caller. Interior NULs are dropped.
pub(crate) fn into_c_string(s: impl Into<String>) -> *mut c_char {
    let mut s = s.into();
    s.retain(|c| c != '\0');
    CString::new(s).unwrap_or_default().into_raw()
}

/// Free a string produced by `into_c_string`. Null is ignored.
pub(crate) unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// One query parameter supplied by the caller. Neither field is freed by us.
#[repr(C)]
pub struct FfiParam {
    pub key: *const c_char,
    pub value: *const c_char,
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A GET request for the host to execute: the full URL (API key included)
/// and the headers the Rust client would send.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            url: into_c_string(req.url),
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    /// Non-2xx response; `http_status` holds the status.
    Http = 1,
    /// Status 0: the body could not be decoded.
    Transport = 2,
    InvalidArgument = 3,
    Panic = 4,
}

/// Result envelope for `neople_parse_response`.
///
/// `json` is always set: the decoded payload on success, or the
/// `{status, message, response}` error record on failure.
/// `error_message` is null on success.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub json: *mut c_char,
}

impl FfiResult {
    fn boxed(error_code: FfiErrorCode, message: Option<String>, http_status: u16, json: &Value) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: message.map_or(std::ptr::null_mut(), into_c_string),
            http_status,
            json: into_c_string(json.to_string()),
        }))
    }

    pub(crate) fn ok(payload: &Value) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, 0, payload)
    }

    pub(crate) fn from_api_error(err: &NeopleApiError) -> *mut Self {
        let code = if err.status() == 0 {
            FfiErrorCode::Transport
        } else {
            FfiErrorCode::Http
        };
        Self::boxed(code, Some(err.message().to_string()), err.status(), &err.to_json())
    }

    pub(crate) fn invalid_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::InvalidArgument, &format!("invalid UTF-8 in argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg)
    }

    fn failure(code: FfiErrorCode, msg: &str) -> *mut Self {
        let record = serde_json::json!({ "status": 0, "message": msg, "response": null });
        Self::boxed(code, Some(msg.to_string()), 0, &record)
    }
}
