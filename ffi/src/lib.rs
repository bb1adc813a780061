//! C-ABI wrapper around `neople-core`.
//!
//! # Overview
//! Lets a host with its own HTTP stack use the Neople client without an async
//! runtime: build the request URL and headers here, execute the GET on the
//! host, then hand the status and body back to `neople_parse_response` for
//! the same normalization the Rust adapters apply.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Builders return null on a null or non-UTF-8 argument; the parser always
//!   returns an `FfiResult` envelope.
//! - The caller owns every returned pointer and releases it with the matching
//!   `neople_free_*` function.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use neople_core::df::ALL_SERVERS;
use neople_core::{cyphers, df, ApiRequest, HttpResponse, QueryParams, UrlBuilder};

use types::*;

/// Borrow a C string as `&str`; `None` for null or invalid UTF-8.
fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn build_request(builder: *const FfiUrlBuilder, request: impl FnOnce() -> Option<ApiRequest>) -> *mut FfiHttpRequest {
    if builder.is_null() {
        return std::ptr::null_mut();
    }
    let builder = unsafe { &*builder };
    let Some(request) = request() else {
        return std::ptr::null_mut();
    };
    match builder.inner.http_request(&request) {
        Ok(req) => FfiHttpRequest::from_core(req),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Read `len` caller params in order; repeated keys become repeated values.
fn read_params(params: *const FfiParam, len: u32) -> Option<QueryParams> {
    let mut out = QueryParams::new();
    if len == 0 {
        return Some(out);
    }
    if params.is_null() {
        return None;
    }
    let params = unsafe { std::slice::from_raw_parts(params, len as usize) };
    for param in params {
        out.append(c_str(param.key)?, c_str(param.value)?);
    }
    Some(out)
}

// ---------------------------------------------------------------------------
// Builder lifecycle
// ---------------------------------------------------------------------------

/// Create a URL builder for `api_key`.
///
/// `base_url` may be null for the production API. Returns null if `api_key`
/// is null or either string is not UTF-8. Free with `neople_url_builder_free`.
#[unsafe(no_mangle)]
pub extern "C" fn neople_url_builder_new(
    api_key: *const c_char,
    base_url: *const c_char,
) -> *mut FfiUrlBuilder {
    catch_unwind(|| {
        let Some(key) = c_str(api_key) else {
            return std::ptr::null_mut();
        };
        let mut inner = UrlBuilder::new(key);
        if !base_url.is_null() {
            let Some(base) = c_str(base_url) else {
                return std::ptr::null_mut();
            };
            inner = inner.with_base_url(base);
        }
        Box::into_raw(Box::new(FfiUrlBuilder { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a builder created by `neople_url_builder_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn neople_url_builder_free(builder: *mut FfiUrlBuilder) {
    if !builder.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(builder) });
        });
    }
}

// ---------------------------------------------------------------------------
// Request builders
// ---------------------------------------------------------------------------

/// Build a GET for `path` with `params_len` key/value pairs.
///
/// `params` may be null when `params_len` is 0. A caller-supplied `apikey`
/// is replaced by the builder's key. Free with `neople_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn neople_build_request(
    builder: *const FfiUrlBuilder,
    path: *const c_char,
    params: *const FfiParam,
    params_len: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        build_request(builder, || {
            let path = c_str(path)?;
            let params = read_params(params, params_len)?;
            Some(ApiRequest::with_params(path, params))
        })
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Same as `neople_build_request` but returns only the URL.
/// Free with `neople_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn neople_build_url(
    builder: *const FfiUrlBuilder,
    path: *const c_char,
    params: *const FfiParam,
    params_len: u32,
) -> *mut c_char {
    catch_unwind(|| {
        if builder.is_null() {
            return std::ptr::null_mut();
        }
        let builder = unsafe { &*builder };
        let (Some(path), Some(params)) = (c_str(path), read_params(params, params_len)) else {
            return std::ptr::null_mut();
        };
        match builder.inner.build_url(path, &params) {
            Ok(url) => into_c_string(url),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Dungeon Fighter character search. A null `server_id` searches all servers.
#[unsafe(no_mangle)]
pub extern "C" fn neople_df_search_character(
    builder: *const FfiUrlBuilder,
    character_name: *const c_char,
    server_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        build_request(builder, || {
            let name = c_str(character_name)?;
            let server = if server_id.is_null() {
                ALL_SERVERS
            } else {
                c_str(server_id)?
            };
            Some(df::search_character(name, server))
        })
    })
    .unwrap_or(std::ptr::null_mut())
}

#[unsafe(no_mangle)]
pub extern "C" fn neople_df_character(
    builder: *const FfiUrlBuilder,
    server_id: *const c_char,
    character_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        build_request(builder, || {
            Some(df::character(c_str(server_id)?, c_str(character_id)?))
        })
    })
    .unwrap_or(std::ptr::null_mut())
}

#[unsafe(no_mangle)]
pub extern "C" fn neople_cy_search_player(
    builder: *const FfiUrlBuilder,
    nickname: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        build_request(builder, || {
            Some(cyphers::search_player(
                c_str(nickname)?,
                &cyphers::PlayerSearchParams::default(),
            ))
        })
    })
    .unwrap_or(std::ptr::null_mut())
}

#[unsafe(no_mangle)]
pub extern "C" fn neople_cy_player_info(
    builder: *const FfiUrlBuilder,
    player_id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| build_request(builder, || Some(cyphers::player_info(c_str(player_id)?))))
        .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Normalize a response the host received.
///
/// `status_text` may be null (treated as empty). A null `body` means the body
/// could not be read. Free the result with `neople_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn neople_parse_response(
    status: u16,
    status_text: *const c_char,
    body: *const c_char,
) -> *mut FfiResult {
    catch_unwind(|| {
        let status_text = if status_text.is_null() {
            ""
        } else {
            match c_str(status_text) {
                Some(text) => text,
                None => return FfiResult::invalid_arg("status_text"),
            }
        };
        let body = if body.is_null() {
            None
        } else {
            match c_str(body) {
                Some(text) => Some(text.to_string()),
                None => return FfiResult::invalid_arg("body"),
            }
        };

        let response = HttpResponse {
            status,
            status_text: status_text.to_string(),
            body,
        };
        match response.into_payload() {
            Ok(payload) => FfiResult::ok(&payload),
            Err(err) => FfiResult::from_api_error(&err),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in neople_parse_response"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by any `neople_build_*`/`neople_df_*`/`neople_cy_*`
/// function. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn neople_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        unsafe { free_c_string(req.url) };
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                unsafe {
                    free_c_string(h.key);
                    free_c_string(h.value);
                }
            }
        }
    });
}

/// Free a result returned by `neople_parse_response`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn neople_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        unsafe {
            free_c_string(result.error_message);
            free_c_string(result.json);
        }
    });
}

/// Free a string returned by `neople_build_url`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn neople_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { free_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
