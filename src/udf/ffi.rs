//! MySQL loadable-function ABI.
//!
//! ```sql
//! CREATE FUNCTION sqs_send_message RETURNS STRING SONAME 'libsqs_udf.so';
//! SELECT sqs_send_message(queue_url, body, delay, attrs, sys_attrs, dedup_id, group_id);
//! ```
//!
//! Each result buffer is parked in `UDF_INIT::ptr` after it is returned and
//! released on the next row of the same statement or in `_deinit`.

use once_cell::sync::Lazy;
use std::ffi::{c_char, c_int, c_uchar, c_uint, c_ulong, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::{ptr, slice};

use super::{ARG_COUNT, ArgKind, ArgValue, CallArgs, OwnedBuffer, evaluate_blocking, negotiate, write_diagnostic};
use crate::clients::{AwsSessionProvider, SessionProvider};
use crate::core::config;
use crate::errors::UdfError;
use crate::logging::{init_logging, report_failure};

/// `MYSQL_ERRMSG_SIZE`: capacity of the `_init` message area.
pub const MYSQL_ERRMSG_SIZE: usize = 512;

// enum Item_result
pub const STRING_RESULT: c_int = 0;
pub const REAL_RESULT: c_int = 1;
pub const INT_RESULT: c_int = 2;
pub const DECIMAL_RESULT: c_int = 4;

#[repr(C)]
#[derive(Debug)]
pub struct UdfInit {
    pub maybe_null: bool,
    pub decimals: c_uint,
    pub max_length: c_ulong,
    pub ptr: *mut c_char,
    pub const_item: bool,
    pub extension: *mut c_void,
}

#[repr(C)]
#[derive(Debug)]
pub struct UdfArgs {
    pub arg_count: c_uint,
    pub arg_type: *mut c_int,
    pub args: *mut *mut c_char,
    pub lengths: *mut c_ulong,
    pub maybe_null: *mut c_char,
    pub attributes: *mut *mut c_char,
    pub attribute_lengths: *mut c_ulong,
    pub extension: *mut c_void,
}

static SESSIONS: Lazy<AwsSessionProvider> = Lazy::new(|| {
    let config = config::loaded().as_ref().cloned().unwrap_or_default();
    AwsSessionProvider::new(&config)
});

fn item_result(kind: ArgKind) -> c_int {
    match kind {
        ArgKind::String => STRING_RESULT,
        ArgKind::Integer => INT_RESULT,
    }
}

/// Negotiation entry. Returns `true` when the function must not be used.
///
/// # Safety
///
/// `initid` and `args` must point to host-owned `UDF_INIT`/`UDF_ARGS`, with
/// `args.arg_type` holding `args.arg_count` entries, and `message` must be a
/// writable area of at least `MYSQL_ERRMSG_SIZE` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sqs_send_message_init(
    initid: *mut UdfInit,
    args: *mut UdfArgs,
    message: *mut c_char,
) -> bool {
    init_logging();

    let (Some(initid), Some(args)) = (unsafe { initid.as_mut() }, unsafe { args.as_mut() }) else {
        let err = UdfError::Internal("null UDF_INIT or UDF_ARGS".to_string());
        report_failure(&err);
        unsafe { write_message(message, &err.to_string()) };
        return true;
    };

    let signature = match negotiate(args.arg_count) {
        Ok(signature) => signature,
        Err(err) => {
            report_failure(&err);
            unsafe { write_message(message, &err.to_string()) };
            return true;
        }
    };

    let arg_types = unsafe { slice::from_raw_parts_mut(args.arg_type, ARG_COUNT) };
    for (slot, kind) in arg_types.iter_mut().zip(signature.arg_kinds) {
        *slot = item_result(kind);
    }
    initid.maybe_null = signature.maybe_null;
    initid.ptr = ptr::null_mut();

    false
}

/// Per-row entry. Failures yield SQL `NULL`; `*error` is left untouched so
/// later rows still run.
///
/// # Safety
///
/// Pointers must be the host's for a statement negotiated by
/// [`sqs_send_message_init`]; argument buffers are read only during the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sqs_send_message(
    initid: *mut UdfInit,
    args: *mut UdfArgs,
    _result: *mut c_char,
    length: *mut c_ulong,
    is_null: *mut c_uchar,
    _error: *mut c_uchar,
) -> *mut c_char {
    unsafe { evaluate_row(initid, args, length, is_null, &*SESSIONS) }
}

/// Body of [`sqs_send_message`] with the session provider supplied by the
/// caller. The returned buffer stays parked in `initid.ptr` until the next
/// row or `_deinit` releases it.
///
/// # Safety
///
/// Same contract as [`sqs_send_message`].
pub unsafe fn evaluate_row(
    initid: *mut UdfInit,
    args: *const UdfArgs,
    length: *mut c_ulong,
    is_null: *mut c_uchar,
    sessions: &dyn SessionProvider,
) -> *mut c_char {
    unsafe { release_parked(initid) };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let call_args = unsafe { call_args_from_raw(args) }?;
        evaluate_blocking(&call_args, sessions)
    }))
    .unwrap_or_else(|payload| Err(UdfError::Internal(panic_message(payload.as_ref()))));

    match outcome {
        Ok(buffer) => {
            let Some(init) = (unsafe { initid.as_mut() }) else {
                report_failure(&UdfError::Internal("null UDF_INIT".to_string()));
                unsafe { set_output(length, is_null, 0, 1) };
                return ptr::null_mut();
            };
            unsafe { set_output(length, is_null, buffer.len() as c_ulong, 0) };
            init.ptr = buffer.into_raw();
            init.ptr
        }
        Err(err) => {
            report_failure(&err);
            unsafe { set_output(length, is_null, 0, 1) };
            ptr::null_mut()
        }
    }
}

/// Releases the last buffer returned for this statement.
///
/// # Safety
///
/// `initid` must be the pointer passed to the matching `_init`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sqs_send_message_deinit(initid: *mut UdfInit) {
    unsafe { release_parked(initid) };
}

unsafe fn release_parked(initid: *mut UdfInit) {
    let Some(init) = (unsafe { initid.as_mut() }) else {
        return;
    };
    if !init.ptr.is_null() {
        drop(unsafe { OwnedBuffer::from_raw(init.ptr) });
        init.ptr = ptr::null_mut();
    }
}

unsafe fn set_output(length: *mut c_ulong, is_null: *mut c_uchar, len: c_ulong, null: c_uchar) {
    if let Some(length) = unsafe { length.as_mut() } {
        *length = len;
    }
    if let Some(is_null) = unsafe { is_null.as_mut() } {
        *is_null = null;
    }
}

unsafe fn write_message(message: *mut c_char, text: &str) {
    if message.is_null() {
        return;
    }
    let area = unsafe { slice::from_raw_parts_mut(message.cast::<u8>(), MYSQL_ERRMSG_SIZE) };
    write_diagnostic(area, text);
}

/// Borrows the host's argument buffers as typed slots.
///
/// # Safety
///
/// The returned slices alias host memory and must not outlive the call.
unsafe fn call_args_from_raw<'a>(args: *const UdfArgs) -> Result<CallArgs<'a>, UdfError> {
    let args = unsafe { args.as_ref() }.ok_or_else(|| UdfError::Internal("null UDF_ARGS".to_string()))?;
    let signature = negotiate(args.arg_count)?;

    let mut call = CallArgs::default();
    for (position, expected) in signature.arg_kinds.into_iter().enumerate() {
        let value = unsafe { *args.args.add(position) };
        if value.is_null() {
            continue;
        }
        let value = match unsafe { *args.arg_type.add(position) } {
            INT_RESULT => ArgValue::Int(unsafe { ptr::read_unaligned(value.cast::<i64>()) }),
            STRING_RESULT | DECIMAL_RESULT => {
                let len = unsafe { *args.lengths.add(position) } as usize;
                ArgValue::Bytes(unsafe { slice::from_raw_parts(value.cast::<u8>(), len) })
            }
            _ => {
                return Err(UdfError::ArgumentType {
                    position,
                    expected: expected.describe(),
                });
            }
        };
        call.slots[position] = Some(value);
    }
    Ok(call)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during evaluation".to_string()
    }
}
