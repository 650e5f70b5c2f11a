//! extscan_ffi: C-ABI exports of the external scanners.
//!
//! A generated grammar parser links against five functions per grammar:
//! `tree_sitter_<grammar>_external_scanner_{create,destroy,serialize,deserialize,scan}`.
//! This crate provides them for every built-in scanner, driving the Rust
//! scanners through the host engine's [`TSLexer`] struct.
//!
//! # Ownership
//! `create` returns a boxed scanner as an opaque payload pointer. The host
//! owns that pointer and must release it with the matching `destroy`.

use std::ffi::{c_char, c_uint, c_void};
use std::ptr::NonNull;

use extscan_core::Symbol;
use extscan_scanner::cpp::CppScanner;
use extscan_scanner::externals::ExternalsScanner;
use extscan_scanner::javascript::JavaScriptScanner;
use extscan_scanner::typescript::TypeScriptScanner;
use extscan_scanner::{ExternalScanner, Lexer, SERIALIZATION_BUFFER_SIZE};

/// The lexer struct the host engine passes to `scan`.
///
/// The host's own lexer state follows these fields in memory; every callback
/// receives the pointer to this prefix.
#[repr(C)]
pub struct TSLexer {
    pub lookahead: i32,
    pub result_symbol: Symbol,
    pub advance: unsafe extern "C" fn(*mut TSLexer, bool),
    pub mark_end: unsafe extern "C" fn(*mut TSLexer),
    pub get_column: unsafe extern "C" fn(*mut TSLexer) -> u32,
    pub is_at_included_range_start: unsafe extern "C" fn(*const TSLexer) -> bool,
    pub eof: unsafe extern "C" fn(*const TSLexer) -> bool,
}

/// [`Lexer`] over a host-owned [`TSLexer`].
pub struct HostLexer {
    raw: NonNull<TSLexer>,
}

impl HostLexer {
    /// Wrap a host lexer pointer; `None` if it is null.
    ///
    /// # Safety
    /// `raw` must point to a live `TSLexer` (or a struct starting with one)
    /// for as long as the returned value is used.
    pub unsafe fn new(raw: *mut TSLexer) -> Option<Self> {
        NonNull::new(raw).map(|raw| Self { raw })
    }

    #[inline]
    fn fields(&self) -> &TSLexer {
        // SAFETY: `new` requires a live lexer.
        unsafe { self.raw.as_ref() }
    }
}

impl Lexer for HostLexer {
    fn lookahead(&self) -> char {
        match u32::try_from(self.fields().lookahead) {
            Ok(code) => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
            Err(_) => '\0',
        }
    }

    fn advance(&mut self, skip: bool) {
        // SAFETY: the callback receives the pointer it was registered with.
        unsafe { (self.fields().advance)(self.raw.as_ptr(), skip) }
    }

    fn mark_end(&mut self) {
        // SAFETY: see `advance`.
        unsafe { (self.fields().mark_end)(self.raw.as_ptr()) }
    }

    fn set_result_symbol(&mut self, symbol: Symbol) {
        // SAFETY: `new` requires a live lexer and we hold the only Rust view.
        unsafe { self.raw.as_mut().result_symbol = symbol }
    }

    fn is_at_included_range_start(&self) -> bool {
        // SAFETY: see `advance`.
        unsafe { (self.fields().is_at_included_range_start)(self.raw.as_ptr()) }
    }

    fn eof(&self) -> bool {
        // SAFETY: see `advance`.
        unsafe { (self.fields().eof)(self.raw.as_ptr()) }
    }
}

// ── Generic entry points ─────────────────────────────────────────────────────

fn create<S: ExternalScanner + Default>() -> *mut c_void {
    Box::into_raw(Box::new(S::default())).cast()
}

/// # Safety
/// `payload` must come from `create::<S>` and not have been destroyed.
unsafe fn destroy<S: ExternalScanner>(payload: *mut c_void) {
    if !payload.is_null() {
        // SAFETY: pointer was created by `Box::into_raw` in `create`.
        drop(unsafe { Box::from_raw(payload.cast::<S>()) });
    }
}

/// # Safety
/// `payload` as for [`destroy`]; `buffer` must hold
/// [`SERIALIZATION_BUFFER_SIZE`] writable bytes.
unsafe fn serialize<S: ExternalScanner>(payload: *mut c_void, buffer: *mut c_char) -> c_uint {
    // SAFETY: caller guarantees a live payload.
    let Some(scanner) = (unsafe { payload.cast::<S>().as_ref() }) else {
        return 0;
    };
    if buffer.is_null() {
        return 0;
    }
    // SAFETY: caller guarantees the buffer size.
    let buffer =
        unsafe { std::slice::from_raw_parts_mut(buffer.cast::<u8>(), SERIALIZATION_BUFFER_SIZE) };
    scanner.serialize(buffer).min(SERIALIZATION_BUFFER_SIZE) as c_uint
}

/// # Safety
/// `payload` as for [`destroy`]; `buffer` must hold `length` readable bytes.
unsafe fn deserialize<S: ExternalScanner>(
    payload: *mut c_void,
    buffer: *const c_char,
    length: c_uint,
) {
    // SAFETY: caller guarantees a live payload.
    let Some(scanner) = (unsafe { payload.cast::<S>().as_mut() }) else {
        return;
    };
    let bytes = if buffer.is_null() || length == 0 {
        &[][..]
    } else {
        // SAFETY: caller guarantees `length` readable bytes.
        unsafe { std::slice::from_raw_parts(buffer.cast::<u8>(), length as usize) }
    };
    scanner.deserialize(bytes);
}

/// # Safety
/// `payload` as for [`destroy`]; `lexer` must be a live host lexer and
/// `valid_symbols` must hold one flag per external token.
unsafe fn scan<S: ExternalScanner>(
    payload: *mut c_void,
    lexer: *mut TSLexer,
    valid_symbols: *const bool,
) -> bool {
    // SAFETY: caller guarantees a live payload and lexer.
    let (Some(scanner), Some(mut lexer)) =
        (unsafe { payload.cast::<S>().as_mut() }, unsafe { HostLexer::new(lexer) })
    else {
        return false;
    };
    let valid_symbols = if valid_symbols.is_null() {
        &[][..]
    } else {
        // SAFETY: caller guarantees one flag per external token.
        unsafe { std::slice::from_raw_parts(valid_symbols, scanner.token_names().len()) }
    };
    scanner.scan(&mut lexer, valid_symbols)
}

// ── Per-grammar exports ──────────────────────────────────────────────────────

macro_rules! export_scanner {
    (
        $scanner:ty,
        $create:ident,
        $destroy:ident,
        $serialize:ident,
        $deserialize:ident,
        $scan:ident $(,)?
    ) => {
        #[no_mangle]
        pub extern "C" fn $create() -> *mut c_void {
            create::<$scanner>()
        }

        /// # Safety
        /// `payload` must come from the matching `create` and must not be
        /// used again after this call.
        #[no_mangle]
        pub unsafe extern "C" fn $destroy(payload: *mut c_void) {
            unsafe { destroy::<$scanner>(payload) }
        }

        /// # Safety
        /// `payload` must be live; `buffer` must hold
        /// `SERIALIZATION_BUFFER_SIZE` writable bytes.
        #[no_mangle]
        pub unsafe extern "C" fn $serialize(payload: *mut c_void, buffer: *mut c_char) -> c_uint {
            unsafe { serialize::<$scanner>(payload, buffer) }
        }

        /// # Safety
        /// `payload` must be live; `buffer` must hold `length` readable bytes.
        #[no_mangle]
        pub unsafe extern "C" fn $deserialize(
            payload: *mut c_void,
            buffer: *const c_char,
            length: c_uint,
        ) {
            unsafe { deserialize::<$scanner>(payload, buffer, length) }
        }

        /// # Safety
        /// `payload` must be live, `lexer` must be the host lexer and
        /// `valid_symbols` must hold one flag per external token.
        #[no_mangle]
        pub unsafe extern "C" fn $scan(
            payload: *mut c_void,
            lexer: *mut TSLexer,
            valid_symbols: *const bool,
        ) -> bool {
            unsafe { scan::<$scanner>(payload, lexer, valid_symbols) }
        }
    };
}

export_scanner!(
    CppScanner,
    tree_sitter_cpp_external_scanner_create,
    tree_sitter_cpp_external_scanner_destroy,
    tree_sitter_cpp_external_scanner_serialize,
    tree_sitter_cpp_external_scanner_deserialize,
    tree_sitter_cpp_external_scanner_scan,
);

export_scanner!(
    JavaScriptScanner,
    tree_sitter_javascript_external_scanner_create,
    tree_sitter_javascript_external_scanner_destroy,
    tree_sitter_javascript_external_scanner_serialize,
    tree_sitter_javascript_external_scanner_deserialize,
    tree_sitter_javascript_external_scanner_scan,
);

export_scanner!(
    TypeScriptScanner,
    tree_sitter_typescript_external_scanner_create,
    tree_sitter_typescript_external_scanner_destroy,
    tree_sitter_typescript_external_scanner_serialize,
    tree_sitter_typescript_external_scanner_deserialize,
    tree_sitter_typescript_external_scanner_scan,
);

export_scanner!(
    ExternalsScanner,
    tree_sitter_externals_external_scanner_create,
    tree_sitter_externals_external_scanner_destroy,
    tree_sitter_externals_external_scanner_serialize,
    tree_sitter_externals_external_scanner_deserialize,
    tree_sitter_externals_external_scanner_scan,
);
